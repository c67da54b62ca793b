use serde::Deserialize;
use url::Url;

const fn default_find_limit() -> u32 {
    u32::MAX
}

/// Connection settings for one CouchDB server.
///
/// An empty `username` disables basic auth entirely.
#[derive(Deserialize, Clone)]
pub struct CouchConfig {
    pub url: Url,
    #[serde(default)]
    pub username: Box<str>,
    #[serde(default)]
    pub password: Box<str>,
    /// Sent as `limit` with every `_find`, CouchDB returns only 25 documents otherwise.
    #[serde(default = "default_find_limit")]
    pub find_limit: u32,
}

impl CouchConfig {
    pub fn new(url: Url, username: &str, password: &str) -> Self {
        Self {
            url,
            username: username.into(),
            password: password.into(),
            find_limit: default_find_limit(),
        }
    }
}
