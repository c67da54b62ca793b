use database_api::CouchConfig;
use serde::Deserialize;

fn default_database() -> String {
    "heartbeat".to_owned()
}

#[derive(Deserialize)]
pub struct Config {
    pub couchdb: CouchConfig,
    /// Database the smoke check writes its canary document to.
    #[serde(default = "default_database")]
    pub database: String,
}
