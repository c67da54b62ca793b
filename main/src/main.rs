#![warn(
    clippy::string_slice,
    clippy::str_to_string,
    clippy::inefficient_to_string,
    clippy::manual_string_new,
    clippy::map_unwrap_or,
    clippy::needless_pass_by_value,
    clippy::unused_self,
    clippy::explicit_iter_loop
)]

use anyhow::Context;
use config::Config;
use database_api::{impl_document, selector, CouchDatabase, Database, Document, Timestamp};
use serde::{Deserialize, Serialize};
use tracing as log;

mod config;

/// Written, read back, updated and deleted on every run.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct Canary {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    rev: Option<String>,
    kind: String,
    checked_at: Timestamp,
    round_trips: u32,
}

impl_document!(Canary, id, rev);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config: String = match tokio::fs::read_to_string("config.json").await {
        Ok(conf) => conf,
        Err(e) => {
            log::error!("Failed to read config.json: {}", e);
            return Ok(());
        }
    };

    let config: Config = serde_json::from_str(&config).context("Failed to parse config.json")?;
    let name = config.database.as_str();

    log::info!("Connecting to CouchDB at {}...", config.couchdb.url);
    let db = CouchDatabase::connect(config.couchdb.clone())?;
    db.create_database(name).await?;

    let canary = Canary {
        id: None,
        rev: None,
        kind: "canary".to_owned(),
        checked_at: Timestamp::now(),
        round_trips: 0,
    };
    let created = db.create(canary, name).await?;
    let (id, rev) = ids(&created)?;
    log::info!("Created canary {} at revision {}", id, rev);

    let mut fetched: Canary = db.get(&id, name).await?;
    if fetched.checked_at != created.checked_at {
        anyhow::bail!("Canary date did not survive the round trip: {} != {}", fetched.checked_at, created.checked_at);
    }

    fetched.round_trips += 1;
    let updated = db.update(&id, &rev, fetched, name).await?;
    let (_, rev) = ids(&updated)?;
    log::info!("Updated canary {} to revision {}", id, rev);

    let canaries: Vec<Canary> = db.get_all(selector!("kind" => "canary"), name).await?;
    log::info!("Found {} canary documents in {:?}", canaries.len(), name);

    db.delete(&id, &rev, name).await?;
    log::info!("CouchDB at {} is healthy", config.couchdb.url);
    Ok(())
}

fn ids(canary: &Canary) -> anyhow::Result<(String, String)> {
    match (canary.identifier(), canary.revision()) {
        (Some(id), Some(rev)) => Ok((id.to_owned(), rev.to_owned())),
        _ => anyhow::bail!("Server did not return an id and revision"),
    }
}
