use std::sync::Arc;

use movebot_core::{config::Config, service::MoveService};
use movebot_pokeapi::PokeApiClient;
use movebot_sqlite::SqliteMoveStore;

#[tokio::main]
async fn main() -> Result<(), movebot_core::Error> {
    movebot_core::logging::init("movebot")?;

    let cfg = Arc::new(Config::load()?);

    let store = Arc::new(SqliteMoveStore::open(&cfg.database_path)?);
    let lookup = Arc::new(PokeApiClient::new(
        cfg.pokeapi_base_url.clone(),
        cfg.lookup_timeout,
    )?);
    tracing::info!(
        db = %store.path().display(),
        lookup = lookup.base_url(),
        "backends ready"
    );

    let service = Arc::new(MoveService::new(store.clone(), lookup));

    let run = movebot_telegram::router::run_polling(cfg, service).await;

    // The dispatcher (and with it every handle on the service) is gone by now.
    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => tracing::warn!("move store still referenced at shutdown; leaving it to drop"),
    }

    run.map_err(|e| movebot_core::Error::External(format!("telegram bot failed: {e}")))?;
    Ok(())
}
