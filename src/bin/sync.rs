//! One-shot job that copies launches from the SpaceX API into DynamoDB
use spacex_launches::clients::SpaceXClient;
use spacex_launches::config::AppConfig;
use spacex_launches::repo::{self, DynamoLaunchRepository};
use spacex_launches::services::SyncService;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spacex_launches::init_tracing();

    let config = AppConfig::from_env()?;

    let client = repo::connect(&config.storage).await;
    let writer = DynamoLaunchRepository::new(client, config.storage.table_name.clone());
    info!(table = %writer.table_name(), "Syncing into DynamoDB table");

    let spacex = SpaceXClient::new(config.sync.api_url.clone(), config.sync.request_timeout)?;
    let service = SyncService::new(spacex, Arc::new(writer));

    match service.run().await {
        Ok(summary) => {
            println!("{}", serde_json::to_string(&summary)?);
            Ok(())
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            Err(e.into())
        }
    }
}
