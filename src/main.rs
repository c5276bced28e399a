use std::sync::Arc;

use anyhow::Result;
use tent_house::config::{AppConfig, StorageBackend};
use tent_house::core::DocumentStore;
use tent_house::server::ServerBuilder;
use tent_house::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tent_house=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let store = open_store(&config).await?;

    tracing::info!(
        backend = store.backend_name(),
        business = %config.business.name,
        "starting tent house service"
    );

    ServerBuilder::new()
        .with_config(config)
        .with_store_arc(store)
        .serve()
        .await
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            let store = tent_house::storage::MongoStore::connect(
                &config.storage.uri,
                &config.storage.database,
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => Err(anyhow::anyhow!(
            "storage.backend is mongodb but the mongodb_backend feature is not enabled"
        )),
    }
}
