//! MongoDB / DocumentDB backed store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Collection};
use tracing::{debug, instrument};

use crate::config::InventorySettings;
use crate::error::InventoryError;
use crate::query::StatusFilter;
use crate::traits::{DeviceStore, StoreConnector};
use crate::types::DeviceRecord;

const APP_NAME: &str = "offwatch";

/// Opens TLS sessions against a MongoDB-compatible cluster
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl MongoConnector {
    /// Create a new connector
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    #[instrument(skip(self, settings), fields(namespace = %settings.namespace()))]
    async fn connect(
        &self,
        settings: &InventorySettings,
    ) -> Result<Box<dyn DeviceStore>, InventoryError> {
        Ok(Box::new(MongoStore::connect(settings).await?))
    }
}

/// One client session bound to the device collection
pub struct MongoStore {
    client: Client,
    collection: Collection<DeviceRecord>,
}

impl MongoStore {
    /// Build a client with TLS and the configured CA bundle
    ///
    /// # Errors
    /// Returns an error if the connection string or TLS options are rejected.
    pub async fn connect(settings: &InventorySettings) -> Result<Self, InventoryError> {
        let mut options = ClientOptions::parse(&settings.connection_string)
            .await
            .map_err(|e| InventoryError::ConfigError(e.to_string()))?;

        let tls = TlsOptions::builder()
            .ca_file_path(settings.tls_ca_file.clone())
            .build();
        options.tls = Some(Tls::Enabled(tls));
        options.server_selection_timeout = Some(settings.ping_timeout);
        options.connect_timeout = Some(settings.ping_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let collection = client
            .database(&settings.database)
            .collection::<DeviceRecord>(&settings.collection);

        debug!(ca_file = %settings.tls_ca_file.display(), "client created");

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl DeviceStore for MongoStore {
    async fn ping(&self) -> Result<(), InventoryError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| InventoryError::PingFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(filter = %filter))]
    async fn find(&self, filter: &StatusFilter) -> Result<Vec<DeviceRecord>, InventoryError> {
        let cursor = self.collection.find(filter.to_document()).await?;
        let records: Vec<DeviceRecord> = cursor.try_collect().await?;

        debug!(rows = records.len(), "query completed");

        Ok(records)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }

    fn store_type(&self) -> &'static str {
        "mongodb"
    }
}
