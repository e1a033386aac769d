//! Store traits

use async_trait::async_trait;

use crate::config::InventorySettings;
use crate::error::InventoryError;
use crate::query::StatusFilter;
use crate::types::DeviceRecord;

/// A connected document store holding device profiles
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Lightweight administrative round trip
    async fn ping(&self) -> Result<(), InventoryError>;

    /// Return every record matching the filter, in store order
    async fn find(&self, filter: &StatusFilter) -> Result<Vec<DeviceRecord>, InventoryError>;

    /// Release the underlying session
    async fn close(&self) {}

    fn store_type(&self) -> &'static str;
}

/// Opens a [`DeviceStore`] from settings
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(
        &self,
        settings: &InventorySettings,
    ) -> Result<Box<dyn DeviceStore>, InventoryError>;
}
