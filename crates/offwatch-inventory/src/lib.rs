//! offwatch-inventory: device inventory reader
//!
//! Connects to the document store holding device profiles and pulls the records whose
//! `status` marks them as inactive.

pub mod config;
pub mod error;
pub mod mongo;
pub mod query;
pub mod reader;
pub mod traits;
pub mod types;

pub use mongodb::bson;

pub use config::InventorySettings;
pub use error::InventoryError;
pub use mongo::{MongoConnector, MongoStore};
pub use query::StatusFilter;
pub use reader::{InventoryReader, InventorySession, OfflineDevices};
pub use traits::{DeviceStore, StoreConnector};
pub use types::{DeviceRecord, INACTIVE_STATUS, STATUS_FIELD};
