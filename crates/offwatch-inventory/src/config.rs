//! Connection settings for the inventory store

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default database holding device profiles
pub const DEFAULT_DATABASE: &str = "test";

/// Default collection holding device profiles
pub const DEFAULT_COLLECTION: &str = "profiles";

/// CA bundle expected next to the binary's working directory
pub const DEFAULT_TLS_CA_FILE: &str = "rds-combined-ca-bundle.pem";

/// Settings for connecting to the inventory store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySettings {
    /// MongoDB-compatible connection string
    pub connection_string: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Certificate authority bundle used to verify the store
    #[serde(default = "default_tls_ca_file")]
    pub tls_ca_file: PathBuf,
    /// Upper bound on server selection during connect and ping
    #[serde(default = "default_ping_timeout", with = "duration_secs")]
    pub ping_timeout: Duration,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_tls_ca_file() -> PathBuf {
    PathBuf::from(DEFAULT_TLS_CA_FILE)
}

fn default_ping_timeout() -> Duration {
    Duration::from_secs(10)
}

impl InventorySettings {
    /// Create settings with default database, collection and CA bundle
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: default_database(),
            collection: default_collection(),
            tls_ca_file: default_tls_ca_file(),
            ping_timeout: default_ping_timeout(),
        }
    }

    /// Target a different database and collection
    #[must_use]
    pub fn with_namespace(mut self, database: impl Into<String>, collection: impl Into<String>) -> Self {
        self.database = database.into();
        self.collection = collection.into();
        self
    }

    /// Use a different CA bundle
    #[must_use]
    pub fn with_tls_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_ca_file = path.into();
        self
    }

    /// Set connect/ping timeout
    #[must_use]
    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// `database.collection`, for logs
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = InventorySettings::new("mongodb://localhost:27017");
        assert_eq!(settings.database, "test");
        assert_eq!(settings.collection, "profiles");
        assert_eq!(settings.tls_ca_file, PathBuf::from("rds-combined-ca-bundle.pem"));
        assert_eq!(settings.namespace(), "test.profiles");
    }

    #[test]
    fn test_builders() {
        let settings = InventorySettings::new("mongodb://db")
            .with_namespace("fleet", "devices")
            .with_tls_ca_file("/etc/ssl/ca.pem")
            .with_ping_timeout(Duration::from_secs(3));
        assert_eq!(settings.namespace(), "fleet.devices");
        assert_eq!(settings.tls_ca_file, PathBuf::from("/etc/ssl/ca.pem"));
        assert_eq!(settings.ping_timeout, Duration::from_secs(3));
    }
}
