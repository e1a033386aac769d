//! Run configuration
//!
//! Secrets and addresses come from required environment variables. Non-secret
//! overrides may come from a TOML file named by `OFFWATCH_CONFIG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use offwatch_inventory::InventorySettings;
use offwatch_notify::SmtpSettings;
use serde::Deserialize;

use crate::error::ConfigError;

/// Subject line of the report email
pub const DEFAULT_SUBJECT: &str = "Offline Devices Report";

/// Environment variables every run needs
pub const REQUIRED_ENV_VARS: [&str; 5] = [
    "CONNECTION_STRING",
    "SENDER_EMAIL",
    "RECIPIENT_EMAIL",
    "SMTP_USERNAME",
    "SMTP_PASSWORD",
];

/// Variable naming the optional settings file
pub const CONFIG_PATH_VAR: &str = "OFFWATCH_CONFIG";

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct Config {
    /// Inventory store connection
    pub inventory: InventorySettings,
    /// Mail relay connection
    pub smtp: SmtpSettings,
    /// Sender address
    pub sender: String,
    /// Report recipient
    pub recipient: String,
    /// Email subject
    pub subject: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Optional settings file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub inventory: InventoryOverrides,
    pub smtp: SmtpOverrides,
    pub report: ReportOverrides,
    pub log: LogOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryOverrides {
    pub database: Option<String>,
    pub collection: Option<String>,
    pub tls_ca_file: Option<PathBuf>,
    pub ping_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportOverrides {
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogOverrides {
    pub level: Option<String>,
}

impl SettingsFile {
    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error on invalid TOML or unknown keys
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Config {
    /// Load from the process environment
    ///
    /// # Errors
    /// Returns error if a required variable is missing or the settings file is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns error if a required variable is missing or the settings file is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let connection_string = require("CONNECTION_STRING")?;
        let sender = require("SENDER_EMAIL")?;
        let recipient = require("RECIPIENT_EMAIL")?;
        let username = require("SMTP_USERNAME")?;
        let password = require("SMTP_PASSWORD")?;

        let mut config = Config {
            inventory: InventorySettings::new(connection_string),
            smtp: SmtpSettings::new(username, password),
            sender,
            recipient,
            subject: DEFAULT_SUBJECT.to_string(),
            log_level: "info".to_string(),
        };

        if let Some(path) = lookup(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            let file = SettingsFile::load(Path::new(&path))?;
            config.apply(file);
        }

        Ok(config)
    }

    /// Apply file overrides
    pub fn apply(&mut self, file: SettingsFile) {
        let SettingsFile {
            inventory,
            smtp,
            report,
            log,
        } = file;

        if let Some(database) = inventory.database {
            self.inventory.database = database;
        }
        if let Some(collection) = inventory.collection {
            self.inventory.collection = collection;
        }
        if let Some(path) = inventory.tls_ca_file {
            self.inventory.tls_ca_file = path;
        }
        if let Some(secs) = inventory.ping_timeout_secs {
            self.inventory.ping_timeout = Duration::from_secs(secs);
        }
        if let Some(host) = smtp.host {
            self.smtp.host = host;
        }
        if let Some(port) = smtp.port {
            self.smtp.port = port;
        }
        if let Some(subject) = report.subject {
            self.subject = subject;
        }
        if let Some(level) = log.level {
            self.log_level = level;
        }
    }
}
