//! Trigger entry point

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use offwatch_core::{Config, Pipeline};
use offwatch_inventory::MongoConnector;
use offwatch_notify::SmtpMailer;
use serde_json::Value;
use tracing::{debug, info};

/// Per-invocation metadata from the trigger
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub invocation_id: String,
    pub started_at: DateTime<Utc>,
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl InvocationContext {
    pub fn new() -> Self {
        let started_at = Utc::now();
        Self {
            invocation_id: format!("run-{}", started_at.format("%Y%m%dT%H%M%S%.3fZ")),
            started_at,
        }
    }
}

/// Read the trigger payload, or `Null` when none was given
pub fn read_event(path: Option<&Path>) -> eyre::Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run one check. The event and context only show up in logs.
pub async fn handler(event: Value, context: InvocationContext, config: Config, dry_run: bool) {
    info!(invocation = %context.invocation_id, started_at = %context.started_at, "invoked");
    debug!(%event, "trigger payload");

    let mailer = SmtpMailer::new(config.smtp.clone());
    let pipeline =
        Pipeline::new(config, Arc::new(MongoConnector::new()), Arc::new(mailer)).with_dry_run(dry_run);

    let summary = pipeline.run().await;

    let elapsed = Utc::now() - context.started_at;
    info!(
        invocation = %context.invocation_id,
        outcome = summary.outcome,
        devices = summary.devices_reported,
        inventory_error = summary.inventory_error.as_deref(),
        elapsed_ms = elapsed.num_milliseconds(),
        "run complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_event_is_null() {
        assert_eq!(read_event(None).unwrap(), Value::Null);
    }

    #[test]
    fn test_event_file_is_parsed() {
        let path = std::env::temp_dir().join(format!("offwatch-event-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"source": "aws.events", "detail": {}}"#).unwrap();

        let event = read_event(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(event["source"], "aws.events");
    }

    #[test]
    fn test_invocation_id() {
        let context = InvocationContext::new();
        assert!(context.invocation_id.starts_with("run-"));
    }
}
