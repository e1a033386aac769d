//! One offline-device check: read, format, notify

use std::sync::Arc;

use offwatch_inventory::{InventoryReader, OfflineDevices, StoreConnector};
use offwatch_notify::{Mailer, Notifier};
use tracing::{info, instrument};

use crate::config::Config;
use crate::report::Report;

/// What a run did, for logging and tests
///
/// Mail delivery is fire-and-forget, so no delivery status is recorded here.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// `OfflineDevices::marker()` of the inventory step
    pub outcome: &'static str,
    /// Inventory failure that degraded the run, if any
    pub inventory_error: Option<String>,
    /// Devices listed in the report
    pub devices_reported: usize,
    /// The report that was handed to the notifier
    pub report: Report,
    /// Whether sending was skipped
    pub dry_run: bool,
}

/// Read → format → notify, strictly in sequence
pub struct Pipeline {
    config: Config,
    connector: Arc<dyn StoreConnector>,
    notifier: Notifier,
    reader: InventoryReader,
    dry_run: bool,
}

impl Pipeline {
    /// Create a pipeline
    pub fn new(
        config: Config,
        connector: Arc<dyn StoreConnector>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let notifier = Notifier::new(mailer, config.sender.as_str());
        Self {
            config,
            connector,
            notifier,
            reader: InventoryReader::new(),
            dry_run: false,
        }
    }

    /// Format the report but do not send it
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run once. Never fails: every step degrades instead.
    #[instrument(skip(self), fields(namespace = %self.config.inventory.namespace()))]
    pub async fn run(&self) -> RunSummary {
        info!("checking for offline devices");

        let devices: OfflineDevices = self
            .reader
            .fetch(self.connector.as_ref(), &self.config.inventory)
            .await;
        let outcome = devices.marker();
        let inventory_error = devices.error().map(ToString::to_string);

        let report = Report::from_records(&devices.into_records());

        if self.dry_run {
            info!(outcome, devices = report.line_count(), "dry run, report not sent\n{report}");
        } else {
            self.notifier
                .send_email(&self.config.recipient, &self.config.subject, report.as_str())
                .await;
        }

        info!(outcome, devices = report.line_count(), "offline device check finished");

        RunSummary {
            outcome,
            inventory_error,
            devices_reported: report.line_count(),
            report,
            dry_run: self.dry_run,
        }
    }
}
