//! High-level inventory reader
//!
//! Wraps a [`StoreConnector`] with the degrade-on-failure policy: connect and query
//! failures are logged and turned into an [`OfflineDevices`] outcome instead of being
//! propagated, so a run always has a (possibly empty) device list to report.

use tracing::{info, instrument, warn};

use crate::config::InventorySettings;
use crate::error::InventoryError;
use crate::query::StatusFilter;
use crate::traits::{DeviceStore, StoreConnector};
use crate::types::DeviceRecord;

/// A live, pinged session with the inventory store
///
/// Owned by one run. Call [`InventorySession::close`] when done; dropping also releases
/// the client.
pub struct InventorySession {
    store: Box<dyn DeviceStore>,
    namespace: String,
}

impl InventorySession {
    /// Release the session
    pub async fn close(self) {
        self.store.close().await;
        info!(namespace = %self.namespace, "document store session closed");
    }
}

/// Outcome of one offline-device lookup
#[derive(Debug, Clone)]
pub enum OfflineDevices {
    /// The query returned matching records
    Found(Vec<DeviceRecord>),
    /// The query ran and matched nothing
    NoneFound,
    /// The query was issued and failed
    QueryFailed(InventoryError),
    /// No session was available, the query was skipped
    Unavailable(InventoryError),
}

impl OfflineDevices {
    /// Stable marker used as the `outcome` log field
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            OfflineDevices::Found(_) => "found",
            OfflineDevices::NoneFound => "none_found",
            OfflineDevices::QueryFailed(_) => "query_failed",
            OfflineDevices::Unavailable(_) => "store_unavailable",
        }
    }

    /// Records to report; every failure collapses to an empty list
    #[must_use]
    pub fn into_records(self) -> Vec<DeviceRecord> {
        match self {
            OfflineDevices::Found(records) => records,
            _ => Vec::new(),
        }
    }

    /// Number of records found
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            OfflineDevices::Found(records) => records.len(),
            _ => 0,
        }
    }

    /// Whether there is nothing to report
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The failure behind this outcome, if any
    #[must_use]
    pub fn error(&self) -> Option<&InventoryError> {
        match self {
            OfflineDevices::QueryFailed(e) | OfflineDevices::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

/// Reads offline devices from the inventory store
pub struct InventoryReader {
    filter: StatusFilter,
}

impl Default for InventoryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryReader {
    /// Reader for devices with `status == "inactive"`
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: StatusFilter::inactive(),
        }
    }

    /// Open a session and verify it with a ping
    ///
    /// # Errors
    /// Returns an error if the store cannot be reached or does not answer the ping.
    #[instrument(skip(connector, settings), fields(namespace = %settings.namespace()))]
    pub async fn connect(
        connector: &dyn StoreConnector,
        settings: &InventorySettings,
    ) -> Result<InventorySession, InventoryError> {
        let result = match connector.connect(settings).await {
            Ok(store) => match store.ping().await {
                Ok(()) => Ok(InventorySession {
                    store,
                    namespace: settings.namespace(),
                }),
                Err(e) => {
                    store.close().await;
                    Err(e)
                }
            },
            Err(e) => Err(e),
        };

        match &result {
            Ok(session) => info!(
                store = session.store.store_type(),
                "connected to the document store"
            ),
            Err(e) => warn!(error = %e, "connection to the document store failed"),
        }

        result
    }

    /// Query for offline devices
    ///
    /// `None` means an earlier connect failed; the query is skipped.
    #[instrument(skip(self, session), fields(filter = %self.filter))]
    pub async fn get_offline_devices(&self, session: Option<&InventorySession>) -> OfflineDevices {
        let Some(session) = session else {
            return skipped(InventoryError::NotConnected);
        };

        match session.store.find(&self.filter).await {
            Ok(records) if records.is_empty() => {
                let devices = OfflineDevices::NoneFound;
                info!(
                    outcome = devices.marker(),
                    namespace = %session.namespace,
                    "there are no offline devices in this collection"
                );
                devices
            }
            Ok(records) => {
                let devices = OfflineDevices::Found(records);
                info!(
                    outcome = devices.marker(),
                    devices = devices.len(),
                    "offline devices found"
                );
                devices
            }
            Err(e) => {
                let error = e.to_string();
                let devices = OfflineDevices::QueryFailed(e);
                warn!(outcome = devices.marker(), %error, "failed to get offline devices");
                devices
            }
        }
    }

    /// Connect, query and close in one step
    pub async fn fetch(
        &self,
        connector: &dyn StoreConnector,
        settings: &InventorySettings,
    ) -> OfflineDevices {
        match Self::connect(connector, settings).await {
            Ok(session) => {
                let devices = self.get_offline_devices(Some(&session)).await;
                session.close().await;
                devices
            }
            Err(e) => skipped(e),
        }
    }
}

fn skipped(error: InventoryError) -> OfflineDevices {
    let devices = OfflineDevices::Unavailable(error);
    warn!(
        outcome = devices.marker(),
        "skipping offline device query, no store session"
    );
    devices
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use mongodb::bson::doc;
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Default)]
    struct Counters {
        finds: AtomicUsize,
        closes: AtomicUsize,
    }

    struct MockStore {
        rows: Result<Vec<DeviceRecord>, InventoryError>,
        ping_ok: bool,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl DeviceStore for MockStore {
        async fn ping(&self) -> Result<(), InventoryError> {
            if self.ping_ok {
                Ok(())
            } else {
                Err(InventoryError::PingFailed("no reply".into()))
            }
        }

        async fn find(&self, filter: &StatusFilter) -> Result<Vec<DeviceRecord>, InventoryError> {
            self.counters.finds.fetch_add(1, Ordering::SeqCst);
            self.rows.clone().map(|rows| {
                rows.into_iter()
                    .filter(|r| filter.matches(r.document()))
                    .collect()
            })
        }

        async fn close(&self) {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }

        fn store_type(&self) -> &'static str {
            "mock"
        }
    }

    struct MockConnector {
        rows: Result<Vec<DeviceRecord>, InventoryError>,
        reachable: bool,
        ping_ok: bool,
        counters: Arc<Counters>,
    }

    impl MockConnector {
        fn with_rows(rows: Vec<DeviceRecord>) -> Self {
            Self {
                rows: Ok(rows),
                reachable: true,
                ping_ok: true,
                counters: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl StoreConnector for MockConnector {
        async fn connect(
            &self,
            _settings: &InventorySettings,
        ) -> Result<Box<dyn DeviceStore>, InventoryError> {
            if !self.reachable {
                return Err(InventoryError::ConnectionFailed("host unreachable".into()));
            }
            Ok(Box::new(MockStore {
                rows: self.rows.clone(),
                ping_ok: self.ping_ok,
                counters: Arc::clone(&self.counters),
            }))
        }
    }

    fn settings() -> InventorySettings {
        InventorySettings::new("mongodb://mock")
    }

    fn device(id: i32, status: &str) -> DeviceRecord {
        DeviceRecord::new(doc! { "_id": id, "status": status })
    }

    #[tokio::test]
    async fn test_found_keeps_store_order() {
        let connector = MockConnector::with_rows(vec![
            device(3, "inactive"),
            device(1, "active"),
            device(2, "inactive"),
        ]);

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        assert_eq!(devices.marker(), "found");
        let ids: Vec<i32> = devices
            .into_records()
            .iter()
            .map(|r| r.document().get_i32("_id").unwrap())
            .collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(connector.counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_matches_is_empty_not_absent() {
        let connector = MockConnector::with_rows(vec![device(1, "active")]);

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        assert!(matches!(devices, OfflineDevices::NoneFound));
        assert!(devices.error().is_none());
        assert!(devices.into_records().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_collapses_to_empty() {
        let connector = MockConnector {
            rows: Err(InventoryError::QueryFailed("cursor killed".into())),
            ..MockConnector::with_rows(vec![])
        };

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        assert_eq!(devices.marker(), "query_failed");
        assert!(!devices.error().unwrap().is_connect_failure());
        assert!(devices.into_records().is_empty());
        assert_eq!(connector.counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_skips_query() {
        let connector = MockConnector {
            reachable: false,
            ..MockConnector::with_rows(vec![device(1, "inactive")])
        };

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        assert_eq!(devices.marker(), "store_unavailable");
        assert!(matches!(
            devices.error(),
            Some(InventoryError::ConnectionFailed(_))
        ));
        assert_eq!(connector.counters.finds.load(Ordering::SeqCst), 0);
        assert!(devices.into_records().is_empty());
    }

    #[tokio::test]
    async fn test_failed_ping_releases_store() {
        let connector = MockConnector {
            ping_ok: false,
            ..MockConnector::with_rows(vec![device(1, "inactive")])
        };

        let result = InventoryReader::connect(&connector, &settings()).await;

        assert!(matches!(result, Err(InventoryError::PingFailed(_))));
        assert_eq!(connector.counters.closes.load(Ordering::SeqCst), 1);
        assert_eq!(connector.counters.finds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_session() {
        let devices = InventoryReader::new().get_offline_devices(None).await;

        assert!(matches!(
            devices,
            OfflineDevices::Unavailable(InventoryError::NotConnected)
        ));
        assert!(devices.is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (LogBuffer, DefaultGuard) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (buffer, guard)
    }

    fn outcome_field(devices: &OfflineDevices) -> String {
        format!("outcome=\"{}\"", devices.marker())
    }

    #[tokio::test]
    async fn test_unavailable_diagnostic() {
        let (logs, _guard) = capture_logs();
        let connector = MockConnector {
            reachable: false,
            ..MockConnector::with_rows(vec![])
        };

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        let logs = logs.contents();
        assert!(logs.contains("connection to the document store failed"));
        assert!(logs.contains("skipping offline device query, no store session"));
        assert!(logs.contains(&outcome_field(&devices)));
        assert!(logs.contains("outcome=\"store_unavailable\""));
        assert!(!logs.contains("there are no offline devices"));
    }

    #[tokio::test]
    async fn test_none_found_diagnostic() {
        let (logs, _guard) = capture_logs();
        let connector = MockConnector::with_rows(vec![device(1, "active")]);

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        let logs = logs.contents();
        assert!(logs.contains("connected to the document store"));
        assert!(logs.contains("there are no offline devices in this collection"));
        assert!(logs.contains(&outcome_field(&devices)));
        assert!(logs.contains("outcome=\"none_found\""));
        assert!(!logs.contains("skipping offline device query"));
    }

    #[tokio::test]
    async fn test_query_failed_diagnostic() {
        let (logs, _guard) = capture_logs();
        let connector = MockConnector {
            rows: Err(InventoryError::QueryFailed("cursor killed".into())),
            ..MockConnector::with_rows(vec![])
        };

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        let logs = logs.contents();
        assert!(logs.contains("failed to get offline devices"));
        assert!(logs.contains("cursor killed"));
        assert!(logs.contains(&outcome_field(&devices)));
        assert!(logs.contains("outcome=\"query_failed\""));
        assert!(!logs.contains("skipping offline device query"));
    }

    #[tokio::test]
    async fn test_found_diagnostic() {
        let (logs, _guard) = capture_logs();
        let connector = MockConnector::with_rows(vec![device(1, "inactive")]);

        let devices = InventoryReader::new().fetch(&connector, &settings()).await;

        let logs = logs.contents();
        assert!(logs.contains("offline devices found"));
        assert!(logs.contains(&outcome_field(&devices)));
        assert!(logs.contains("outcome=\"found\""));
        assert!(logs.contains("document store session closed"));
    }
}
