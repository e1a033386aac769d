//! Plain-text offline device report

use std::fmt;

use offwatch_inventory::DeviceRecord;

/// First line of every report
pub const REPORT_HEADER: &str = "The following devices are currently offline:";

/// Header, a blank line, then one line per record in input order
#[must_use]
pub fn generate_report_body(devices: &[DeviceRecord]) -> String {
    let mut body = String::with_capacity(REPORT_HEADER.len() + 2 + devices.len() * 64);
    body.push_str(REPORT_HEADER);
    body.push_str("\n\n");
    for device in devices {
        use std::fmt::Write;
        let _ = writeln!(body, "{device}");
    }
    body
}

/// Rendered report for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    body: String,
    devices: usize,
}

impl Report {
    #[must_use]
    pub fn from_records(devices: &[DeviceRecord]) -> Self {
        Self {
            body: generate_report_body(devices),
            devices: devices.len(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Number of device lines
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.devices
    }

    /// Whether only the header is present
    #[must_use]
    pub fn is_header_only(&self) -> bool {
        self.devices == 0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
