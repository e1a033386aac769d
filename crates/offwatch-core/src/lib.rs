//! offwatch-core: report formatting and the run pipeline
//!
//! Ties the inventory reader to the notifier: one query, one report, one email per run.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{Config, DEFAULT_SUBJECT, REQUIRED_ENV_VARS};
pub use error::ConfigError;
pub use pipeline::{Pipeline, RunSummary};
pub use report::{REPORT_HEADER, Report, generate_report_body};
