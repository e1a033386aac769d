//! offwatch
//!
//! Scheduled check that emails a report of inactive devices

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

mod handler;
mod logging;

use handler::InvocationContext;
use logging::LogFormat;

/// Offline device report
#[derive(Parser, Debug)]
#[command(name = "offwatch", version, about)]
struct Args {
    /// Trigger event payload (JSON); ignored by the check itself
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Build and log the report without sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let config = offwatch_core::Config::from_env()?;

    logging::init(args.log_format, &config.log_level)?;

    let event = handler::read_event(args.event.as_deref())?;
    let context = InvocationContext::new();

    handler::handler(event, context, config, args.dry_run).await;

    Ok(())
}
