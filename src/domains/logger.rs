use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;

/// Logging port for transcript-level messages (agent choices, negotiation
/// outcomes). Engine diagnostics go through `tracing` instead.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Writes through the `log` facade into a `fast_log` file appender.
pub struct FileLogger;

impl FileLogger {
    /// Install the global `fast_log` logger. Only the first call in a process succeeds.
    pub fn init(path: &str, level: log::LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))?;
        Ok(())
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}
