use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Fans every message out to all attached loggers, in order.
pub struct MultiLogger {
    sinks: Vec<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Console always; the transcript file too when `path` is given and the appender starts.
pub fn init_combined_logger(path: Option<&str>, level: log::LevelFilter) -> Arc<dyn DomainLogger> {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::file_logger::init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![console, file])),
        Err(e) => {
            tracing::warn!("{}; transcript goes to console only", e);
            console
        }
    }
}
