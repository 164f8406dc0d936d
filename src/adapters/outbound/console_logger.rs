use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards transcript messages to the `tracing` subscriber under the `transcript` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) { tracing::info!(target: "transcript", "{}", msg); }
    fn warn(&self, msg: &str) { tracing::warn!(target: "transcript", "{}", msg); }
    fn error(&self, msg: &str) { tracing::error!(target: "transcript", "{}", msg); }
}

pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge)
}
