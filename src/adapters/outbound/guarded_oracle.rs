use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::domains::oracle::{DynOracle, Oracle, OracleError};

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds every call to the wrapped oracle and rejects blank replies.
pub struct GuardedOracle {
    inner: DynOracle,
    timeout: Duration,
}

impl GuardedOracle {
    pub fn new(inner: DynOracle, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Oracle for GuardedOracle {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        let reply = match tokio::time::timeout(self.timeout, self.inner.ask(prompt)).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "oracle call timed out");
                return Err(OracleError::Timeout(self.timeout));
            }
        };
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(OracleError::EmptyReply);
        }
        Ok(reply.to_string())
    }
}
