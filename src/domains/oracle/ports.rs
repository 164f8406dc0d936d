use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Oracle returned an empty reply")]
    EmptyReply,

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Port to the external language model: one prompt in, free text out.
/// Calls may take arbitrarily long; callers bound them (see `GuardedOracle`).
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError>;
}

pub type DynOracle = std::sync::Arc<dyn Oracle>;
