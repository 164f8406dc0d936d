use crate::domains::navigation::GridCoord;
use crate::domains::oracle::OracleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("No path from {start} to {goal}")]
    NoPath { start: GridCoord, goal: GridCoord },

    #[error("Unknown location: {name}")]
    UnknownLocation { name: String },

    #[error("Stale reply for round {round_id}, current round is {current}")]
    StaleReply { round_id: String, current: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
