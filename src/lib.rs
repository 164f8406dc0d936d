pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use config::Config;

// Errors, events and the aggregate trait
pub use common::*;

// navigation, intent, negotiation, oracle, logger
pub use domains::*;
