pub mod agent_pipeline;
pub mod negotiation_service;
pub mod simulation;

pub use agent_pipeline::*;
pub use negotiation_service::*;
pub use simulation::*;
