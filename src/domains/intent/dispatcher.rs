use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::locations::LocationTable;
use super::types::{Intent, Tool};
use crate::domains::logger::DynLogger;
use crate::domains::navigation::{AgentMover, Position2D};

/// What happened to an intent. Failures are values the caller sees, not log lines only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DispatchOutcome {
    Moving {
        agent_id: String,
        location: String,
        destination: Position2D,
        waypoints: usize,
    },
    NoPath {
        agent_id: String,
        location: String,
        reason: String,
    },
    UnresolvedLocation {
        agent_id: String,
        location: String,
    },
    UnknownAgent {
        agent_id: String,
    },
    /// An `Error` intent was surfaced; nothing moved.
    Reset {
        agent_id: String,
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn is_moving(&self) -> bool {
        matches!(self, DispatchOutcome::Moving { .. })
    }
}

/// Routes intents to the Move or Error handler for the agent they name.
pub struct ToolDispatcher {
    locations: Arc<LocationTable>,
    movers: HashMap<String, Arc<AgentMover>>,
    logger: DynLogger,
}

impl ToolDispatcher {
    pub fn new(locations: Arc<LocationTable>, logger: DynLogger) -> Self {
        Self { locations, movers: HashMap::new(), logger }
    }

    pub fn register(&mut self, mover: Arc<AgentMover>) {
        self.movers.insert(mover.agent_id().to_lowercase(), mover);
    }

    pub fn with_mover(mut self, mover: Arc<AgentMover>) -> Self {
        self.register(mover);
        self
    }

    pub fn mover(&self, agent_id: &str) -> Option<&Arc<AgentMover>> {
        self.movers.get(&agent_id.trim().to_lowercase())
    }

    pub fn locations(&self) -> &Arc<LocationTable> {
        &self.locations
    }

    pub async fn dispatch(&self, intent: &Intent) -> DispatchOutcome {
        match intent.tool {
            Tool::Move => self.execute_move(intent).await,
            Tool::Error => self.execute_reset(intent),
        }
    }

    async fn execute_move(&self, intent: &Intent) -> DispatchOutcome {
        let agent_id = intent.agent_id.clone();
        let Some(mover) = self.mover(&agent_id) else {
            self.logger.error(&format!("No agent registered as '{}'", agent_id));
            return DispatchOutcome::UnknownAgent { agent_id };
        };

        let location = intent.context.trim().to_string();
        let destination = match self.locations.resolve(&location) {
            Ok(destination) => destination,
            Err(e) => {
                self.logger.warn(&format!("{}: {}", agent_id, e));
                return DispatchOutcome::UnresolvedLocation { agent_id, location };
            }
        };

        match mover.move_to(destination).await {
            Ok(path) => {
                self.logger.info(&format!(
                    "{} heading to {} at {} via {} waypoints",
                    agent_id,
                    location,
                    destination,
                    path.waypoints.len()
                ));
                DispatchOutcome::Moving {
                    agent_id,
                    location,
                    destination,
                    waypoints: path.waypoints.len(),
                }
            }
            Err(e) => {
                self.logger.warn(&format!("{} cannot reach {}: {}", agent_id, location, e));
                DispatchOutcome::NoPath { agent_id, location, reason: e.to_string() }
            }
        }
    }

    fn execute_reset(&self, intent: &Intent) -> DispatchOutcome {
        self.logger.warn(&format!("Invalid response from {}: {}", intent.agent_id, intent.context));
        DispatchOutcome::Reset {
            agent_id: intent.agent_id.clone(),
            reason: intent.context.clone(),
        }
    }
}
