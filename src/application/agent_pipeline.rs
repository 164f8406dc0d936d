use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domains::intent::{
    intention_prompt, DispatchOutcome, Intent, Interpreter, ToolDispatcher, ORACLE_FAILURE,
};
use crate::domains::logger::DynLogger;
use crate::domains::oracle::DynOracle;

/// Everything one decision produced, from the agent's words to what the dispatcher did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub agent_id: String,
    pub reply: Option<String>,
    pub intent: Intent,
    pub outcome: DispatchOutcome,
}

/// Single-agent front end: ask the agent where it wants to go, structure the
/// answer with the interpreter model, then act on it.
pub struct AgentPipeline {
    agent_id: String,
    display_name: String,
    mood: String,
    agent_oracle: DynOracle,
    interpreter_oracle: DynOracle,
    dispatcher: Arc<ToolDispatcher>,
    logger: DynLogger,
}

impl AgentPipeline {
    pub fn new(
        agent_id: impl Into<String>,
        agent_oracle: DynOracle,
        interpreter_oracle: DynOracle,
        dispatcher: Arc<ToolDispatcher>,
        logger: DynLogger,
    ) -> Self {
        let agent_id = agent_id.into();
        Self {
            display_name: agent_id.clone(),
            agent_id,
            mood: "neutral".to_string(),
            agent_oracle,
            interpreter_oracle,
            dispatcher,
            logger,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = mood.into();
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub async fn decide(&self) -> DecisionReport {
        let locations = self.dispatcher.locations();
        let prompt = intention_prompt(locations, &self.mood);

        let (reply, mut intent) = match self.agent_oracle.ask(&prompt).await {
            Ok(reply) => {
                self.logger.info(&format!("{}: {}", self.display_name, reply));
                let intent =
                    Interpreter::interpret(self.interpreter_oracle.as_ref(), &self.display_name, &reply, locations)
                        .await;
                (Some(reply), intent)
            }
            Err(e) => {
                warn!(agent_id = %self.agent_id, error = %e, "agent oracle failed");
                (None, Intent::error(self.agent_id.clone(), ORACLE_FAILURE))
            }
        };

        // The interpreter labels agents however it likes; this pipeline only ever drives its own.
        intent.agent_id = self.agent_id.clone();

        let outcome = self.dispatcher.dispatch(&intent).await;
        info!(agent_id = %self.agent_id, tool = %intent.tool, context = %intent.context, "decision dispatched");
        DecisionReport { agent_id: self.agent_id.clone(), reply, intent, outcome }
    }
}
