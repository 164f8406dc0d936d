use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::adapters::outbound::GuardedOracle;
use crate::common::ApplicationResult;
use crate::config::Config;
use crate::domains::intent::{LocationTable, ToolDispatcher};
use crate::domains::logger::DynLogger;
use crate::domains::navigation::{AgentMover, Grid, Pathfinder};
use crate::domains::negotiation::{ConversationLog, NegotiationCoordinator, Participant};
use crate::domains::oracle::DynOracle;

use super::agent_pipeline::AgentPipeline;
use super::negotiation_service::NegotiationService;

/// Who an oracle speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleRole<'a> {
    Agent(&'a str),
    Interpreter,
    Arbiter,
}

/// The assembled world: one grid, one location table, one mover per agent,
/// and the two front ends that drive them.
pub struct Simulation {
    pub grid: Arc<Grid>,
    pub locations: Arc<LocationTable>,
    pub dispatcher: Arc<ToolDispatcher>,
    movers: HashMap<String, Arc<AgentMover>>,
    pipelines: Vec<AgentPipeline>,
    negotiation: NegotiationService,
}

impl Simulation {
    /// Build everything `config` describes. `oracle_for` supplies the raw oracle for each
    /// role; every one of them is wrapped with the configured timeout.
    pub fn assemble<F>(config: &Config, logger: DynLogger, mut oracle_for: F) -> ApplicationResult<Self>
    where
        F: FnMut(OracleRole<'_>) -> DynOracle,
    {
        config.validate()?;
        let timeout = Duration::from_millis(config.oracle.timeout_ms);
        let mut guarded = |role: OracleRole<'_>| -> DynOracle {
            Arc::new(GuardedOracle::new(oracle_for(role), timeout))
        };

        let grid = Arc::new(Grid::build(&config.grid_spec(), &config.grid.obstacles)?);
        let pathfinder = Arc::new(Pathfinder::new(Arc::clone(&grid)).with_step_cost(config.grid.step_cost));
        let locations = Arc::new(config.location_table()?);

        let mut dispatcher = ToolDispatcher::new(Arc::clone(&locations), logger.clone());
        let mut movers = HashMap::new();
        for agent in &config.agents {
            let mover = Arc::new(AgentMover::new(
                agent.id.clone(),
                Arc::clone(&pathfinder),
                agent.start,
                config.movement.clone(),
            ));
            dispatcher.register(Arc::clone(&mover));
            movers.insert(agent.id.to_lowercase(), mover);
        }
        let dispatcher = Arc::new(dispatcher);

        let interpreter = guarded(OracleRole::Interpreter);
        let mut agent_oracles = HashMap::new();
        let mut pipelines = Vec::with_capacity(config.agents.len());
        for agent in &config.agents {
            let oracle = guarded(OracleRole::Agent(&agent.id));
            agent_oracles.insert(agent.id.to_lowercase(), Arc::clone(&oracle));
            pipelines.push(
                AgentPipeline::new(
                    agent.id.clone(),
                    oracle,
                    Arc::clone(&interpreter),
                    Arc::clone(&dispatcher),
                    logger.clone(),
                )
                .with_display_name(agent.display_name.clone())
                .with_mood(agent.mood.clone()),
            );
        }

        let mut log = ConversationLog::new();
        let mut participants = Vec::with_capacity(2);
        for id in &config.negotiation.participants {
            let (display_name, oracle) = match (config.agent(id), agent_oracles.get(&id.to_lowercase())) {
                (Some(agent), Some(oracle)) => (agent.display_name.clone(), Arc::clone(oracle)),
                _ => (id.clone(), guarded(OracleRole::Agent(id))),
            };
            log = log.with_display_name(id, &display_name);
            participants.push(Participant::new(id.clone(), display_name, oracle));
        }
        let [first, second]: [Participant; 2] = participants
            .try_into()
            .map_err(|_| anyhow::anyhow!("negotiation needs exactly two participants"))?;

        let coordinator = NegotiationCoordinator::new(
            [first, second],
            guarded(OracleRole::Arbiter),
            Arc::clone(&dispatcher),
            config.negotiation.max_retries,
            logger,
        );
        let negotiation = NegotiationService::new(coordinator, log);

        info!(
            width = grid.width(),
            height = grid.height(),
            walkable = grid.walkable_count(),
            agents = movers.len(),
            locations = locations.len(),
            "simulation assembled"
        );
        Ok(Self { grid, locations, dispatcher, movers, pipelines, negotiation })
    }

    pub fn mover(&self, agent_id: &str) -> Option<&Arc<AgentMover>> {
        self.movers.get(&agent_id.to_lowercase())
    }

    pub fn pipelines(&self) -> &[AgentPipeline] {
        &self.pipelines
    }

    pub fn negotiation(&self) -> &NegotiationService {
        &self.negotiation
    }

    /// Stop every agent and put it back at its start position.
    pub async fn reset(&self) {
        for mover in self.movers.values() {
            mover.reset_position().await;
        }
        self.negotiation.cancel().await;
    }
}
