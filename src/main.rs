use grid_agents::adapters::outbound::{init_combined_logger, KeywordOracle, RandomOracle};
use grid_agents::application::{OracleRole, Simulation};
use grid_agents::domains::oracle::DynOracle;
use grid_agents::Config;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting grid-agents");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config.toml")).filter(|p| p.exists()));
    // Without a file the defaults plus environment overrides apply.
    let config = Config::load(path.as_deref())?;
    info!(config = ?path, "configuration loaded");

    let logger = init_combined_logger(config.logging.transcript_file.as_deref(), config.log_level());
    let locations = Arc::new(config.location_table()?);
    let names: Vec<String> = locations.names().map(str::to_string).collect();

    let simulation = Simulation::assemble(&config, logger, |role| -> DynOracle {
        match role {
            OracleRole::Interpreter => Arc::new(KeywordOracle::new(Arc::clone(&locations))),
            OracleRole::Agent(_) | OracleRole::Arbiter => Arc::new(RandomOracle::new(names.clone())),
        }
    })?;

    for pipeline in simulation.pipelines() {
        let report = pipeline.decide().await;
        info!(agent_id = %report.agent_id, outcome = ?report.outcome, "decision");
    }
    for pipeline in simulation.pipelines() {
        if let Some(mover) = simulation.mover(pipeline.agent_id()) {
            let state = mover.wait_until_stopped().await;
            info!(agent_id = %pipeline.agent_id(), state = ?state, "agent settled");
        }
    }

    let service = simulation.negotiation();
    let negotiation_id = service.start().await;
    info!(%negotiation_id, "negotiation started");

    tokio::select! {
        outcome = service.wait() => {
            let outcome = outcome?;
            info!(outcome = ?outcome, "negotiation finished");
            println!("{}", service.transcript());
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling negotiation");
            service.cancel().await;
        }
    }

    simulation.reset().await;
    info!("Shutting down grid-agents");
    Ok(())
}
