use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::DomainResult;
use crate::domains::intent::{Location, LocationPreset, LocationTable};
use crate::domains::navigation::{GridSpec, MovementSettings, ObstacleLayer, Position2D, StepCost};
use crate::domains::negotiation::DEFAULT_MAX_RETRIES;

pub const ENV_PREFIX: &str = "GRID_AGENTS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    #[serde(default)]
    pub movement: MovementSettings,
    pub oracle: OracleConfig,
    pub agents: Vec<AgentConfig>,
    pub negotiation: NegotiationConfig,
    #[serde(default)]
    pub locations: LocationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub node_size: f64,
    #[serde(default)]
    pub center: Position2D,
    #[serde(default)]
    pub step_cost: StepCost,
    #[serde(default)]
    pub obstacles: ObstacleLayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Upper bound on any single oracle call.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub display_name: String,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub start: Position2D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationConfig {
    pub max_retries: u32,
    /// Agent ids, proposer first.
    pub participants: [String; 2],
}

/// Either a named preset or an explicit list; never both merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsConfig {
    #[serde(default)]
    pub preset: LocationPreset,
    #[serde(default)]
    pub custom: Vec<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Transcript file written through `fast_log`; console only when absent.
    #[serde(default)]
    pub transcript_file: Option<String>,
    pub level: String,
}

fn default_mood() -> String {
    "neutral".to_string()
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `path` if given, then `GRID_AGENTS__SECTION__KEY` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder().add_source(::config::Config::try_from(&Config::default())?);
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let config: Config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            bail!("grid must be at least 1x1, got {}x{}", self.grid.width, self.grid.height);
        }
        if self.grid.node_size.is_nan() || self.grid.node_size <= 0.0 {
            bail!("grid.node_size must be positive, got {}", self.grid.node_size);
        }
        if self.movement.speed.is_nan() || self.movement.speed <= 0.0 {
            bail!("movement.speed must be positive, got {}", self.movement.speed);
        }
        for participant in &self.negotiation.participants {
            if self.agent(participant).is_none() {
                bail!("negotiation participant '{}' is not a configured agent", participant);
            }
        }
        if self.negotiation.participants[0].eq_ignore_ascii_case(&self.negotiation.participants[1]) {
            bail!("negotiation needs two distinct participants");
        }
        Ok(())
    }

    pub fn agent(&self, id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.id.eq_ignore_ascii_case(id))
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(self.grid.width, self.grid.height, self.grid.node_size).centered_at(self.grid.center)
    }

    /// The deployment's single location table.
    pub fn location_table(&self) -> DomainResult<LocationTable> {
        if self.locations.custom.is_empty() {
            Ok(self.locations.preset.table())
        } else {
            LocationTable::new(self.locations.custom.clone())
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 32,
                height: 20,
                node_size: 1.0,
                center: Position2D::default(),
                step_cost: StepCost::default(),
                obstacles: ObstacleLayer::default(),
            },
            movement: MovementSettings::default(),
            oracle: OracleConfig { timeout_ms: 30_000 },
            agents: vec![
                AgentConfig {
                    id: "agent_1".to_string(),
                    display_name: "Agent 1".to_string(),
                    mood: "happy".to_string(),
                    start: Position2D::new(0.0, 0.0),
                },
                AgentConfig {
                    id: "agent_2".to_string(),
                    display_name: "Agent 2".to_string(),
                    mood: "tired".to_string(),
                    start: Position2D::new(1.0, -1.0),
                },
            ],
            negotiation: NegotiationConfig {
                max_retries: DEFAULT_MAX_RETRIES,
                participants: ["agent_1".to_string(), "agent_2".to_string()],
            },
            locations: LocationsConfig::default(),
            logging: LoggingConfig {
                transcript_file: None,
                level: "info".to_string(),
            },
        }
    }
}
