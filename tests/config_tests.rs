use grid_agents::domains::intent::LocationPreset;
use grid_agents::domains::navigation::{Position2D, StepCost};
use grid_agents::Config;
use std::io::Write;
use tokio_test::assert_ok;

const SCENE: &str = r#"
[grid]
width = 12
height = 8
node_size = 0.5
step_cost = "uniform"

[grid.obstacles]
probe_radius = 0.25

[[grid.obstacles.obstacles]]
id = "pond"
position = { x = 1.0, y = 1.0 }
shape = { kind = "circle", radius = 0.75 }

[movement]
speed = 3.0
arrival_radius = 0.05
tick_ms = 10

[oracle]
timeout_ms = 1500

[[agents]]
id = "alice"
display_name = "Alice"
mood = "curious"
start = { x = -1.0, y = 0.0 }

[[agents]]
id = "bob"
display_name = "Bob"

[negotiation]
max_retries = 3
participants = ["alice", "bob"]

[locations]
preset = "tea"

[logging]
level = "debug"
"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_config_from_toml_file() {
    let file = write_temp(SCENE);
    let config = Config::from_file(file.path()).await.unwrap();

    assert_eq!(config.grid.width, 12);
    assert_eq!(config.grid.step_cost, StepCost::Uniform);
    assert_eq!(config.grid.obstacles.obstacles.len(), 1);
    assert_eq!(config.movement.tick_ms, 10);
    assert_eq!(config.oracle.timeout_ms, 1500);
    assert_eq!(config.agents[0].start, Position2D::new(-1.0, 0.0));
    assert_eq!(config.agents[1].mood, "neutral");
    assert_eq!(config.negotiation.max_retries, 3);
    assert_eq!(config.locations.preset, LocationPreset::Tea);
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
    assert!(config.logging.transcript_file.is_none());

    let table = config.location_table().unwrap();
    assert!(table.get("cafe").is_some());
    assert!(table.get("library").is_none());
}

#[tokio::test]
async fn test_config_rejects_unknown_participant() {
    let file = write_temp(&SCENE.replace(r#"participants = ["alice", "bob"]"#, r#"participants = ["alice", "carol"]"#));
    let error = Config::from_file(file.path()).await.unwrap_err();
    assert!(error.to_string().contains("carol"));
}

#[test]
fn test_config_load_layers_file_over_defaults() {
    let file = write_temp(
        r#"
[oracle]
timeout_ms = 250

[locations]
preset = "tea"
"#,
    );
    let config = assert_ok!(Config::load(Some(file.path())));

    assert_eq!(config.oracle.timeout_ms, 250);
    assert_eq!(config.locations.preset, LocationPreset::Tea);
    assert_eq!(config.grid.width, Config::default().grid.width);
    assert_eq!(config.negotiation.participants, Config::default().negotiation.participants);
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert_ok!(config.validate());
    assert_eq!(config.location_table().unwrap().len(), 4);
    assert!(config.location_table().unwrap().get("LIBRARY").is_some());
}

#[test]
fn test_config_load_without_file_matches_defaults() {
    let config = assert_ok!(Config::load(None));
    let defaults = Config::default();

    assert_eq!(config.grid.width, defaults.grid.width);
    assert!(config.grid.obstacles.obstacles.is_empty());
    assert!(config.locations.custom.is_empty());
    assert!(config.logging.transcript_file.is_none());
    assert_eq!(config.agents.len(), defaults.agents.len());
}

#[test]
fn test_config_load_applies_env_overrides() {
    std::env::set_var("GRID_AGENTS__NEGOTIATION__MAX_RETRIES", "7");
    let loaded = Config::load(None);
    std::env::remove_var("GRID_AGENTS__NEGOTIATION__MAX_RETRIES");

    let config = assert_ok!(loaded);
    assert_eq!(config.negotiation.max_retries, 7);
}

#[test]
fn test_config_load_rejects_malformed_file() {
    let file = write_temp("[grid\nwidth = ");
    assert!(Config::load(Some(file.path())).is_err());
}
