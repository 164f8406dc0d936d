use grid_agents::adapters::outbound::{init_noop_logger, ScriptedOracle};
use grid_agents::application::AgentPipeline;
use grid_agents::domains::intent::*;
use grid_agents::domains::navigation::*;
use grid_agents::domains::oracle::{DynOracle, OracleError};
use std::sync::Arc;

#[test]
fn test_interpreter_parses_well_formed_triple() {
    let intent = Interpreter::parse(r#"["agent_1","MOVE","PARK"]"#);
    assert_eq!(
        intent,
        Intent { agent_id: "agent_1".to_string(), tool: Tool::Move, context: "PARK".to_string() }
    );
}

#[test]
fn test_interpreter_rejects_two_tokens() {
    let intent = Interpreter::parse(r#"["agent_1","MOVE"]"#);
    assert_eq!(intent.tool, Tool::Error);
    assert_eq!(intent.context, "Invalid structured output.");
    assert_eq!(intent.agent_id, "agent_1");
}

#[test]
fn test_interpreter_rejects_unknown_tool() {
    let intent = Interpreter::parse(r#"["agent_1","FLY","PARK"]"#);
    assert_eq!(intent.tool, Tool::Error);
    assert_eq!(intent.context, "Unknown tool detected.");
}

#[test]
fn test_interpreter_handles_single_quotes_and_spacing() {
    let intent = Interpreter::parse("  [ 'agent_2' ,  MOVE , 'LIBRARY' ]  ");
    assert_eq!(intent, Intent::movement("agent_2", "LIBRARY"));

    let garbage = Interpreter::parse("");
    assert!(garbage.is_error());
    assert_eq!(garbage.context, INVALID_STRUCTURED_OUTPUT);
}

#[tokio::test]
async fn test_interpret_turns_oracle_failure_into_error_intent() {
    let oracle = ScriptedOracle::new(Vec::<String>::new());
    oracle.push_failure(OracleError::EmptyReply);

    let intent = Interpreter::interpret(&oracle, "agent_1", "the park!", &LocationPreset::Town.table()).await;
    assert_eq!(intent, Intent::error("agent_1", ORACLE_FAILURE));

    let prompts = oracle.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"the park!\""));
    assert!(prompts[0].contains("PARK, HOME, GYM, LIBRARY"));
}

fn town_world() -> (Arc<Pathfinder>, Arc<LocationTable>) {
    let spec = GridSpec::new(32, 20, 1.0);
    let grid = Arc::new(Grid::build(&spec, &ObstacleLayer::default()).unwrap());
    (Arc::new(Pathfinder::new(grid)), Arc::new(LocationPreset::Town.table()))
}

fn dispatcher_with_agent(agent_id: &str) -> (ToolDispatcher, Arc<AgentMover>) {
    let (pathfinder, locations) = town_world();
    let mover = Arc::new(AgentMover::new(
        agent_id,
        pathfinder,
        Position2D::new(0.0, 0.0),
        MovementSettings::default(),
    ));
    let dispatcher = ToolDispatcher::new(locations, init_noop_logger()).with_mover(Arc::clone(&mover));
    (dispatcher, mover)
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_move_starts_motion() {
    let (dispatcher, mover) = dispatcher_with_agent("agent_1");

    let outcome = dispatcher.dispatch(&Intent::movement("AGENT_1", "park")).await;
    match &outcome {
        DispatchOutcome::Moving { agent_id, location, destination, waypoints } => {
            assert_eq!(agent_id, "AGENT_1");
            assert_eq!(location, "park");
            assert_eq!(*destination, Position2D::new(-7.0, 4.0));
            assert!(*waypoints >= 1);
        }
        other => panic!("expected Moving, got {:?}", other),
    }
    assert!(matches!(mover.motion(), MotionState::Moving { .. }));
    assert!(matches!(mover.wait_until_stopped().await, MotionState::Arrived { .. }));
}

#[tokio::test]
async fn test_dispatch_unknown_location_is_reported() {
    let (dispatcher, mover) = dispatcher_with_agent("agent_1");

    let outcome = dispatcher.dispatch(&Intent::movement("agent_1", "moon")).await;
    assert_eq!(
        outcome,
        DispatchOutcome::UnresolvedLocation { agent_id: "agent_1".to_string(), location: "moon".to_string() }
    );
    assert_eq!(mover.motion(), MotionState::Idle);
}

#[tokio::test]
async fn test_dispatch_error_intent_resets_without_moving() {
    let (dispatcher, mover) = dispatcher_with_agent("agent_1");

    let outcome = dispatcher.dispatch(&Intent::error("agent_1", UNKNOWN_TOOL)).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Reset { agent_id: "agent_1".to_string(), reason: UNKNOWN_TOOL.to_string() }
    );
    assert_eq!(mover.motion(), MotionState::Idle);
    assert_eq!(mover.position().await, Position2D::new(0.0, 0.0));
}

#[tokio::test]
async fn test_dispatch_unknown_agent() {
    let (dispatcher, _mover) = dispatcher_with_agent("agent_1");

    let outcome = dispatcher.dispatch(&Intent::movement("agent_9", "park")).await;
    assert_eq!(outcome, DispatchOutcome::UnknownAgent { agent_id: "agent_9".to_string() });
}

#[tokio::test(start_paused = true)]
async fn test_pipeline_runs_agent_then_interpreter_then_dispatch() {
    let (dispatcher, mover) = dispatcher_with_agent("agent_1");
    let agent: DynOracle = Arc::new(ScriptedOracle::new(["The gym, I have energy to burn."]));
    let interpreter = Arc::new(ScriptedOracle::new(["['agent_7', MOVE, GYM]"]));

    let pipeline = AgentPipeline::new(
        "agent_1",
        agent,
        interpreter.clone(),
        Arc::new(dispatcher),
        init_noop_logger(),
    )
    .with_mood("energetic");

    let report = pipeline.decide().await;
    assert_eq!(report.reply.as_deref(), Some("The gym, I have energy to burn."));
    assert_eq!(report.intent, Intent::movement("agent_1", "GYM"));
    assert!(report.outcome.is_moving());
    assert!(interpreter.prompts()[0].contains("energy to burn"));

    let expected = mover.wait_until_stopped().await;
    assert!(matches!(expected, MotionState::Arrived { .. }));
}

#[tokio::test]
async fn test_pipeline_agent_oracle_failure_resets() {
    let (dispatcher, mover) = dispatcher_with_agent("agent_1");
    let interpreter = Arc::new(ScriptedOracle::new(Vec::<String>::new()));

    let pipeline = AgentPipeline::new(
        "agent_1",
        Arc::new(ScriptedOracle::new(Vec::<String>::new())),
        interpreter.clone(),
        Arc::new(dispatcher),
        init_noop_logger(),
    );

    let report = pipeline.decide().await;
    assert!(report.reply.is_none());
    assert_eq!(report.intent, Intent::error("agent_1", ORACLE_FAILURE));
    assert!(matches!(report.outcome, DispatchOutcome::Reset { .. }));
    assert!(interpreter.prompts().is_empty());
    assert_eq!(mover.motion(), MotionState::Idle);
}
