use grid_agents::adapters::outbound::{init_console_logger, init_noop_logger, MultiLogger, ScriptedOracle};
use grid_agents::application::{OracleRole, Simulation};
use grid_agents::domains::intent::{Intent, LocationPreset, ToolDispatcher};
use grid_agents::domains::logger::DomainLogger;
use grid_agents::domains::oracle::DynOracle;
use grid_agents::domains::negotiation::NegotiationOutcome;
use grid_agents::Config;
use std::sync::{Arc, Mutex};

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
    fn snapshot(&self) -> Vec<String> { self.messages.lock().unwrap().clone() }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[tokio::test]
async fn test_dispatcher_reports_through_injected_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let dispatcher = ToolDispatcher::new(
        Arc::new(LocationPreset::Town.table()),
        capture.clone() as Arc<dyn DomainLogger>,
    );

    dispatcher.dispatch(&Intent::movement("agent_1", "park")).await;
    dispatcher.dispatch(&Intent::error("agent_1", "Invalid structured output.")).await;

    let msgs = capture.snapshot();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:") && m.contains("agent_1")));
    assert!(msgs.iter().any(|m| m.starts_with("WARN:") && m.contains("Invalid structured output.")));
}

#[tokio::test]
async fn test_multi_logger_fans_out_in_order() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![
        first.clone() as Arc<dyn DomainLogger>,
        init_noop_logger(),
        init_console_logger(),
        second.clone() as Arc<dyn DomainLogger>,
    ]);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    let expected = vec!["INFO:one".to_string(), "WARN:two".to_string(), "ERR:three".to_string()];
    assert_eq!(first.snapshot(), expected);
    assert_eq!(second.snapshot(), expected);
}

#[tokio::test(start_paused = true)]
async fn test_simulation_negotiation_logs_agreement() {
    let capture = Arc::new(BridgeCapture::new());
    let mut config = Config::default();
    config.locations.preset = LocationPreset::Tea;

    let simulation = Simulation::assemble(&config, capture.clone(), |role| -> DynOracle {
        match role {
            OracleRole::Agent(id) if id == "agent_1" => Arc::new(ScriptedOracle::new(["The cafe?"])),
            OracleRole::Agent(_) => Arc::new(ScriptedOracle::new(["Location: cafe"])),
            OracleRole::Interpreter => Arc::new(ScriptedOracle::new(Vec::<String>::new())),
            OracleRole::Arbiter => Arc::new(ScriptedOracle::new(["final choice cafe"])),
        }
    })
    .unwrap();

    assert_eq!(simulation.pipelines().len(), 2);
    let service = simulation.negotiation();
    service.start().await;
    let outcome = service.wait().await.unwrap();
    assert!(matches!(outcome, NegotiationOutcome::Agreed { ref location, .. } if location == "cafe"));

    let msgs = capture.snapshot();
    assert!(msgs.iter().any(|m| m == "INFO:Both agents agreed on cafe. Moving..."));
    assert!(service.transcript().contains("Agent 1: The cafe?"));

    simulation.reset().await;
    let mover = simulation.mover("agent_1").unwrap();
    assert_eq!(mover.position().await, config.agents[0].start);
}
