use grid_agents::adapters::outbound::*;
use grid_agents::domains::intent::{interpretation_prompt, Interpreter, LocationPreset};
use grid_agents::domains::oracle::{DynOracle, Oracle, OracleError};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[tokio::test(start_paused = true)]
async fn test_guarded_oracle_times_out_slow_calls() {
    let slow: DynOracle = Arc::new(ScriptedOracle::new(["too late"]).with_delay(Duration::from_secs(60)));
    let guarded = GuardedOracle::new(slow, Duration::from_secs(5));

    let result = guarded.ask("anyone there?").await;
    assert_eq!(result, Err(OracleError::Timeout(Duration::from_secs(5))));
}

#[tokio::test]
async fn test_guarded_oracle_rejects_blank_and_trims() {
    let inner: DynOracle = Arc::new(ScriptedOracle::new(["   \n", "  park \n"]));
    let guarded = GuardedOracle::new(inner, DEFAULT_ORACLE_TIMEOUT);

    assert_eq!(guarded.ask("first").await, Err(OracleError::EmptyReply));
    assert_eq!(guarded.ask("second").await, Ok("park".to_string()));
}

#[tokio::test]
async fn test_guarded_oracle_passes_inner_errors_through() {
    let inner = Arc::new(ScriptedOracle::new(Vec::<String>::new()));
    inner.push_failure(OracleError::Unavailable("model crashed".to_string()));
    let guarded = GuardedOracle::new(inner, DEFAULT_ORACLE_TIMEOUT);

    assert_eq!(
        guarded.ask("hello").await,
        Err(OracleError::Unavailable("model crashed".to_string()))
    );
}

#[tokio::test]
async fn test_scripted_oracle_replays_in_order() {
    let oracle = ScriptedOracle::new(["one", "two"]);
    oracle.push_reply("three");
    assert_eq!(oracle.remaining(), 3);

    assert_eq!(oracle.ask("a").await.unwrap(), "one");
    assert_eq!(oracle.ask("b").await.unwrap(), "two");
    assert_eq!(oracle.ask("c").await.unwrap(), "three");
    assert!(matches!(oracle.ask("d").await, Err(OracleError::Unavailable(_))));
    assert_eq!(oracle.prompts(), vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_random_oracle_names_a_known_location() {
    let table = LocationPreset::Tea.table();
    let oracle = RandomOracle::new(table.names().map(str::to_string).collect());

    for _ in 0..20 {
        let reply = assert_ok!(oracle.ask("where to?").await);
        assert!(table.find_in(&reply).is_some(), "unexpected reply: {}", reply);
    }
    assert_err!(RandomOracle::new(Vec::new()).ask("where to?").await);
}

#[tokio::test]
async fn test_keyword_oracle_structures_agent_replies() {
    let table = Arc::new(LocationPreset::Town.table());
    let oracle = KeywordOracle::new(Arc::clone(&table));

    // The prompt itself lists every location; only the quoted reply may count.
    let prompt = interpretation_prompt("agent_1", "I'd go to the library, the park is too busy", &table);
    let intent = Interpreter::parse(&oracle.ask(&prompt).await.unwrap());
    assert_eq!(intent.tool.keyword(), "MOVE");
    assert_eq!(intent.context, "LIBRARY");

    let prompt = interpretation_prompt("agent_1", "I'd rather stay put", &table);
    let intent = Interpreter::parse(&oracle.ask(&prompt).await.unwrap());
    assert!(intent.is_error());
}
