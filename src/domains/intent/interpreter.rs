use tracing::{debug, warn};

use super::locations::LocationTable;
use super::prompts::interpretation_prompt;
use super::types::{Intent, Tool};
use crate::domains::oracle::Oracle;

pub const INVALID_STRUCTURED_OUTPUT: &str = "Invalid structured output.";
pub const UNKNOWN_TOOL: &str = "Unknown tool detected.";
pub const ORACLE_FAILURE: &str = "Oracle request failed.";

/// Turns interpreter-model output into an `Intent`. Never fails: anything
/// malformed comes back as an `Error` intent.
pub struct Interpreter;

impl Interpreter {
    pub fn parse(raw: &str) -> Intent {
        let body = bracketed(raw).unwrap_or(raw);
        let tokens: Vec<&str> = body
            .split(',')
            .map(|t| t.trim().trim_matches(|c: char| c == '"' || c == '\'' || c == '[' || c == ']').trim())
            .collect();

        let agent_id = tokens.first().copied().unwrap_or_default().to_string();
        if tokens.len() != 3 {
            warn!(raw, tokens = tokens.len(), "invalid structured output");
            return Intent::error(agent_id, INVALID_STRUCTURED_OUTPUT);
        }

        match tokens[1].parse::<Tool>() {
            Ok(tool) => Intent { agent_id, tool, context: tokens[2].to_string() },
            Err(unknown) => {
                warn!(tool = %unknown, "unknown tool detected");
                Intent::error(agent_id, UNKNOWN_TOOL)
            }
        }
    }

    /// Ask the interpreter oracle to structure `agent_reply`, then parse the answer.
    pub async fn interpret(
        oracle: &dyn Oracle,
        agent_name: &str,
        agent_reply: &str,
        locations: &LocationTable,
    ) -> Intent {
        let prompt = interpretation_prompt(agent_name, agent_reply, locations);
        match oracle.ask(&prompt).await {
            Ok(structured) => {
                debug!(agent = agent_name, structured = %structured, "interpreter replied");
                Self::parse(&structured)
            }
            Err(e) => {
                warn!(agent = agent_name, error = %e, "interpreter oracle failed");
                Intent::error(agent_name, ORACLE_FAILURE)
            }
        }
    }
}

/// Contents of the first `[...]` segment, if the text has one.
fn bracketed(raw: &str) -> Option<&str> {
    let open = raw.find('[')?;
    let close = raw[open + 1..].find(']')? + open + 1;
    Some(&raw[open + 1..close])
}
