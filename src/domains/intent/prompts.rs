use super::locations::LocationTable;

/// Precedes the quoted agent reply in the interpretation prompt.
pub const REPLY_MARKER: &str = "their response was:";

/// What an agent is asked when it should pick somewhere to go.
pub fn intention_prompt(locations: &LocationTable, mood: &str) -> String {
    format!(
        "Where do you want to move? You exist as an agent in a simplistic multiagent environment. \
         You have {} options ({}). Please briefly respond with which one you want to choose, \
         and then shortly explain why. Let's assume right now your mood is {}.",
        locations.len(),
        locations.describe().to_lowercase(),
        mood
    )
}

/// Asks the interpreter model to reduce an agent's free-text reply to `[agent, TOOL, CONTEXT]`.
pub fn interpretation_prompt(agent_name: &str, agent_reply: &str, locations: &LocationTable) -> String {
    format!(
        "You are an interpreter. Your job is to analyze an agent's response and determine 3 things: \
         which agent it is, what tool they want to use, and the context of the action. \
         You will respond with ONLY a structured output in this format: ['agent_#', TOOL, CONTEXT]. \
         You can identify 2 tools: MOVE (for moving to a location) or ERROR (if the response doesn't make sense). \
         The context for MOVE will be one of these locations: {}. \
         The agent's name is {}, and {} \"{}\".",
        locations.describe().to_uppercase(),
        agent_name,
        REPLY_MARKER,
        agent_reply
    )
}
