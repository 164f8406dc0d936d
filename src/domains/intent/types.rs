use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Move,
    Error,
}

impl Tool {
    pub fn keyword(&self) -> &'static str {
        match self {
            Tool::Move => "MOVE",
            Tool::Error => "ERROR",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Keywords are matched exactly: `move` is not `MOVE`.
impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOVE" => Ok(Tool::Move),
            "ERROR" => Ok(Tool::Error),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub agent_id: String,
    pub tool: Tool,
    pub context: String,
}

impl Intent {
    pub fn movement(agent_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self { agent_id: agent_id.into(), tool: Tool::Move, context: location.into() }
    }

    pub fn error(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { agent_id: agent_id.into(), tool: Tool::Error, context: reason.into() }
    }

    pub fn is_error(&self) -> bool {
        self.tool == Tool::Error
    }
}
