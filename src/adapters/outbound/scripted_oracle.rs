use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domains::intent::{LocationTable, REPLY_MARKER};
use crate::domains::oracle::{Oracle, OracleError};

/// Answers from a fixed script, one entry per call, and remembers every prompt it saw.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Wait this long before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Ok(reply.into()));
        }
    }

    pub fn push_failure(&self, error: OracleError) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(error));
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        // Taken before the delay: a call abandoned mid-wait still uses up its reply.
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| Err(OracleError::Unavailable("script exhausted".to_string())))
    }
}

/// Demo stand-in for a language model: proposes a random location from its list.
pub struct RandomOracle {
    locations: Vec<String>,
}

impl RandomOracle {
    pub fn new(locations: Vec<String>) -> Self {
        Self { locations }
    }
}

#[async_trait]
impl Oracle for RandomOracle {
    async fn ask(&self, _prompt: &str) -> Result<String, OracleError> {
        let choice = self
            .locations
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| OracleError::Unavailable("no locations to choose from".to_string()))?;
        Ok(format!("I feel like going to the {}. final choice {}", choice, choice))
    }
}

/// Offline interpreter: reads the agent reply out of an interpretation prompt and
/// answers with the structured triple for the first location it mentions.
pub struct KeywordOracle {
    locations: Arc<LocationTable>,
}

impl KeywordOracle {
    pub fn new(locations: Arc<LocationTable>) -> Self {
        Self { locations }
    }
}

#[async_trait]
impl Oracle for KeywordOracle {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        let reply = prompt
            .rsplit_once(REPLY_MARKER)
            .map(|(_, reply)| reply)
            .unwrap_or(prompt);
        Ok(match self.locations.find_in(reply) {
            Some(location) => format!("['agent', MOVE, {}]", location.name.to_uppercase()),
            None => "['agent', ERROR, none]".to_string(),
        })
    }
}
