use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregate::Verdict;
use super::events::NegotiationEvent;

pub const SYSTEM: &str = "System";
pub const ARBITER: &str = "Arbiter";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationLine {
    pub speaker: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Speaker-tagged transcript of a negotiation, rebuilt from its events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    display_names: HashMap<String, String>,
    participants: Vec<String>,
    pub lines: Vec<ConversationLine>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `agent_id` as `display_name` in the transcript.
    pub fn with_display_name(mut self, agent_id: &str, display_name: &str) -> Self {
        self.display_names.insert(agent_id.to_string(), display_name.to_string());
        self
    }

    fn name_of<'a>(&'a self, agent_id: &'a str) -> &'a str {
        self.display_names.get(agent_id).map(String::as_str).unwrap_or(agent_id)
    }

    fn participant_name(&self, index: usize) -> String {
        self.participants
            .get(index)
            .map(|id| self.name_of(id).to_string())
            .unwrap_or_else(|| format!("participant {}", index + 1))
    }

    fn push(&mut self, speaker: &str, message: String, timestamp: DateTime<Utc>) {
        self.lines.push(ConversationLine { speaker: speaker.to_string(), message, timestamp });
    }

    pub fn apply_event(&mut self, event: &NegotiationEvent) {
        match event {
            NegotiationEvent::NegotiationOpened { participants, timestamp, .. } => {
                self.lines.clear();
                self.participants = participants.to_vec();
                let message = format!(
                    "Negotiation opened between {} and {}.",
                    self.participant_name(0),
                    self.participant_name(1)
                );
                self.push(SYSTEM, message, *timestamp);
            }
            NegotiationEvent::RoundStarted { timestamp, .. } => {
                let message = format!("Prompting {} to select a location...", self.participant_name(0));
                self.push(SYSTEM, message, *timestamp);
            }
            NegotiationEvent::ProposalRecorded { participant, reply, timestamp, .. } => {
                let speaker = self.name_of(participant).to_string();
                self.push(&speaker, reply.clone(), *timestamp);
                let message = format!("Prompting {} to respond...", self.participant_name(1));
                self.push(SYSTEM, message, *timestamp);
            }
            NegotiationEvent::CounterProposalRecorded { participant, reply, timestamp, .. } => {
                let speaker = self.name_of(participant).to_string();
                self.push(&speaker, reply.clone(), *timestamp);
                self.push(SYSTEM, "Evaluating responses with the arbiter...".to_string(), *timestamp);
            }
            NegotiationEvent::ArbiterRuled { reply, verdict, timestamp, .. } => {
                self.push(ARBITER, reply.clone(), *timestamp);
                if let Verdict::Agreed { location } = verdict {
                    self.push(SYSTEM, format!("Both agents agreed on {}. Moving...", location), *timestamp);
                }
            }
            NegotiationEvent::RoundRestarted { reason, retry_count, timestamp, .. } => {
                let message = format!(
                    "Agents did not agree ({}). Restarting negotiation, attempt {}...",
                    reason,
                    retry_count + 1
                );
                self.push(SYSTEM, message, *timestamp);
                let message = format!("Prompting {} to select a location...", self.participant_name(0));
                self.push(SYSTEM, message, *timestamp);
            }
            NegotiationEvent::NegotiationFailed { reason, timestamp, .. } => {
                self.push(SYSTEM, format!("Negotiation failed: {}", reason), *timestamp);
            }
            NegotiationEvent::NegotiationReset { .. } => {
                self.lines.clear();
            }
        }
    }

    /// One "Speaker: message" line per entry.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{}: {}", l.speaker, l.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
