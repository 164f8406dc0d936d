use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::NegotiationEvent;
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::intent::LocationTable;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
const NO_AGREEMENT: &str = "no agreement";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NegotiationPhase {
    Idle,
    ProposalRequested,
    AwaitingSecondResponse,
    Evaluating,
    Restarting,
    Agreed { location: String },
    Failed { reason: String },
}

impl NegotiationPhase {
    /// A round is being played and can still be restarted.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            NegotiationPhase::ProposalRequested
                | NegotiationPhase::AwaitingSecondResponse
                | NegotiationPhase::Evaluating
                | NegotiationPhase::Restarting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, NegotiationPhase::Agreed { .. } | NegotiationPhase::Failed { .. })
    }
}

/// The arbiter's reading of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Agreed { location: String },
    NoAgreement,
    NoValidLocation,
}

impl Verdict {
    pub fn from_ruling(reply: &str, locations: &LocationTable) -> Self {
        if reply.to_lowercase().contains(NO_AGREEMENT) {
            return Verdict::NoAgreement;
        }
        match locations.find_in(reply) {
            Some(location) => Verdict::Agreed { location: location.name.clone() },
            None => Verdict::NoValidLocation,
        }
    }
}

/// Two participants and an arbiter trying to settle on one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Negotiation {
    pub id: String,
    pub participants: [String; 2],
    pub proposals: [Option<String>; 2],
    pub ruling: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub phase: NegotiationPhase,
    pub round_id: Option<Uuid>,
    pub version: u64,
    #[serde(skip)]
    uncommitted_events: Vec<NegotiationEvent>,
}

impl Negotiation {
    pub fn new(first: impl Into<String>, second: impl Into<String>, max_retries: u32) -> Self {
        let mut negotiation = Self::blank();
        let event = NegotiationEvent::NegotiationOpened {
            negotiation_id: Uuid::new_v4().to_string(),
            participants: [first.into(), second.into()],
            max_retries,
            timestamp: Utc::now(),
        };
        // Opening only assigns fields, it cannot fail.
        let _ = negotiation.record(event);
        negotiation
    }

    /// Empty instance to replay history onto.
    pub fn blank() -> Self {
        Self {
            id: String::new(),
            participants: [String::new(), String::new()],
            proposals: [None, None],
            ruling: None,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            phase: NegotiationPhase::Idle,
            round_id: None,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn start_round(&mut self) -> DomainResult<Uuid> {
        if self.phase != NegotiationPhase::Idle {
            return Err(DomainError::InvalidCommand {
                reason: format!("Cannot start a round while {:?}", self.phase),
            });
        }
        let round_id = Uuid::new_v4();
        self.record(NegotiationEvent::RoundStarted {
            negotiation_id: self.id.clone(),
            round_id,
            timestamp: Utc::now(),
        })?;
        Ok(round_id)
    }

    pub fn record_proposal(&mut self, round_id: Uuid, reply: impl Into<String>) -> DomainResult<()> {
        self.ensure_current(round_id)?;
        self.ensure_phase(NegotiationPhase::ProposalRequested)?;
        self.record(NegotiationEvent::ProposalRecorded {
            negotiation_id: self.id.clone(),
            round_id,
            participant: self.participants[0].clone(),
            reply: reply.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn record_counter_proposal(&mut self, round_id: Uuid, reply: impl Into<String>) -> DomainResult<()> {
        self.ensure_current(round_id)?;
        self.ensure_phase(NegotiationPhase::AwaitingSecondResponse)?;
        self.record(NegotiationEvent::CounterProposalRecorded {
            negotiation_id: self.id.clone(),
            round_id,
            participant: self.participants[1].clone(),
            reply: reply.into(),
            timestamp: Utc::now(),
        })
    }

    /// Read the arbiter's ruling. Once agreed, further rulings are ignored and
    /// the settled verdict is returned again without recording anything.
    pub fn evaluate(&mut self, round_id: Uuid, reply: &str, locations: &LocationTable) -> DomainResult<Verdict> {
        if let NegotiationPhase::Agreed { location } = &self.phase {
            return Ok(Verdict::Agreed { location: location.clone() });
        }
        self.ensure_current(round_id)?;
        self.ensure_phase(NegotiationPhase::Evaluating)?;

        let verdict = Verdict::from_ruling(reply, locations);
        self.record(NegotiationEvent::ArbiterRuled {
            negotiation_id: self.id.clone(),
            round_id,
            reply: reply.to_string(),
            verdict: verdict.clone(),
            timestamp: Utc::now(),
        })?;
        Ok(verdict)
    }

    /// Abandon the current round and open the next one. Returns `None` once the
    /// retry budget is spent, leaving the negotiation `Failed`.
    pub fn restart(&mut self, reason: impl Into<String>) -> DomainResult<Option<Uuid>> {
        if !self.phase.is_in_flight() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Cannot restart while {:?}", self.phase),
            });
        }
        let reason = reason.into();

        if self.retry_count >= self.max_retries {
            self.record(NegotiationEvent::NegotiationFailed {
                negotiation_id: self.id.clone(),
                retry_count: self.retry_count,
                reason: format!("No agreement after {} retries: {}", self.retry_count, reason),
                timestamp: Utc::now(),
            })?;
            return Ok(None);
        }

        let round_id = Uuid::new_v4();
        self.record(NegotiationEvent::RoundRestarted {
            negotiation_id: self.id.clone(),
            previous_round_id: self.round_id.unwrap_or_else(Uuid::nil),
            round_id,
            retry_count: self.retry_count + 1,
            reason,
            timestamp: Utc::now(),
        })?;
        Ok(Some(round_id))
    }

    /// Drop all round state and go back to `Idle`.
    pub fn reset(&mut self) -> DomainResult<()> {
        self.record(NegotiationEvent::NegotiationReset {
            negotiation_id: self.id.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn agreed_location(&self) -> Option<&str> {
        match &self.phase {
            NegotiationPhase::Agreed { location } => Some(location),
            _ => None,
        }
    }

    fn ensure_current(&self, round_id: Uuid) -> DomainResult<()> {
        match self.round_id {
            Some(current) if current == round_id => Ok(()),
            current => Err(DomainError::StaleReply {
                round_id: round_id.to_string(),
                current: current.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()),
            }),
        }
    }

    fn ensure_phase(&self, expected: NegotiationPhase) -> DomainResult<()> {
        if self.phase != expected {
            return Err(DomainError::InvalidCommand {
                reason: format!("Expected {:?}, negotiation is {:?}", expected, self.phase),
            });
        }
        Ok(())
    }
}

impl AggregateRoot for Negotiation {
    type Event = NegotiationEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            NegotiationEvent::NegotiationOpened { negotiation_id, participants, max_retries, .. } => {
                self.id = negotiation_id.clone();
                self.participants = participants.clone();
                self.max_retries = *max_retries;
            }
            NegotiationEvent::RoundStarted { round_id, .. } => {
                self.round_id = Some(*round_id);
                self.proposals = [None, None];
                self.ruling = None;
                self.phase = NegotiationPhase::ProposalRequested;
            }
            NegotiationEvent::ProposalRecorded { reply, .. } => {
                self.proposals[0] = Some(reply.clone());
                self.phase = NegotiationPhase::AwaitingSecondResponse;
            }
            NegotiationEvent::CounterProposalRecorded { reply, .. } => {
                self.proposals[1] = Some(reply.clone());
                self.phase = NegotiationPhase::Evaluating;
            }
            NegotiationEvent::ArbiterRuled { reply, verdict, .. } => {
                self.ruling = Some(reply.clone());
                self.phase = match verdict {
                    Verdict::Agreed { location } => NegotiationPhase::Agreed { location: location.clone() },
                    Verdict::NoAgreement | Verdict::NoValidLocation => NegotiationPhase::Restarting,
                };
            }
            NegotiationEvent::RoundRestarted { round_id, retry_count, .. } => {
                self.round_id = Some(*round_id);
                self.retry_count = *retry_count;
                self.proposals = [None, None];
                self.ruling = None;
                self.phase = NegotiationPhase::ProposalRequested;
            }
            NegotiationEvent::NegotiationFailed { reason, .. } => {
                self.round_id = None;
                self.phase = NegotiationPhase::Failed { reason: reason.clone() };
            }
            NegotiationEvent::NegotiationReset { .. } => {
                self.round_id = None;
                self.proposals = [None, None];
                self.ruling = None;
                self.retry_count = 0;
                self.phase = NegotiationPhase::Idle;
            }
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}
