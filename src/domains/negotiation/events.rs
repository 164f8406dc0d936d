use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::Verdict;
use crate::common::DomainEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NegotiationEvent {
    NegotiationOpened {
        negotiation_id: String,
        participants: [String; 2],
        max_retries: u32,
        timestamp: DateTime<Utc>,
    },
    RoundStarted {
        negotiation_id: String,
        round_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    ProposalRecorded {
        negotiation_id: String,
        round_id: Uuid,
        participant: String,
        reply: String,
        timestamp: DateTime<Utc>,
    },
    CounterProposalRecorded {
        negotiation_id: String,
        round_id: Uuid,
        participant: String,
        reply: String,
        timestamp: DateTime<Utc>,
    },
    ArbiterRuled {
        negotiation_id: String,
        round_id: Uuid,
        reply: String,
        verdict: Verdict,
        timestamp: DateTime<Utc>,
    },
    RoundRestarted {
        negotiation_id: String,
        previous_round_id: Uuid,
        round_id: Uuid,
        retry_count: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    NegotiationFailed {
        negotiation_id: String,
        retry_count: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    NegotiationReset {
        negotiation_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for NegotiationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            NegotiationEvent::NegotiationOpened { .. } => "NegotiationOpened",
            NegotiationEvent::RoundStarted { .. } => "RoundStarted",
            NegotiationEvent::ProposalRecorded { .. } => "ProposalRecorded",
            NegotiationEvent::CounterProposalRecorded { .. } => "CounterProposalRecorded",
            NegotiationEvent::ArbiterRuled { .. } => "ArbiterRuled",
            NegotiationEvent::RoundRestarted { .. } => "RoundRestarted",
            NegotiationEvent::NegotiationFailed { .. } => "NegotiationFailed",
            NegotiationEvent::NegotiationReset { .. } => "NegotiationReset",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            NegotiationEvent::NegotiationOpened { negotiation_id, .. }
            | NegotiationEvent::RoundStarted { negotiation_id, .. }
            | NegotiationEvent::ProposalRecorded { negotiation_id, .. }
            | NegotiationEvent::CounterProposalRecorded { negotiation_id, .. }
            | NegotiationEvent::ArbiterRuled { negotiation_id, .. }
            | NegotiationEvent::RoundRestarted { negotiation_id, .. }
            | NegotiationEvent::NegotiationFailed { negotiation_id, .. }
            | NegotiationEvent::NegotiationReset { negotiation_id, .. } => negotiation_id,
        }
    }

    fn round_id(&self) -> Option<Uuid> {
        match self {
            NegotiationEvent::RoundStarted { round_id, .. }
            | NegotiationEvent::ProposalRecorded { round_id, .. }
            | NegotiationEvent::CounterProposalRecorded { round_id, .. }
            | NegotiationEvent::ArbiterRuled { round_id, .. }
            | NegotiationEvent::RoundRestarted { round_id, .. } => Some(*round_id),
            NegotiationEvent::NegotiationOpened { .. }
            | NegotiationEvent::NegotiationFailed { .. }
            | NegotiationEvent::NegotiationReset { .. } => None,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            NegotiationEvent::NegotiationOpened { timestamp, .. }
            | NegotiationEvent::RoundStarted { timestamp, .. }
            | NegotiationEvent::ProposalRecorded { timestamp, .. }
            | NegotiationEvent::CounterProposalRecorded { timestamp, .. }
            | NegotiationEvent::ArbiterRuled { timestamp, .. }
            | NegotiationEvent::RoundRestarted { timestamp, .. }
            | NegotiationEvent::NegotiationFailed { timestamp, .. }
            | NegotiationEvent::NegotiationReset { timestamp, .. } => *timestamp,
        }
    }
}
