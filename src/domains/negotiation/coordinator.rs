use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::aggregate::{Negotiation, NegotiationPhase, Verdict};
use super::events::NegotiationEvent;
use super::prompts::{arbiter_prompt, counter_prompt, opening_prompt};
use crate::common::{AggregateRoot, DomainError};
use crate::domains::intent::{DispatchOutcome, Intent, ToolDispatcher};
use crate::domains::logger::DynLogger;
use crate::domains::oracle::{DynOracle, OracleError};

/// One side of the negotiation and the oracle that speaks for it.
#[derive(Clone)]
pub struct Participant {
    pub agent_id: String,
    pub display_name: String,
    pub oracle: DynOracle,
}

impl Participant {
    pub fn new(agent_id: impl Into<String>, display_name: impl Into<String>, oracle: DynOracle) -> Self {
        Self { agent_id: agent_id.into(), display_name: display_name.into(), oracle }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NegotiationOutcome {
    Agreed {
        location: String,
        retries: u32,
        dispatches: Vec<DispatchOutcome>,
    },
    Failed {
        reason: String,
        retries: u32,
    },
    Cancelled,
}

/// Why a round stopped short of a verdict.
#[derive(Debug)]
enum Interruption {
    Cancelled,
    Oracle(OracleError),
    Domain(DomainError),
}

impl From<DomainError> for Interruption {
    fn from(e: DomainError) -> Self {
        Interruption::Domain(e)
    }
}

/// Plays proposal, counter-proposal and arbitration rounds until the arbiter
/// names a location or the retry budget runs out.
pub struct NegotiationCoordinator {
    participants: [Participant; 2],
    arbiter: DynOracle,
    dispatcher: Arc<ToolDispatcher>,
    max_retries: u32,
    logger: DynLogger,
    events: Option<mpsc::UnboundedSender<NegotiationEvent>>,
}

impl NegotiationCoordinator {
    pub fn new(
        participants: [Participant; 2],
        arbiter: DynOracle,
        dispatcher: Arc<ToolDispatcher>,
        max_retries: u32,
        logger: DynLogger,
    ) -> Self {
        Self { participants, arbiter, dispatcher, max_retries, logger, events: None }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<NegotiationEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn participants(&self) -> &[Participant; 2] {
        &self.participants
    }

    /// Fresh negotiation between this coordinator's participants.
    pub fn open(&self) -> Negotiation {
        Negotiation::new(
            self.participants[0].agent_id.clone(),
            self.participants[1].agent_id.clone(),
            self.max_retries,
        )
    }

    /// Drive `negotiation` to a terminal outcome, or until `token` is cancelled.
    pub async fn run(&self, negotiation: &mut Negotiation, token: &CancellationToken) -> NegotiationOutcome {
        let first_round = match negotiation.phase {
            NegotiationPhase::Idle => negotiation.start_round(),
            _ => negotiation.reset().and_then(|_| negotiation.start_round()),
        };
        let mut round_id = match first_round {
            Ok(round_id) => round_id,
            Err(e) => return self.fail(negotiation, e.to_string()),
        };
        self.publish(negotiation);

        loop {
            let reason = match self.play_round(negotiation, round_id, token).await {
                Ok(Verdict::Agreed { location }) => {
                    return self.settle(negotiation, location).await;
                }
                Ok(Verdict::NoAgreement) => "no agreement".to_string(),
                Ok(Verdict::NoValidLocation) => {
                    let ruling = negotiation.ruling.clone().unwrap_or_default();
                    self.logger.error(&format!("Arbiter provided an invalid location: {}", ruling));
                    "no valid location in ruling".to_string()
                }
                Err(Interruption::Cancelled) => {
                    self.publish(negotiation);
                    info!(negotiation_id = %negotiation.id, "negotiation cancelled");
                    return NegotiationOutcome::Cancelled;
                }
                Err(Interruption::Oracle(e)) => {
                    warn!(negotiation_id = %negotiation.id, error = %e, "oracle failed mid-round");
                    format!("oracle failure: {}", e)
                }
                Err(Interruption::Domain(e)) => return self.fail(negotiation, e.to_string()),
            };

            self.logger.info(&format!("Agents did not agree ({}). Restarting negotiation...", reason));
            let next = negotiation.restart(reason);
            self.publish(negotiation);
            match next {
                Ok(Some(next_round)) => round_id = next_round,
                Ok(None) => {
                    let reason = match &negotiation.phase {
                        NegotiationPhase::Failed { reason } => reason.clone(),
                        _ => "retry budget exhausted".to_string(),
                    };
                    self.logger.error(&format!("Negotiation failed: {}", reason));
                    return NegotiationOutcome::Failed { reason, retries: negotiation.retry_count };
                }
                Err(e) => return self.fail(negotiation, e.to_string()),
            }
        }
    }

    async fn play_round(
        &self,
        negotiation: &mut Negotiation,
        round_id: Uuid,
        token: &CancellationToken,
    ) -> Result<Verdict, Interruption> {
        let [first, second] = &self.participants;
        let locations = self.dispatcher.locations();

        debug!(negotiation_id = %negotiation.id, %round_id, "asking {}", first.display_name);
        let proposal = ask(&first.oracle, &opening_prompt(locations), token).await?;
        negotiation.record_proposal(round_id, proposal.clone())?;
        self.publish(negotiation);

        debug!(negotiation_id = %negotiation.id, %round_id, "asking {}", second.display_name);
        let prompt = counter_prompt(&second.display_name, &first.display_name, &proposal);
        let counter = ask(&second.oracle, &prompt, token).await?;
        negotiation.record_counter_proposal(round_id, counter.clone())?;
        self.publish(negotiation);

        debug!(negotiation_id = %negotiation.id, %round_id, "asking arbiter");
        let prompt = arbiter_prompt(
            (first.display_name.as_str(), proposal.as_str()),
            (second.display_name.as_str(), counter.as_str()),
        );
        let ruling = ask(&self.arbiter, &prompt, token).await?;
        let verdict = negotiation.evaluate(round_id, &ruling, locations)?;
        self.publish(negotiation);
        Ok(verdict)
    }

    async fn settle(&self, negotiation: &Negotiation, location: String) -> NegotiationOutcome {
        self.logger.info(&format!("Both agents agreed on {}. Moving...", location));
        let mut dispatches = Vec::with_capacity(self.participants.len());
        for participant in &self.participants {
            let intent = Intent::movement(participant.agent_id.clone(), location.clone());
            dispatches.push(self.dispatcher.dispatch(&intent).await);
        }
        info!(
            negotiation_id = %negotiation.id,
            location = %location,
            retries = negotiation.retry_count,
            "negotiation agreed"
        );
        NegotiationOutcome::Agreed { location, retries: negotiation.retry_count, dispatches }
    }

    fn fail(&self, negotiation: &mut Negotiation, reason: String) -> NegotiationOutcome {
        self.logger.error(&format!("Negotiation aborted: {}", reason));
        self.publish(negotiation);
        NegotiationOutcome::Failed { reason, retries: negotiation.retry_count }
    }

    /// Forward new events to the subscriber and mark them committed.
    fn publish(&self, negotiation: &mut Negotiation) {
        if let Some(tx) = &self.events {
            for event in negotiation.uncommitted_events() {
                let _ = tx.send(event.clone());
            }
        }
        negotiation.mark_events_as_committed();
    }
}

/// Ask `oracle`, giving up as soon as `token` is cancelled so no late reply is recorded.
async fn ask(oracle: &DynOracle, prompt: &str, token: &CancellationToken) -> Result<String, Interruption> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Interruption::Cancelled),
        reply = oracle.ask(prompt) => reply.map_err(Interruption::Oracle),
    }
}
