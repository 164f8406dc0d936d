use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::common::{ApplicationError, ApplicationResult, DomainError, EventEnvelope};
use crate::domains::negotiation::{ConversationLog, NegotiationCoordinator, NegotiationEvent, NegotiationOutcome};

const AGGREGATE_TYPE: &str = "Negotiation";

struct Running {
    negotiation_id: String,
    token: CancellationToken,
    outcome: watch::Receiver<Option<NegotiationOutcome>>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Transcript {
    log: ConversationLog,
    history: Vec<EventEnvelope>,
}

/// Runs negotiations in the background, one at a time. Starting a new one
/// cancels whatever is in flight; its pending oracle call is dropped.
pub struct NegotiationService {
    coordinator: Arc<NegotiationCoordinator>,
    events: Mutex<mpsc::UnboundedReceiver<NegotiationEvent>>,
    transcript: Mutex<Transcript>,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl NegotiationService {
    /// `log` carries the display names used when rendering the transcript.
    pub fn new(coordinator: NegotiationCoordinator, log: ConversationLog) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            coordinator: Arc::new(coordinator.with_events(tx)),
            events: Mutex::new(rx),
            transcript: Mutex::new(Transcript { log, history: Vec::new() }),
            running: tokio::sync::Mutex::new(None),
        }
    }

    /// Cancel any in-flight negotiation and open a fresh one. Returns its id.
    pub async fn start(&self) -> String {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            Self::stop(previous).await;
        }

        let negotiation = self.coordinator.open();
        let negotiation_id = negotiation.id.clone();
        let token = CancellationToken::new();
        let coordinator = Arc::clone(&self.coordinator);
        let child = token.clone();
        let (done, outcome) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut negotiation = negotiation;
            let result = coordinator.run(&mut negotiation, &child).await;
            done.send_replace(Some(result));
        });

        debug!(negotiation_id = %negotiation_id, "negotiation started");
        *running = Some(Running { negotiation_id: negotiation_id.clone(), token, outcome, handle });
        negotiation_id
    }

    /// Same as `start`; kept for callers that think in terms of a restart button.
    pub async fn restart(&self) -> String {
        self.start().await
    }

    /// Cancel the in-flight negotiation, if any.
    pub async fn cancel(&self) {
        if let Some(previous) = self.running.lock().await.take() {
            Self::stop(previous).await;
        }
    }

    /// Wait for the current negotiation to finish and return how it ended.
    /// The negotiation stays registered, so a `start` issued meanwhile still
    /// cancels it and this call then reports `Cancelled`. Dropping the
    /// returned future cancels the negotiation.
    pub async fn wait(&self) -> ApplicationResult<NegotiationOutcome> {
        let (negotiation_id, token, mut outcome) = {
            let running = self.running.lock().await;
            let current = running.as_ref().ok_or_else(|| {
                ApplicationError::Domain(DomainError::InvalidCommand {
                    reason: "No negotiation in progress".to_string(),
                })
            })?;
            (current.negotiation_id.clone(), current.token.clone(), current.outcome.clone())
        };

        let guard = token.drop_guard();
        let finished = outcome.wait_for(Option::is_some).await.map(|o| o.clone());
        guard.disarm();
        self.sync();
        match finished {
            Ok(Some(outcome)) => Ok(outcome),
            _ => Err(ApplicationError::Domain(DomainError::InfrastructureError(format!(
                "Negotiation {} task ended without an outcome",
                negotiation_id
            )))),
        }
    }

    pub async fn current_negotiation(&self) -> Option<String> {
        self.running.lock().await.as_ref().map(|r| r.negotiation_id.clone())
    }

    /// "Speaker: message" lines for everything seen so far.
    pub fn transcript(&self) -> String {
        self.sync();
        self.transcript.lock().map(|t| t.log.render()).unwrap_or_default()
    }

    pub fn conversation(&self) -> ConversationLog {
        self.sync();
        self.transcript.lock().map(|t| t.log.clone()).unwrap_or_default()
    }

    /// Serialized events of every negotiation this service has run.
    pub fn history(&self) -> Vec<EventEnvelope> {
        self.sync();
        self.transcript.lock().map(|t| t.history.clone()).unwrap_or_default()
    }

    async fn stop(previous: Running) {
        previous.token.cancel();
        if let Err(e) = previous.handle.await {
            warn!(negotiation_id = %previous.negotiation_id, error = %e, "cancelled negotiation did not shut down cleanly");
        }
    }

    /// Fold queued events into the transcript and history.
    fn sync(&self) {
        let (Ok(mut events), Ok(mut transcript)) = (self.events.lock(), self.transcript.lock()) else {
            return;
        };
        while let Ok(event) = events.try_recv() {
            transcript.log.apply_event(&event);
            let sequence = transcript.history.len() as u64;
            match EventEnvelope::wrap(&event, AGGREGATE_TYPE, sequence) {
                Ok(envelope) => transcript.history.push(envelope),
                Err(e) => warn!(error = %e, "failed to serialize negotiation event"),
            }
        }
    }
}

impl Drop for NegotiationService {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.token.cancel();
        }
    }
}
