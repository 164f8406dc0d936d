use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
    fn aggregate_id(&self) -> &str;
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Round (or other unit of work) the event belongs to, if any.
    fn round_id(&self) -> Option<Uuid> {
        None
    }
}

/// One entry of an in-process event history, payload kept as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: u64,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub event_type: String,
    pub round_id: Option<Uuid>,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn wrap<E: DomainEvent + Serialize>(
        event: &E,
        aggregate_type: &str,
        sequence: u64,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            sequence,
            aggregate_id: event.aggregate_id().to_string(),
            aggregate_type: aggregate_type.to_string(),
            event_type: event.event_type().to_string(),
            round_id: event.round_id(),
            payload: serde_json::to_value(event)?,
            occurred_at: event.occurred_at(),
        })
    }

    pub fn belongs_to_round(&self, round_id: Uuid) -> bool {
        self.round_id == Some(round_id)
    }
}
