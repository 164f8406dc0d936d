use crate::common::{DomainEvent, DomainResult};
use serde::{Deserialize, Serialize};

pub trait AggregateRoot: Send + Sync + Clone {
    type Event: DomainEvent + Serialize + for<'de> Deserialize<'de>;

    fn aggregate_id(&self) -> &str;
    fn version(&self) -> u64;

    /// Apply an event to update the aggregate state
    fn apply(&mut self, event: &Self::Event) -> DomainResult<()>;

    /// Get uncommitted events
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Mark events as committed
    fn mark_events_as_committed(&mut self);

    /// Add a new event to the uncommitted events list
    fn add_event(&mut self, event: Self::Event);

    /// Apply and then queue the event; the one path commands use to change state.
    fn record(&mut self, event: Self::Event) -> DomainResult<()> {
        self.apply(&event)?;
        self.add_event(event);
        Ok(())
    }
}

/// Rebuild an aggregate by replaying committed events onto a blank instance.
pub fn replay<T: AggregateRoot>(mut aggregate: T, events: &[T::Event]) -> DomainResult<T> {
    for event in events {
        aggregate.apply(event)?;
    }
    Ok(aggregate)
}
