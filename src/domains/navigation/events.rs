use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::Position2D;
use crate::common::DomainEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NavigationEvent {
    PathPlanned {
        agent_id: String,
        destination: Position2D,
        waypoints: Vec<Position2D>,
        cost: u32,
        timestamp: DateTime<Utc>,
    },
    PathFailed {
        agent_id: String,
        destination: Position2D,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    WaypointReached {
        agent_id: String,
        position: Position2D,
        remaining: usize,
        timestamp: DateTime<Utc>,
    },
    Arrived {
        agent_id: String,
        position: Position2D,
        timestamp: DateTime<Utc>,
    },
    MotionCancelled {
        agent_id: String,
        position: Position2D,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for NavigationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            NavigationEvent::PathPlanned { .. } => "PathPlanned",
            NavigationEvent::PathFailed { .. } => "PathFailed",
            NavigationEvent::WaypointReached { .. } => "WaypointReached",
            NavigationEvent::Arrived { .. } => "Arrived",
            NavigationEvent::MotionCancelled { .. } => "MotionCancelled",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            NavigationEvent::PathPlanned { agent_id, .. }
            | NavigationEvent::PathFailed { agent_id, .. }
            | NavigationEvent::WaypointReached { agent_id, .. }
            | NavigationEvent::Arrived { agent_id, .. }
            | NavigationEvent::MotionCancelled { agent_id, .. } => agent_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            NavigationEvent::PathPlanned { timestamp, .. }
            | NavigationEvent::PathFailed { timestamp, .. }
            | NavigationEvent::WaypointReached { timestamp, .. }
            | NavigationEvent::Arrived { timestamp, .. }
            | NavigationEvent::MotionCancelled { timestamp, .. } => *timestamp,
        }
    }
}
