use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::events::NavigationEvent;
use super::follower::{FollowStatus, PathFollower, DEFAULT_ARRIVAL_RADIUS};
use super::pathfinding::{Pathfinder, PlannedPath};
use super::types::Position2D;
use crate::common::DomainResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    /// World units per second.
    pub speed: f64,
    pub arrival_radius: f64,
    /// Simulated tick length in milliseconds.
    pub tick_ms: u64,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
            tick_ms: 20,
        }
    }
}

impl MovementSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MotionState {
    Idle,
    Moving { destination: Position2D },
    Arrived { position: Position2D },
}

/// Owns one agent's position and drives it along planned paths, one step per tick.
/// A new `move_to` cancels whatever the agent was doing; the newest request wins.
pub struct AgentMover {
    agent_id: String,
    pathfinder: Arc<Pathfinder>,
    settings: MovementSettings,
    initial_position: Position2D,
    position: Arc<RwLock<Position2D>>,
    motion: Arc<watch::Sender<MotionState>>,
    current: Mutex<Option<CancellationToken>>,
    events: Option<mpsc::UnboundedSender<NavigationEvent>>,
}

impl AgentMover {
    pub fn new(
        agent_id: impl Into<String>,
        pathfinder: Arc<Pathfinder>,
        initial_position: Position2D,
        settings: MovementSettings,
    ) -> Self {
        let (motion, _) = watch::channel(MotionState::Idle);
        Self {
            agent_id: agent_id.into(),
            pathfinder,
            settings,
            initial_position,
            position: Arc::new(RwLock::new(initial_position)),
            motion: Arc::new(motion),
            current: Mutex::new(None),
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<NavigationEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub async fn position(&self) -> Position2D {
        *self.position.read().await
    }

    pub fn motion(&self) -> MotionState {
        self.motion.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MotionState> {
        self.motion.subscribe()
    }

    /// Plan from the current position to `destination` and start following the result.
    pub async fn move_to(&self, destination: Position2D) -> DomainResult<PlannedPath> {
        let token = self.supersede();
        let start = *self.position.read().await;

        let path = match self.pathfinder.find_path(&start, &destination) {
            Ok(path) => path,
            Err(e) => {
                self.motion.send_replace(MotionState::Idle);
                emit(&self.events, NavigationEvent::PathFailed {
                    agent_id: self.agent_id.clone(),
                    destination,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(e);
            }
        };

        let waypoints = path.waypoint_positions();
        emit(&self.events, NavigationEvent::PathPlanned {
            agent_id: self.agent_id.clone(),
            destination,
            waypoints: waypoints.clone(),
            cost: path.cost,
            timestamp: Utc::now(),
        });
        self.motion.send_replace(MotionState::Moving { destination });

        let follower = PathFollower::new(waypoints, self.settings.speed)
            .with_arrival_radius(self.settings.arrival_radius);
        tokio::spawn(follow(
            self.agent_id.clone(),
            Arc::clone(&self.position),
            Arc::clone(&self.motion),
            self.events.clone(),
            follower,
            self.settings.tick(),
            token,
        ));

        Ok(path)
    }

    /// Stop the current motion, if any, leaving the agent where it is.
    pub fn stop(&self) {
        if let Some(token) = self.take_current() {
            token.cancel();
        }
        self.motion.send_replace(MotionState::Idle);
    }

    /// Stop and put the agent back where it started.
    pub async fn reset_position(&self) {
        self.stop();
        *self.position.write().await = self.initial_position;
    }

    /// Resolve once the agent is no longer moving.
    pub async fn wait_until_stopped(&self) -> MotionState {
        let mut rx = self.motion.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            if !matches!(state, MotionState::Moving { .. }) {
                return state;
            }
            if rx.changed().await.is_err() {
                return state;
            }
        }
    }

    fn take_current(&self) -> Option<CancellationToken> {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    fn supersede(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }
}

impl Drop for AgentMover {
    fn drop(&mut self) {
        if let Some(token) = self.take_current() {
            token.cancel();
        }
    }
}

fn emit(events: &Option<mpsc::UnboundedSender<NavigationEvent>>, event: NavigationEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

async fn follow(
    agent_id: String,
    position: Arc<RwLock<Position2D>>,
    motion: Arc<watch::Sender<MotionState>>,
    events: Option<mpsc::UnboundedSender<NavigationEvent>>,
    mut follower: PathFollower,
    tick: Duration,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let dt = tick.as_secs_f64();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                let at = *position.read().await;
                tracing::debug!(agent_id = %agent_id, position = %at, "path follow cancelled");
                emit(&events, NavigationEvent::MotionCancelled {
                    agent_id,
                    position: at,
                    timestamp: Utc::now(),
                });
                return;
            }
            _ = interval.tick() => {}
        }

        let mut guard = position.write().await;
        if token.is_cancelled() {
            continue;
        }
        let status = follower.step(&mut guard, dt);
        let current = *guard;
        drop(guard);

        match status {
            FollowStatus::Moving => {}
            FollowStatus::WaypointReached => {
                emit(&events, NavigationEvent::WaypointReached {
                    agent_id: agent_id.clone(),
                    position: current,
                    remaining: follower.remaining(),
                    timestamp: Utc::now(),
                });
            }
            FollowStatus::Complete => {
                tracing::debug!(agent_id = %agent_id, position = %current, "arrived");
                // Checked under the watch lock: a superseding `move_to` cancels
                // this token before it publishes `Moving`.
                let published = motion.send_if_modified(|state| {
                    if token.is_cancelled() {
                        return false;
                    }
                    *state = MotionState::Arrived { position: current };
                    true
                });
                if !published {
                    return;
                }
                emit(&events, NavigationEvent::Arrived {
                    agent_id,
                    position: current,
                    timestamp: Utc::now(),
                });
                return;
            }
        }
    }
}
