use std::collections::VecDeque;

use super::types::Position2D;

pub const DEFAULT_ARRIVAL_RADIUS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStatus {
    /// Still travelling towards the head waypoint.
    Moving,
    /// Snapped onto a waypoint; more remain.
    WaypointReached,
    /// No waypoints left.
    Complete,
}

/// Advances a position along a list of waypoints at a fixed speed.
/// Consumes the waypoints; a finished follower stays finished.
#[derive(Debug, Clone)]
pub struct PathFollower {
    waypoints: VecDeque<Position2D>,
    speed: f64,
    arrival_radius: f64,
}

impl PathFollower {
    pub fn new(waypoints: Vec<Position2D>, speed: f64) -> Self {
        Self {
            waypoints: waypoints.into(),
            speed,
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
        }
    }

    pub fn with_arrival_radius(mut self, arrival_radius: f64) -> Self {
        self.arrival_radius = arrival_radius;
        self
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_complete(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn next_waypoint(&self) -> Option<&Position2D> {
        self.waypoints.front()
    }

    /// One tick of `dt` seconds.
    pub fn step(&mut self, position: &mut Position2D, dt: f64) -> FollowStatus {
        let Some(target) = self.waypoints.front().copied() else {
            return FollowStatus::Complete;
        };

        if position.distance_to(&target) <= self.arrival_radius {
            *position = target;
            self.waypoints.pop_front();
            return if self.waypoints.is_empty() {
                FollowStatus::Complete
            } else {
                FollowStatus::WaypointReached
            };
        }

        *position = position.move_towards(&target, self.speed * dt);
        FollowStatus::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_complete_and_leaves_position_alone() {
        let mut follower = PathFollower::new(Vec::new(), 2.0);
        let mut position = Position2D::new(1.0, 1.0);
        assert_eq!(follower.step(&mut position, 0.5), FollowStatus::Complete);
        assert_eq!(follower.step(&mut position, 0.5), FollowStatus::Complete);
        assert_eq!(position, Position2D::new(1.0, 1.0));
    }

    #[test]
    fn walks_and_snaps_onto_each_waypoint() {
        let mut follower = PathFollower::new(
            vec![Position2D::new(1.0, 0.0), Position2D::new(1.0, 1.0)],
            2.0,
        );
        let mut position = Position2D::new(0.0, 0.0);

        assert_eq!(follower.step(&mut position, 0.25), FollowStatus::Moving);
        assert!((position.x - 0.5).abs() < 1e-9);

        assert_eq!(follower.step(&mut position, 0.25), FollowStatus::Moving);
        assert_eq!(follower.step(&mut position, 0.25), FollowStatus::WaypointReached);
        assert_eq!(position, Position2D::new(1.0, 0.0));
        assert_eq!(follower.remaining(), 1);

        let mut status = FollowStatus::Moving;
        for _ in 0..10 {
            status = follower.step(&mut position, 0.25);
            if status == FollowStatus::Complete {
                break;
            }
        }
        assert_eq!(status, FollowStatus::Complete);
        assert_eq!(position, Position2D::new(1.0, 1.0));
    }
}
