use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position2D) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Move towards `target` by at most `max_delta`, landing exactly on it when closer.
    pub fn move_towards(&self, target: &Position2D, max_delta: f64) -> Position2D {
        let distance = self.distance_to(target);
        if distance <= max_delta || distance == 0.0 {
            return *target;
        }
        let scale = max_delta / distance;
        Position2D {
            x: self.x + (target.x - self.x) * scale,
            y: self.y + (target.y - self.y) * scale,
        }
    }
}

impl fmt::Display for Position2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Integer cell coordinates inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &GridCoord) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Unit step from `self` towards `next` (each axis in -1..=1).
    pub fn direction_to(&self, next: &GridCoord) -> (i32, i32) {
        ((next.x - self.x).signum(), (next.y - self.y).signum())
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Cost of a single move between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCost {
    /// Manhattan distance between the two cells: 1 for axis moves, 2 for diagonals.
    #[default]
    Manhattan,
    /// Every one of the 8 moves costs 1.
    Uniform,
}

impl StepCost {
    pub fn between(&self, from: &GridCoord, to: &GridCoord) -> u32 {
        match self {
            StepCost::Manhattan => from.manhattan(to),
            StepCost::Uniform => 1,
        }
    }
}
