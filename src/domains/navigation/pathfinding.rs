use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::grid::{Grid, Node};
use super::types::{GridCoord, Position2D, StepCost};
use crate::common::{DomainError, DomainResult};

/// Result of a successful search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedPath {
    pub start: GridCoord,
    pub goal: GridCoord,
    /// Every cell visited, start exclusive, goal inclusive.
    pub cells: Vec<GridCoord>,
    /// Cells where the direction of travel changes, plus the goal.
    pub waypoints: Vec<Node>,
    /// Total g-cost of the raw path.
    pub cost: u32,
}

impl PlannedPath {
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint_positions(&self) -> Vec<Position2D> {
        self.waypoints.iter().map(|n| n.world_position).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CostRecord {
    g_cost: u32,
    h_cost: u32,
    parent: Option<usize>,
    opened: bool,
    closed: bool,
}

impl CostRecord {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Scratch storage owned by one search, indexed like the grid's nodes.
struct SearchArena {
    records: Vec<CostRecord>,
}

impl SearchArena {
    fn for_grid(grid: &Grid) -> Self {
        Self { records: vec![CostRecord::default(); grid.len()] }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f_cost: u32,
    h_cost: u32,
    seq: u64,
    index: usize,
}

impl Ord for OpenEntry {
    // BinaryHeap is a max-heap; invert so the lowest (f, h, seq) pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f_cost, other.h_cost, other.seq).cmp(&(self.f_cost, self.h_cost, self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over a shared, read-only grid.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: Arc<Grid>,
    step_cost: StepCost,
}

impl Pathfinder {
    pub fn new(grid: Arc<Grid>) -> Self {
        Self { grid, step_cost: StepCost::default() }
    }

    pub fn with_step_cost(mut self, step_cost: StepCost) -> Self {
        self.step_cost = step_cost;
        self
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Search between two world points. Out-of-range points are clamped onto the grid.
    pub fn find_path(&self, start: &Position2D, goal: &Position2D) -> DomainResult<PlannedPath> {
        let start_node = self.grid.node_at(start);
        let goal_node = self.grid.node_at(goal);
        self.search(start_node.coord, goal_node.coord)
    }

    /// Search between two cells. Coordinates outside the grid are clamped.
    pub fn find_path_between(&self, start: GridCoord, goal: GridCoord) -> DomainResult<PlannedPath> {
        self.search(self.clamp(start), self.clamp(goal))
    }

    fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord::new(
            coord.x.clamp(0, self.grid.width() as i32 - 1),
            coord.y.clamp(0, self.grid.height() as i32 - 1),
        )
    }

    fn search(&self, start: GridCoord, goal: GridCoord) -> DomainResult<PlannedPath> {
        let grid = &self.grid;
        let no_path = || DomainError::NoPath { start, goal };
        let start_index = grid.index_of(&start).ok_or_else(no_path)?;
        let goal_index = grid.index_of(&goal).ok_or_else(no_path)?;

        let mut arena = SearchArena::for_grid(grid);
        let mut open = BinaryHeap::new();
        let mut seq: u64 = 0;

        let start_record = &mut arena.records[start_index];
        start_record.h_cost = start.manhattan(&goal);
        start_record.opened = true;
        open.push(OpenEntry {
            f_cost: start_record.f_cost(),
            h_cost: start_record.h_cost,
            seq,
            index: start_index,
        });

        while let Some(entry) = open.pop() {
            let current = arena.records[entry.index];
            // Superseded entries stay in the heap; skip them on the way out.
            if current.closed || entry.f_cost != current.f_cost() {
                continue;
            }
            arena.records[entry.index].closed = true;

            if entry.index == goal_index {
                let path = self.reconstruct(&arena, start, start_index, goal_index);
                debug!(
                    %start,
                    %goal,
                    cost = path.cost,
                    cells = path.cells.len(),
                    waypoints = path.waypoints.len(),
                    "path found"
                );
                return Ok(path);
            }

            let node = grid.node_by_index(entry.index);
            for neighbor in grid.neighbors(node) {
                let Some(n_index) = grid.index_of(&neighbor.coord) else { continue };
                let record = &mut arena.records[n_index];
                if !neighbor.walkable || record.closed {
                    continue;
                }

                let tentative = current.g_cost + self.step_cost.between(&node.coord, &neighbor.coord);
                if !record.opened || tentative < record.g_cost {
                    record.g_cost = tentative;
                    record.h_cost = neighbor.coord.manhattan(&goal);
                    record.parent = Some(entry.index);
                    record.opened = true;
                    seq += 1;
                    open.push(OpenEntry {
                        f_cost: record.f_cost(),
                        h_cost: record.h_cost,
                        seq,
                        index: n_index,
                    });
                }
            }
        }

        warn!(%start, %goal, "open set exhausted, no path");
        Err(no_path())
    }

    fn reconstruct(
        &self,
        arena: &SearchArena,
        start: GridCoord,
        start_index: usize,
        goal_index: usize,
    ) -> PlannedPath {
        let mut cells = Vec::new();
        let mut index = goal_index;
        while index != start_index {
            cells.push(self.grid.node_by_index(index).coord);
            match arena.records[index].parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
        cells.reverse();

        let waypoints = smooth_path(&start, &cells)
            .iter()
            .filter_map(|coord| self.grid.node(coord).cloned())
            .collect();

        PlannedPath {
            start,
            goal: self.grid.node_by_index(goal_index).coord,
            cells,
            waypoints,
            cost: arena.records[goal_index].g_cost,
        }
    }
}

/// Reduce a cell-by-cell path to the cells where the direction of travel changes.
/// The direction into the first cell is measured from `start`; the last cell is always kept.
pub fn smooth_path(start: &GridCoord, cells: &[GridCoord]) -> Vec<GridCoord> {
    let mut waypoints = Vec::new();
    let mut previous = *start;
    for (i, cell) in cells.iter().enumerate() {
        match cells.get(i + 1) {
            Some(next) => {
                if previous.direction_to(cell) != cell.direction_to(next) {
                    waypoints.push(*cell);
                }
            }
            None => waypoints.push(*cell),
        }
        previous = *cell;
    }
    waypoints
}
