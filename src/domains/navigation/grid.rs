use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ports::ObstacleMap;
use super::types::{GridCoord, Position2D};
use crate::common::{DomainError, DomainResult};

/// Dimensions and placement of a grid in world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub node_size: f64,
    /// World position of the grid's center.
    #[serde(default)]
    pub center: Position2D,
}

impl GridSpec {
    pub fn new(width: usize, height: usize, node_size: f64) -> Self {
        Self { width, height, node_size, center: Position2D::default() }
    }

    pub fn centered_at(mut self, center: Position2D) -> Self {
        self.center = center;
        self
    }
}

/// A single cell. Geometry only; search bookkeeping lives in the search arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub coord: GridCoord,
    pub world_position: Position2D,
    pub walkable: bool,
}

/// Immutable walkability snapshot of the world.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    node_size: f64,
    origin: Position2D,
    nodes: Vec<Node>,
}

impl Grid {
    /// Compute walkability for every cell center once from `obstacles`.
    pub fn build(spec: &GridSpec, obstacles: &dyn ObstacleMap) -> DomainResult<Self> {
        if spec.width == 0 || spec.height == 0 {
            return Err(DomainError::InvalidCommand {
                reason: "Grid dimensions must be positive".to_string(),
            });
        }
        if spec.node_size.is_nan() || spec.node_size <= 0.0 {
            return Err(DomainError::InvalidCommand {
                reason: format!("Node size must be positive, got {}", spec.node_size),
            });
        }

        let origin = Position2D {
            x: spec.center.x - spec.width as f64 * spec.node_size * 0.5,
            y: spec.center.y - spec.height as f64 * spec.node_size * 0.5,
        };

        // Row-major by y, so index = y * width + x.
        let mut nodes = Vec::with_capacity(spec.width * spec.height);
        for y in 0..spec.height {
            for x in 0..spec.width {
                let world_position = Position2D {
                    x: origin.x + (x as f64 + 0.5) * spec.node_size,
                    y: origin.y + (y as f64 + 0.5) * spec.node_size,
                };
                nodes.push(Node {
                    coord: GridCoord::new(x as i32, y as i32),
                    walkable: !obstacles.is_obstacle(&world_position),
                    world_position,
                });
            }
        }

        let grid = Self {
            width: spec.width,
            height: spec.height,
            node_size: spec.node_size,
            origin,
            nodes,
        };
        debug!(
            width = grid.width,
            height = grid.height,
            walkable = grid.walkable_count(),
            "grid built"
        );
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn node_size(&self) -> f64 {
        self.node_size
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.walkable).count()
    }

    pub fn index_of(&self, coord: &GridCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn node(&self, coord: &GridCoord) -> Option<&Node> {
        self.index_of(coord).map(|i| &self.nodes[i])
    }

    pub(crate) fn node_by_index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Nearest in-bounds node for any world point.
    pub fn node_at(&self, point: &Position2D) -> &Node {
        let percent_x = ((point.x - self.origin.x) / (self.width as f64 * self.node_size)).clamp(0.0, 1.0);
        let percent_y = ((point.y - self.origin.y) / (self.height as f64 * self.node_size)).clamp(0.0, 1.0);

        let x = ((percent_x * self.width as f64).floor() as usize).min(self.width - 1);
        let y = ((percent_y * self.height as f64).floor() as usize).min(self.height - 1);

        &self.nodes[y * self.width + x]
    }

    /// All in-bounds cells around `node`, excluding `node`.
    /// Order is fixed (dx outer, dy inner, both -1..=1) so searches tie-break reproducibly.
    pub fn neighbors(&self, node: &Node) -> Vec<&Node> {
        let mut neighbors = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let coord = GridCoord::new(node.coord.x + dx, node.coord.y + dy);
                if let Some(neighbor) = self.node(&coord) {
                    neighbors.push(neighbor);
                }
            }
        }
        neighbors
    }

    pub fn grid_to_world(&self, coord: &GridCoord) -> Option<Position2D> {
        self.node(coord).map(|n| n.world_position)
    }

    pub fn is_in_grid(&self, point: &Position2D) -> bool {
        let percent_x = (point.x - self.origin.x) / (self.width as f64 * self.node_size);
        let percent_y = (point.y - self.origin.y) / (self.height as f64 * self.node_size);
        (0.0..=1.0).contains(&percent_x) && (0.0..=1.0).contains(&percent_y)
    }
}
