use super::types::Position2D;

/// Port the grid depends on to decide walkability of a cell center.
/// Queried once per cell when the grid is built.
pub trait ObstacleMap: Send + Sync {
    fn is_obstacle(&self, point: &Position2D) -> bool;
}

impl<F> ObstacleMap for F
where
    F: Fn(&Position2D) -> bool + Send + Sync,
{
    fn is_obstacle(&self, point: &Position2D) -> bool {
        self(point)
    }
}
