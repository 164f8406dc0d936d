use serde::{Deserialize, Serialize};
use super::ports::ObstacleMap;
use super::types::Position2D;

/// Static obstacle layer: a set of shapes probed with a circle of `probe_radius`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleLayer {
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub probe_radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub shape: ObstacleShape,
    pub position: Position2D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleShape {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
}

impl ObstacleLayer {
    pub fn new(obstacles: Vec<Obstacle>, probe_radius: f64) -> Self {
        Self { obstacles, probe_radius }
    }

    pub fn with_probe_radius(mut self, probe_radius: f64) -> Self {
        self.probe_radius = probe_radius;
        self
    }
}

impl Obstacle {
    fn overlaps_circle(&self, center: &Position2D, radius: f64) -> bool {
        match self.shape {
            ObstacleShape::Circle { radius: r } => {
                self.position.distance_to(center) <= r + radius
            }
            ObstacleShape::Rectangle { width, height } => {
                // Closest point of the axis-aligned rectangle to the probe center.
                let half_w = width / 2.0;
                let half_h = height / 2.0;
                let cx = center.x.clamp(self.position.x - half_w, self.position.x + half_w);
                let cy = center.y.clamp(self.position.y - half_h, self.position.y + half_h);
                Position2D::new(cx, cy).distance_to(center) <= radius
            }
        }
    }
}

impl ObstacleMap for ObstacleLayer {
    fn is_obstacle(&self, point: &Position2D) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.overlaps_circle(point, self.probe_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_and_rectangle_overlap() {
        let layer = ObstacleLayer::new(
            vec![
                Obstacle {
                    id: "pond".to_string(),
                    shape: ObstacleShape::Circle { radius: 1.0 },
                    position: Position2D::new(0.0, 0.0),
                },
                Obstacle {
                    id: "wall".to_string(),
                    shape: ObstacleShape::Rectangle { width: 2.0, height: 4.0 },
                    position: Position2D::new(10.0, 0.0),
                },
            ],
            0.4,
        );

        assert!(layer.is_obstacle(&Position2D::new(1.2, 0.0)));
        assert!(!layer.is_obstacle(&Position2D::new(1.5, 0.0)));
        assert!(layer.is_obstacle(&Position2D::new(8.7, 1.9)));
        assert!(!layer.is_obstacle(&Position2D::new(10.0, 2.5)));
    }
}
