pub mod actors;
pub mod events;
pub mod follower;
pub mod grid;
pub mod obstacles;
pub mod pathfinding;
pub mod ports;
pub mod types;

pub use actors::*;
pub use events::*;
pub use follower::*;
pub use grid::*;
pub use obstacles::*;
pub use pathfinding::*;
pub use ports::*;
pub use types::*;
