pub mod aggregate;
pub mod coordinator;
pub mod events;
pub mod projections;
pub mod prompts;

pub use aggregate::*;
pub use coordinator::*;
pub use events::*;
pub use projections::*;
pub use prompts::*;
