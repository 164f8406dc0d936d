pub mod dispatcher;
pub mod interpreter;
pub mod locations;
pub mod prompts;
pub mod types;

pub use dispatcher::*;
pub use interpreter::*;
pub use locations::*;
pub use prompts::*;
pub use types::*;
