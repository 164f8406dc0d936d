pub mod console_logger;
pub mod file_logger;
pub mod guarded_oracle;
pub mod multi_logger;
pub mod noop_logger;
pub mod scripted_oracle;

pub use console_logger::*;
pub use file_logger::*;
pub use guarded_oracle::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use scripted_oracle::*;
