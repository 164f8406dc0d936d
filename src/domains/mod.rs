pub mod intent;
pub mod logger;
pub mod navigation;
pub mod negotiation;
pub mod oracle;

pub use intent::*;
pub use logger::*;
pub use navigation::*;
pub use negotiation::*;
pub use oracle::*;
