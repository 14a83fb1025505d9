mod definitions;
mod registry;
mod status;

pub use definitions::*;
pub use registry::ToolRegistry;
pub use status::StatusChecker;
