pub mod calculate;
pub mod planet;
pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{ToolParameter, ToolSpec};
