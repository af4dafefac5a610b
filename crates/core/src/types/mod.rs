pub mod context;
pub mod detection;

// Re-export commonly used types
pub use context::{ContextConfig, ContextTable};
pub use detection::{Detection, DetectionSource};
