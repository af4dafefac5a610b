//! Built-in project context detection from marker files

pub mod detector;

pub use detector::{ContextIdentity, Detector, MAX_PARENT_LEVELS};
