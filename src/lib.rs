//! Workspace-level crate used by the cross-crate integration tests in `tests/`.
pub use toolbox_core::*;
