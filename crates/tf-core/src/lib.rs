//! tf-core: shared error taxonomy and tool configuration.
//!
//! This crate is the foundational dependency for the other tf-* crates,
//! providing the unified [`Error`] type with its structured
//! [`ToolDiagnostics`] context, and the [`ToolsConfig`] value that is
//! injected into tool registries instead of living in global state.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use config::{Tool, ToolsConfig};
pub use error::{Error, Result, SourceSnapshot, ToolDiagnostics};
