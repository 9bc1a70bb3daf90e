//! # tf-av
//!
//! Drives the external MKVToolNix and MediaInfo executables.
//!
//! - [`ToolRegistry`] resolves tool paths per capability, at first use.
//! - [`ToolCommand`] runs a tool, streaming stdout lines to a callback while
//!   stderr is drained on a helper thread.
//! - [`OutputMatcher`] turns output lines into progress values and error
//!   messages.
//! - [`StagedOutput`] gives atomic temp-then-rename replacement.
//! - [`MediaFile`] memoizes one probe of one file.
//! - [`ConvertRunner`] and [`PropEditRunner`] are the mutating operations.
//!
//! Everything here blocks the calling thread until the child exits.

pub mod command;
pub mod convert;
pub mod matcher;
pub mod media_file;
pub mod prober;
pub mod propedit;
pub mod staging;
pub mod tools;

pub use command::{ExitClass, ToolCommand, ToolOutput};
pub use convert::{default_destination, ConvertRunner, ProgressCallback};
pub use matcher::{OutputMatcher, RegexMatcher};
pub use media_file::MediaFile;
pub use prober::{MediaInfoProber, Prober};
pub use propedit::{PropEditRunner, PropertyEdit, PropertyEditor, Selector, TrackKind};
pub use staging::StagedOutput;
pub use tools::{ToolInfo, ToolRegistry};
pub use tf_core::{Error, Result};
