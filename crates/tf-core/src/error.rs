//! Unified error type for trackforge.
//!
//! Failures fall into a small taxonomy: configuration problems (a tool
//! path is missing or points nowhere), source validation (the input file
//! vanished), and external-tool failures. Tool failures always carry a
//! [`ToolDiagnostics`] record with the raw invocation and captured output.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Tool;

/// Unified error type covering all failure modes of the process layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No path is configured for the tool and it is not on `PATH`.
    #[error("{tool} is not configured and was not found in PATH")]
    ToolNotConfigured {
        /// The tool that was required.
        tool: Tool,
    },

    /// A path is configured for the tool but nothing exists there.
    #[error("{tool} not found at {}", path.display())]
    ToolNotFound {
        /// The tool that was required.
        tool: Tool,
        /// The configured path.
        path: PathBuf,
    },

    /// The file to operate on does not exist at invocation time.
    #[error("source file not found: {}", path.display())]
    SourceNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// The tool could not be started at all.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        /// The tool that failed to start.
        tool: Tool,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The tool ran and reported an error exit code.
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// The tool that failed.
        tool: Tool,
        /// Extracted (or generic) error message.
        message: String,
        /// Raw invocation context.
        diagnostics: Box<ToolDiagnostics>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for [`Error::SourceNotFound`].
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Error::SourceNotFound { path: path.into() }
    }

    /// Convenience constructor for [`Error::ToolFailed`].
    pub fn tool_failed(message: impl Into<String>, diagnostics: ToolDiagnostics) -> Self {
        Error::ToolFailed {
            tool: diagnostics.tool,
            message: message.into(),
            diagnostics: Box::new(diagnostics),
        }
    }

    /// Diagnostics attached to a tool failure, if this is one.
    pub fn diagnostics(&self) -> Option<&ToolDiagnostics> {
        match self {
            Error::ToolFailed { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }

    /// Whether repeating the same operation could plausibly succeed.
    ///
    /// Configuration and source-validation failures are deterministic and
    /// are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ToolNotConfigured { .. }
            | Error::ToolNotFound { .. }
            | Error::SourceNotFound { .. }
            | Error::Config(_) => false,
            Error::Spawn { .. } | Error::ToolFailed { .. } | Error::Io { .. } => true,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// State of the source file captured when a tool failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub path: PathBuf,
    pub exists: bool,
    pub size: Option<u64>,
}

impl SourceSnapshot {
    /// Stat `path` right now. Never fails; a missing file is recorded as such.
    pub fn capture(path: &Path) -> Self {
        let meta = std::fs::metadata(path).ok();
        Self {
            path: path.to_path_buf(),
            exists: meta.is_some(),
            size: meta.map(|m| m.len()),
        }
    }
}

/// Everything known about a failed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDiagnostics {
    pub tool: Tool,
    pub program: PathBuf,
    /// Arguments exactly as passed to the process.
    pub args: Vec<String>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub source: Option<SourceSnapshot>,
}

impl fmt::Display for ToolDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program: {}", self.program.display())?;
        writeln!(f, "arguments: {:?}", self.args)?;
        match self.exit_code {
            Some(code) => writeln!(f, "exit code: {code}")?,
            None => writeln!(f, "exit code: <terminated by signal>")?,
        }
        if let Some(ref src) = self.source {
            match src.size {
                Some(size) => writeln!(f, "source: {} ({size} bytes)", src.path.display())?,
                None => writeln!(f, "source: {} (missing)", src.path.display())?,
            }
        }
        writeln!(f, "stdout:")?;
        for line in &self.stdout {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "stderr:")?;
        for line in &self.stderr {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostics() -> ToolDiagnostics {
        ToolDiagnostics {
            tool: Tool::Mkvmerge,
            program: PathBuf::from("/usr/bin/mkvmerge"),
            args: vec!["-o".into(), "out.mkv".into(), "in.mp4".into()],
            exit_code: Some(2),
            stdout: vec!["Error: bad input".into()],
            stderr: vec![],
            source: None,
        }
    }

    #[test]
    fn tool_failed_display() {
        let err = Error::tool_failed("bad input", diagnostics());
        assert_eq!(err.to_string(), "mkvmerge failed: bad input");
        assert_eq!(err.diagnostics().unwrap().exit_code, Some(2));
    }

    #[test]
    fn tool_not_found_display() {
        let err = Error::ToolNotFound {
            tool: Tool::MediaInfo,
            path: PathBuf::from("/nowhere/mediainfo"),
        };
        assert_eq!(err.to_string(), "mediainfo not found at /nowhere/mediainfo");
    }

    #[test]
    fn retry_classification() {
        assert!(!Error::ToolNotConfigured { tool: Tool::Mkvpropedit }.is_retryable());
        assert!(!Error::source_not_found("/tmp/x.mkv").is_retryable());
        assert!(Error::tool_failed("x", diagnostics()).is_retryable());
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.diagnostics().is_none());
    }

    #[test]
    fn diagnostics_report_contains_arguments() {
        let report = diagnostics().to_string();
        assert!(report.contains(r#"["-o", "out.mkv", "in.mp4"]"#));
        assert!(report.contains("exit code: 2"));
        assert!(report.contains("  Error: bad input"));
    }

    #[test]
    fn snapshot_of_missing_file() {
        let snap = SourceSnapshot::capture(Path::new("/definitely/not/here.mkv"));
        assert!(!snap.exists);
        assert_eq!(snap.size, None);
    }
}
