//! In-place Matroska property edits with mkvpropedit.
//!
//! Every logical edit becomes one invocation of the form
//! `mkvpropedit <file> --edit <selector> --set <field>=<value>` or
//! `... --delete <field>` when the new value is unset.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tf_core::{Error, Result, SourceSnapshot, Tool};
use tf_probe::{LanguageIdentifier, StereoMode};

use crate::command::{ExitClass, ToolCommand, ToolOutput};
use crate::matcher::{OutputMatcher, RegexMatcher};
use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    fn letter(self) -> char {
        match self {
            TrackKind::Video => 'v',
            TrackKind::Audio => 'a',
        }
    }
}

/// What an edit applies to. Track indices are 0-based here and 1-based in
/// the rendered selector: `Track(Audio, 1)` is `track:a2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Segment information (container-level fields).
    Info,
    Track(TrackKind, usize),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Info => f.write_str("info"),
            Selector::Track(kind, index) => write!(f, "track:{}{}", kind.letter(), index + 1),
        }
    }
}

/// One logical property edit. `None` deletes the property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyEdit {
    /// Container title.
    Title(Option<String>),
    /// Display name of a track.
    TrackName {
        kind: TrackKind,
        index: usize,
        value: Option<String>,
    },
    /// Stereoscopic layout of a video track.
    StereoMode {
        index: usize,
        value: Option<StereoMode>,
    },
    Language {
        kind: TrackKind,
        index: usize,
        value: Option<LanguageIdentifier>,
    },
    DefaultFlag {
        kind: TrackKind,
        index: usize,
        value: Option<bool>,
    },
}

impl PropertyEdit {
    pub fn selector(&self) -> Selector {
        match *self {
            PropertyEdit::Title(_) => Selector::Info,
            PropertyEdit::TrackName { kind, index, .. }
            | PropertyEdit::Language { kind, index, .. }
            | PropertyEdit::DefaultFlag { kind, index, .. } => Selector::Track(kind, index),
            PropertyEdit::StereoMode { index, .. } => Selector::Track(TrackKind::Video, index),
        }
    }

    /// Matroska property name understood by mkvpropedit.
    pub fn field(&self) -> &'static str {
        match self {
            PropertyEdit::Title(_) => "title",
            PropertyEdit::TrackName { .. } => "name",
            PropertyEdit::StereoMode { .. } => "stereo-mode",
            PropertyEdit::Language { .. } => "language",
            PropertyEdit::DefaultFlag { .. } => "flag-default",
        }
    }

    /// Rendered new value, `None` for a delete.
    pub fn value(&self) -> Option<String> {
        match self {
            PropertyEdit::Title(v) | PropertyEdit::TrackName { value: v, .. } => v.clone(),
            PropertyEdit::StereoMode { value, .. } => value.map(|m| m.to_string()),
            PropertyEdit::Language { value, .. } => value.as_ref().map(|l| l.to_string()),
            PropertyEdit::DefaultFlag { value, .. } => {
                value.map(|b| if b { "1" } else { "0" }.to_string())
            }
        }
    }

    /// The `--edit <selector> --set|--delete ...` argument group.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["--edit".to_string(), self.selector().to_string()];
        match self.value() {
            Some(value) => {
                args.push("--set".to_string());
                args.push(format!("{}={}", self.field(), value));
            }
            None => {
                args.push("--delete".to_string());
                args.push(self.field().to_string());
            }
        }
        args
    }
}

impl fmt::Display for PropertyEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{} {}={:?}", self.selector(), self.field(), v),
            None => write!(f, "{} delete {}", self.selector(), self.field()),
        }
    }
}

/// Applies property edits to a file on disk.
pub trait PropertyEditor: Send + Sync {
    fn apply(&self, path: &Path, edit: &PropertyEdit) -> Result<()>;
}

/// [`PropertyEditor`] that runs mkvpropedit once per edit.
#[derive(Clone)]
pub struct PropEditRunner {
    tools: Arc<ToolRegistry>,
    matcher: Arc<dyn OutputMatcher>,
}

impl PropEditRunner {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self::with_matcher(tools, Arc::new(RegexMatcher::default()))
    }

    pub fn with_matcher(tools: Arc<ToolRegistry>, matcher: Arc<dyn OutputMatcher>) -> Self {
        Self { tools, matcher }
    }

    /// Error line from stdout, then stderr, else a generic message.
    fn failure_message(&self, cmd: &ToolCommand, output: &ToolOutput) -> String {
        self.matcher
            .first_error(&output.stdout)
            .or_else(|| self.matcher.first_error(&output.stderr))
            .unwrap_or_else(|| format!("property edit failed with arguments {:?}", cmd.get_args()))
    }
}

impl PropertyEditor for PropEditRunner {
    fn apply(&self, path: &Path, edit: &PropertyEdit) -> Result<()> {
        let mut cmd = self.tools.command(Tool::Mkvpropedit)?;

        if !path.exists() {
            return Err(Error::source_not_found(path));
        }

        cmd.path_arg(path).args(edit.args());
        let output = cmd.run()?;

        match output.class() {
            ExitClass::Success => {}
            ExitClass::Warning => {
                tracing::warn!("mkvpropedit reported warnings for {}: {}", path.display(), edit);
            }
            ExitClass::Error => {
                let message = self.failure_message(&cmd, &output);
                let diagnostics = cmd.diagnostics(&output, Some(SourceSnapshot::capture(path)));
                return Err(Error::tool_failed(message, diagnostics));
            }
        }

        tracing::debug!("applied {} to {}", edit, path.display());
        Ok(())
    }
}
