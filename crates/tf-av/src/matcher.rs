//! Extraction of progress and error messages from tool output lines.
//!
//! Free-text output formats drift between tool versions, so runners only
//! see the narrow [`OutputMatcher`] interface and the patterns themselves
//! can be swapped from configuration.

use std::sync::LazyLock;

use regex::Regex;
use tf_core::{Error, Result};

/// Default progress pattern, matching mkvmerge's `Progress: 42%`.
pub const DEFAULT_PROGRESS_PATTERN: &str = r"Progress:\s*(\d{1,3})%";

/// Default error pattern, matching MKVToolNix's `Error: ...` lines.
pub const DEFAULT_ERROR_PATTERN: &str = r"^Error:\s*(.+)$";

static DEFAULT_PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PROGRESS_PATTERN).expect("valid default pattern"));

static DEFAULT_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_ERROR_PATTERN).expect("valid default pattern"));

/// Text to progress, text to error.
pub trait OutputMatcher: Send + Sync {
    /// Percentage (0..=100) reported by `line`, if any.
    fn progress(&self, line: &str) -> Option<u8>;

    /// Error message carried by `line`, if any.
    fn error(&self, line: &str) -> Option<String>;

    /// First error message found in `lines`.
    fn first_error(&self, lines: &[String]) -> Option<String> {
        lines.iter().find_map(|l| self.error(l))
    }
}

/// [`OutputMatcher`] backed by two regular expressions. The first capture
/// group of each pattern is the extracted value; a pattern without groups
/// yields the whole match.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    progress: Regex,
    error: Regex,
}

impl RegexMatcher {
    /// Compile custom patterns.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if either pattern does not compile.
    pub fn new(progress: &str, error: &str) -> Result<Self> {
        Ok(Self {
            progress: compile("progress", progress)?,
            error: compile("error", error)?,
        })
    }

    /// Compile optional overrides, keeping defaults for unset patterns.
    pub fn with_overrides(progress: Option<&str>, error: Option<&str>) -> Result<Self> {
        let mut matcher = Self::default();
        if let Some(p) = progress {
            matcher.progress = compile("progress", p)?;
        }
        if let Some(e) = error {
            matcher.error = compile("error", e)?;
        }
        Ok(matcher)
    }
}

impl Default for RegexMatcher {
    fn default() -> Self {
        Self {
            progress: DEFAULT_PROGRESS.clone(),
            error: DEFAULT_ERROR.clone(),
        }
    }
}

impl OutputMatcher for RegexMatcher {
    fn progress(&self, line: &str) -> Option<u8> {
        let value: u32 = capture(&self.progress, line)?.parse().ok()?;
        Some(value.min(100) as u8)
    }

    fn error(&self, line: &str) -> Option<String> {
        let message = capture(&self.error, line)?.trim();
        (!message.is_empty()).then(|| message.to_string())
    }
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    let caps = re.captures(line)?;
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid {name} pattern: {e}")))
}
