//! The [`Prober`] trait and its MediaInfo implementation.

use std::path::Path;
use std::sync::Arc;

use tf_core::{Error, Result, SourceSnapshot, Tool};
use tf_probe::{parse_lines, Section, StreamSet};

use crate::tools::ToolRegistry;

/// A media file prober producing the raw line-oriented report.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
pub trait Prober: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Run the prober against `path` and return its report, line by line.
    fn probe_lines(&self, path: &Path) -> Result<Vec<String>>;

    /// Probe and split the report into sections.
    fn probe_sections(&self, path: &Path) -> Result<Vec<Section>> {
        let lines = self.probe_lines(path)?;
        Ok(parse_lines(lines.iter().map(String::as_str)))
    }

    /// Probe and build typed stream views.
    fn probe(&self, path: &Path) -> Result<StreamSet> {
        Ok(StreamSet::from_sections(self.probe_sections(path)?))
    }
}

/// Runs `mediainfo -f <path>`.
#[derive(Debug, Clone)]
pub struct MediaInfoProber {
    tools: Arc<ToolRegistry>,
}

impl MediaInfoProber {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }
}

impl Prober for MediaInfoProber {
    fn name(&self) -> &'static str {
        "mediainfo"
    }

    fn probe_lines(&self, path: &Path) -> Result<Vec<String>> {
        let mut cmd = self.tools.command(Tool::MediaInfo)?;

        if !path.exists() {
            return Err(Error::source_not_found(path));
        }

        cmd.arg("-f").path_arg(path);
        let output = cmd.run()?;

        if !output.class().is_success() {
            let message = output
                .stderr
                .iter()
                .chain(output.stdout.iter())
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("probe failed with arguments {:?}", cmd.get_args()));
            let diagnostics = cmd.diagnostics(&output, Some(SourceSnapshot::capture(path)));
            return Err(Error::tool_failed(message, diagnostics));
        }

        tracing::debug!(
            "probed {} ({} lines)",
            path.display(),
            output.stdout.len()
        );
        Ok(output.stdout)
    }
}
