//! Remuxing into Matroska with mkvmerge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tf_core::{Error, Result, SourceSnapshot, Tool};

use crate::command::{ExitClass, ToolCommand, ToolOutput};
use crate::matcher::{OutputMatcher, RegexMatcher};
use crate::staging::StagedOutput;
use crate::tools::ToolRegistry;

/// Progress callback, called with a percentage on the thread draining the
/// tool's stdout.
pub type ProgressCallback<'a> = &'a dyn Fn(u8);

/// Runs `mkvmerge -o <temp> <source>` and moves the result into place.
///
/// Stateless apart from its configuration, so one runner can serve many
/// threads at once.
#[derive(Clone)]
pub struct ConvertRunner {
    tools: Arc<ToolRegistry>,
    matcher: Arc<dyn OutputMatcher>,
}

impl ConvertRunner {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self::with_matcher(tools, Arc::new(RegexMatcher::default()))
    }

    pub fn with_matcher(tools: Arc<ToolRegistry>, matcher: Arc<dyn OutputMatcher>) -> Self {
        Self { tools, matcher }
    }

    /// Remux `source` into `destination`.
    ///
    /// The destination is only replaced once mkvmerge exits with 0 or 1
    /// and the staged output exists. On any failure the destination is
    /// left as it was and the staged temp file is removed.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotConfigured`] / [`Error::ToolNotFound`] if mkvmerge
    ///   cannot be resolved.
    /// - [`Error::SourceNotFound`] if `source` is missing right now.
    /// - [`Error::ToolFailed`] for exit codes of 2 and above, carrying the
    ///   extracted message and full diagnostics.
    pub fn convert(
        &self,
        source: &Path,
        destination: &Path,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<PathBuf> {
        let mut cmd = self.tools.command(Tool::Mkvmerge)?;

        if !source.exists() {
            return Err(Error::source_not_found(source));
        }

        let staged = StagedOutput::new(destination)?;
        cmd.arg("-o").path_arg(staged.temp_path()).path_arg(source);

        let output = cmd.run_streaming(|line| {
            if let (Some(cb), Some(pct)) = (progress, self.matcher.progress(line)) {
                cb(pct);
            }
        })?;

        match output.class() {
            ExitClass::Success => {}
            ExitClass::Warning => {
                tracing::warn!(
                    "mkvmerge finished {} with warnings: {}",
                    source.display(),
                    output.stdout.iter().filter(|l| l.starts_with("Warning")).count()
                );
            }
            ExitClass::Error => {
                let message = self.failure_message(&cmd, &output);
                let diagnostics = cmd.diagnostics(&output, Some(SourceSnapshot::capture(source)));
                return Err(Error::tool_failed(message, diagnostics));
            }
        }

        if !staged.temp_path().exists() {
            let diagnostics = cmd.diagnostics(&output, Some(SourceSnapshot::capture(source)));
            return Err(Error::tool_failed(
                "tool reported success but produced no output",
                diagnostics,
            ));
        }

        let path = staged.finalize()?;
        tracing::info!("converted {} -> {}", source.display(), path.display());
        Ok(path)
    }

    /// Error line from stderr, then stdout, else a generic message.
    fn failure_message(&self, cmd: &ToolCommand, output: &ToolOutput) -> String {
        self.matcher
            .first_error(&output.stderr)
            .or_else(|| self.matcher.first_error(&output.stdout))
            .unwrap_or_else(|| {
                format!(
                    "exited with code {:?} (arguments: {:?})",
                    output.exit_code,
                    cmd.get_args()
                )
            })
    }
}

/// Default destination for converting `source`: the same stem with an
/// `.mkv` extension, next to the source or inside `output_dir`.
pub fn default_destination(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = Path::new(source.file_name().unwrap_or_else(|| "output".as_ref()))
        .with_extension("mkv");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => source.with_file_name(file_name),
    }
}
