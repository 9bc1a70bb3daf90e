//! External tool resolution.
//!
//! The [`ToolRegistry`] turns the configured [`ToolsConfig`] into concrete
//! executable paths. Resolution is per capability and deferred until a
//! tool is actually needed, so a missing `mkvmerge` never stops probing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use tf_core::{Error, Result, Tool, ToolsConfig};

use crate::command::ToolCommand;

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub tool: Tool,
    /// Whether the tool resolved to an existing executable.
    pub available: bool,
    /// First line of `--version` output, if available.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
    /// Why resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolves and caches tool locations.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    config: ToolsConfig,
    resolved: Mutex<HashMap<Tool, PathBuf>>,
}

impl ToolRegistry {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            config,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// Resolve the executable for `tool`.
    ///
    /// A configured path must exist; there is no silent fallback to `PATH`
    /// when the user pointed somewhere explicit. An unset path is looked
    /// up with [`which::which`].
    ///
    /// # Errors
    ///
    /// [`Error::ToolNotFound`] for a configured path that does not exist,
    /// [`Error::ToolNotConfigured`] when nothing is configured or on `PATH`.
    pub fn resolve(&self, tool: Tool) -> Result<PathBuf> {
        if let Some(path) = self.resolved.lock().get(&tool) {
            return Ok(path.clone());
        }

        let path = match self.config.path_for(tool) {
            Some(p) if p.exists() => p.to_path_buf(),
            Some(p) => {
                return Err(Error::ToolNotFound {
                    tool,
                    path: p.to_path_buf(),
                })
            }
            None => which::which(tool.binary_name())
                .map_err(|_| Error::ToolNotConfigured { tool })?,
        };

        tracing::debug!("resolved {} to {}", tool, path.display());
        self.resolved.lock().insert(tool, path.clone());
        Ok(path)
    }

    /// Resolve `tool` and start a command for it.
    pub fn command(&self, tool: Tool) -> Result<ToolCommand> {
        Ok(ToolCommand::new(tool, self.resolve(tool)?))
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        Tool::ALL
            .iter()
            .map(|&tool| match self.resolve(tool) {
                Ok(path) => ToolInfo {
                    tool,
                    available: true,
                    version: detect_version(tool, &path),
                    path: Some(path),
                    error: None,
                },
                Err(e) => ToolInfo {
                    tool,
                    available: false,
                    version: None,
                    path: self.config.path_for(tool).map(Path::to_path_buf),
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}

/// Run `<tool> --version` and return the first non-empty stdout line.
fn detect_version(tool: Tool, path: &Path) -> Option<String> {
    let mut cmd = ToolCommand::new(tool, path);
    cmd.arg("--version");
    let output = cmd.run().ok()?;
    if !output.class().is_success() {
        return None;
    }
    output
        .stdout
        .into_iter()
        .map(|l| l.trim().to_string())
        .find(|l| !l.is_empty())
}
