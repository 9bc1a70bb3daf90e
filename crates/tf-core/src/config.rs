//! Tool configuration shared by every crate that spawns external processes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The external executables trackforge drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Stream inspection (`mediainfo -f`).
    MediaInfo,
    /// Container conversion (`mkvmerge -o <out> <src>`).
    Mkvmerge,
    /// In-place property editing (`mkvpropedit`).
    Mkvpropedit,
}

impl Tool {
    /// All tools, in the order they are reported by `check-tools`.
    pub const ALL: [Tool; 3] = [Tool::MediaInfo, Tool::Mkvmerge, Tool::Mkvpropedit];

    /// Executable name used for `PATH` lookup.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::MediaInfo => "mediainfo",
            Tool::Mkvmerge => "mkvmerge",
            Tool::Mkvpropedit => "mkvpropedit",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Paths to the external executables.
///
/// Every path is optional. Nothing here is validated at load time: a
/// registry checks the path for one tool only when that capability is
/// first used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub mediainfo_path: Option<PathBuf>,

    #[serde(default)]
    pub mkvmerge_path: Option<PathBuf>,

    #[serde(default)]
    pub mkvpropedit_path: Option<PathBuf>,
}

impl ToolsConfig {
    /// Configured path for `tool`, if any.
    pub fn path_for(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::MediaInfo => self.mediainfo_path.as_deref(),
            Tool::Mkvmerge => self.mkvmerge_path.as_deref(),
            Tool::Mkvpropedit => self.mkvpropedit_path.as_deref(),
        }
    }

    /// Builder-style override for a single tool path.
    pub fn with_path(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match tool {
            Tool::MediaInfo => self.mediainfo_path = path,
            Tool::Mkvmerge => self.mkvmerge_path = path,
            Tool::Mkvpropedit => self.mkvpropedit_path = path,
        }
        self
    }
}
