use serde::{Deserialize, Serialize};

pub use tf_core::ToolsConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub patterns: PatternsConfig,
}

/// Worker pool sizes. `0` means one worker per available processor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConcurrencyConfig {
    #[serde(default)]
    pub probe_workers: usize,

    #[serde(default)]
    pub edit_workers: usize,

    /// Remuxing is disk-bound; keep this lower than the others.
    #[serde(default = "default_convert_workers")]
    pub convert_workers: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            probe_workers: 0,
            edit_workers: 0,
            convert_workers: default_convert_workers(),
        }
    }
}

fn default_convert_workers() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitConfig {
    /// Attempts of the whole edit batch before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub on_exhausted: ExhaustedPolicy,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            on_exhausted: ExhaustedPolicy::default(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

/// What the caller does once a commit batch has run out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustedPolicy {
    /// Log the failure and keep going with the rest of the batch.
    Log,
    /// Surface the failure as an error.
    Escalate,
}

impl Default for ExhaustedPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ExhaustedPolicy::Escalate
        } else {
            ExhaustedPolicy::Log
        }
    }
}

/// Overrides for the output matchers. Unset patterns keep the built-in
/// MKVToolNix defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PatternsConfig {
    #[serde(default)]
    pub progress: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}
