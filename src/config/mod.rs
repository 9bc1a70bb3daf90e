mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use tf_av::RegexMatcher;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./trackforge.toml", "~/.config/trackforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("using config {}", path.display());
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration.
///
/// Tool paths are deliberately not checked here; each tool is resolved
/// when it is first needed.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.commit.max_attempts == 0 {
        anyhow::bail!("commit.max_attempts must be at least 1");
    }

    matcher_for(config)?;

    for tool in tf_core::Tool::ALL {
        if let Some(path) = config.tools.path_for(tool) {
            if !path.exists() {
                tracing::warn!("{} path does not exist: {:?}", tool, path);
            }
        }
    }

    Ok(())
}

/// Output matcher with the configured pattern overrides.
pub fn matcher_for(config: &Config) -> Result<RegexMatcher> {
    RegexMatcher::with_overrides(
        config.patterns.progress.as_deref(),
        config.patterns.error.as_deref(),
    )
    .context("Invalid output pattern")
}
