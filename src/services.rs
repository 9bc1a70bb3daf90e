//! Wiring of configuration into registries, runners and pools.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tf_av::{ConvertRunner, MediaFile, MediaInfoProber, PropEditRunner, Prober, ToolRegistry};

use crate::batch::Pools;
use crate::commit::Committer;
use crate::config::{self, Config};

/// Everything a command needs, built from one [`Config`].
pub struct Services {
    pub config: Config,
    pub tools: Arc<ToolRegistry>,
    pub prober: Arc<dyn Prober>,
    pub converter: ConvertRunner,
    pub committer: Committer,
    pub pools: Pools,
}

impl Services {
    /// Build services. No tool is resolved here; each is looked up the
    /// first time it is used.
    pub fn from_config(config: Config) -> Result<Self> {
        let matcher = Arc::new(config::matcher_for(&config)?);
        let tools = Arc::new(ToolRegistry::new(config.tools.clone()));
        let prober: Arc<dyn Prober> = Arc::new(MediaInfoProber::new(tools.clone()));
        let converter = ConvertRunner::with_matcher(tools.clone(), matcher.clone());
        let editor = Arc::new(PropEditRunner::with_matcher(tools.clone(), matcher));
        let committer = Committer::from_config(editor, &config.commit);
        let pools = Pools::new(&config.concurrency)?;

        Ok(Self {
            config,
            tools,
            prober,
            converter,
            committer,
            pools,
        })
    }

    /// An unprobed [`MediaFile`] using the configured prober.
    pub fn media_file(&self, path: impl Into<PathBuf>) -> MediaFile {
        MediaFile::new(path, self.prober.clone())
    }
}
