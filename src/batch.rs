//! Bounded worker pools for running many files at once.
//!
//! Probing and property edits are cheap for the host and get one worker
//! per processor by default. Remuxing reads and writes whole files, so it
//! runs on a smaller pool of its own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tf_av::{ConvertRunner, MediaFile, ProgressCallback};
use tf_probe::StreamSet;

use crate::commit::{CommitOutcome, Committer, EditLedger};
use crate::config::ConcurrencyConfig;

/// The three worker pools.
pub struct Pools {
    probe: ThreadPool,
    edit: ThreadPool,
    convert: ThreadPool,
}

/// A source file and where its remuxed output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Pools {
    pub fn new(config: &ConcurrencyConfig) -> Result<Self> {
        Ok(Self {
            probe: build_pool("probe", config.probe_workers)?,
            edit: build_pool("edit", config.edit_workers)?,
            convert: build_pool("convert", config.convert_workers)?,
        })
    }

    pub fn probe_threads(&self) -> usize {
        self.probe.current_num_threads()
    }

    pub fn edit_threads(&self) -> usize {
        self.edit.current_num_threads()
    }

    pub fn convert_threads(&self) -> usize {
        self.convert.current_num_threads()
    }

    /// Probe every file. Results are in input order.
    pub fn probe_all(&self, files: &[MediaFile]) -> Vec<tf_core::Result<Arc<StreamSet>>> {
        self.probe
            .install(|| files.par_iter().map(MediaFile::streams).collect())
    }

    /// Remux every job. `progress` is called from worker threads with the
    /// job's source path and a percentage.
    pub fn convert_all(
        &self,
        runner: &ConvertRunner,
        jobs: &[ConvertJob],
        progress: &(dyn Fn(&Path, u8) + Sync),
    ) -> Vec<tf_core::Result<PathBuf>> {
        self.convert.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let report: ProgressCallback<'_> = &|pct| progress(&job.source, pct);
                    runner.convert(&job.source, &job.destination, Some(report))
                })
                .collect()
        })
    }

    /// Commit each ledger to its file. Returns the outcome and the
    /// refreshed file for each entry, in input order.
    pub fn commit_all(
        &self,
        committer: &Committer,
        work: &mut [(MediaFile, EditLedger)],
    ) -> Vec<(CommitOutcome, MediaFile)> {
        self.edit.install(|| {
            work.par_iter_mut()
                .map(|(file, ledger)| committer.commit(file, ledger))
                .collect()
        })
    }
}

/// `0` workers means one per available processor.
fn worker_count(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get()
    } else {
        requested
    }
}

fn build_pool(name: &'static str, requested: usize) -> Result<ThreadPool> {
    let threads = worker_count(requested);
    tracing::debug!("{} pool: {} workers", name, threads);
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("tf-{name}-{i}"))
        .build()
        .with_context(|| format!("Failed to build {name} pool"))
}
