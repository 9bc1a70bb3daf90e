//! Writing pending edits to disk with bounded retry.

mod ledger;

pub use ledger::{EditLedger, PendingField, PendingValue};

use std::sync::Arc;

use tf_av::{MediaFile, PropertyEditor};
use tf_core::Error;

use crate::config::{CommitConfig, ExhaustedPolicy};

/// Result of one commit.
#[derive(Debug)]
pub enum CommitOutcome {
    /// The ledger was empty; nothing was run.
    Nothing,
    /// Every edit was applied. `attempts` counts whole-batch attempts.
    Committed { attempts: u32 },
    /// The batch kept failing; the ledger is left as it was.
    Failed { attempts: u32, cause: Error },
}

impl CommitOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, CommitOutcome::Failed { .. })
    }

    /// Apply the exhaustion policy: under [`ExhaustedPolicy::Log`] a
    /// failure is logged and swallowed, under [`ExhaustedPolicy::Escalate`]
    /// it is returned.
    pub fn into_result(self, policy: ExhaustedPolicy) -> tf_core::Result<()> {
        match self {
            CommitOutcome::Failed { attempts, cause } => match policy {
                ExhaustedPolicy::Escalate => Err(cause),
                ExhaustedPolicy::Log => {
                    tracing::warn!("commit failed after {} attempts: {}", attempts, cause);
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }
}

/// Applies an [`EditLedger`] to a file through a [`PropertyEditor`].
#[derive(Clone)]
pub struct Committer {
    editor: Arc<dyn PropertyEditor>,
    max_attempts: u32,
}

impl Committer {
    pub fn new(editor: Arc<dyn PropertyEditor>, max_attempts: u32) -> Self {
        Self {
            editor,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(editor: Arc<dyn PropertyEditor>, config: &CommitConfig) -> Self {
        Self::new(editor, config.max_attempts)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Apply every pending edit of `ledger` to `file`, in field order.
    ///
    /// A failure anywhere restarts the whole batch from the first field,
    /// up to the attempt ceiling. Configuration and missing-source errors
    /// end the loop immediately. On success the ledger is cleared.
    ///
    /// Whatever the outcome, a fresh [`MediaFile`] for the same path is
    /// returned so callers drop the stale probe.
    pub fn commit(&self, file: &MediaFile, ledger: &mut EditLedger) -> (CommitOutcome, MediaFile) {
        let outcome = self.run(file, ledger);
        (outcome, file.refreshed())
    }

    fn run(&self, file: &MediaFile, ledger: &mut EditLedger) -> CommitOutcome {
        if ledger.is_empty() {
            return CommitOutcome::Nothing;
        }

        let edits = ledger.edits();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match edits.iter().try_for_each(|edit| self.editor.apply(file.path(), edit)) {
                Ok(()) => {
                    tracing::info!(
                        "committed {} edits to {} (attempt {})",
                        edits.len(),
                        file.path().display(),
                        attempt
                    );
                    ledger.revert();
                    return CommitOutcome::Committed { attempts: attempt };
                }
                Err(cause) if !cause.is_retryable() || attempt >= self.max_attempts => {
                    return CommitOutcome::Failed {
                        attempts: attempt,
                        cause,
                    };
                }
                Err(cause) => {
                    tracing::warn!(
                        "commit attempt {}/{} for {} failed: {}",
                        attempt,
                        self.max_attempts,
                        file.path().display(),
                        cause
                    );
                }
            }
        }
    }
}
