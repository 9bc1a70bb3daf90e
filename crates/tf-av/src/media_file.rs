//! One on-disk media file and its lazily probed streams.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tf_core::Result;
use tf_probe::StreamSet;

use crate::prober::Prober;

enum ProbeState {
    Unprobed,
    Probed(Arc<StreamSet>),
}

/// A media file whose streams are probed on first access.
///
/// Construction never touches the filesystem or the prober, so instances
/// can be created speculatively. The first successful probe is memoized
/// for the lifetime of the instance and there is no way back to the
/// unprobed state: after the file changes on disk, build a new instance
/// with [`MediaFile::refreshed`].
///
/// A failed probe is not memoized; the next access tries again.
pub struct MediaFile {
    path: PathBuf,
    prober: Arc<dyn Prober>,
    state: Mutex<ProbeState>,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, prober: Arc<dyn Prober>) -> Self {
        Self {
            path: path.into(),
            prober,
            state: Mutex::new(ProbeState::Unprobed),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed streams, probing on first call.
    ///
    /// # Errors
    ///
    /// Configuration, source and tool errors from the prober surface here,
    /// not at construction.
    pub fn streams(&self) -> Result<Arc<StreamSet>> {
        let mut state = self.state.lock();
        if let ProbeState::Probed(ref streams) = *state {
            return Ok(Arc::clone(streams));
        }

        let streams = Arc::new(self.prober.probe(&self.path)?);
        tracing::debug!(
            "{} has {} streams ({})",
            self.path.display(),
            streams.len(),
            self.prober.name()
        );
        *state = ProbeState::Probed(Arc::clone(&streams));
        Ok(streams)
    }

    pub fn is_probed(&self) -> bool {
        matches!(*self.state.lock(), ProbeState::Probed(_))
    }

    /// A fresh, unprobed instance for the same path and prober.
    pub fn refreshed(&self) -> MediaFile {
        MediaFile::new(self.path.clone(), Arc::clone(&self.prober))
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("path", &self.path)
            .field("prober", &self.prober.name())
            .field("probed", &self.is_probed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tf_core::Error;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl Prober for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn probe_lines(&self, path: &Path) -> Result<Vec<String>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(Error::source_not_found(path));
            }
            Ok(vec![
                "General".into(),
                "Format : Matroska".into(),
                "Audio".into(),
                "Channel(s) : 2".into(),
            ])
        }
    }

    #[test]
    fn construction_does_not_probe() {
        let prober = Arc::new(Counting::default());
        let file = MediaFile::new("/nowhere.mkv", prober.clone());
        assert!(!file.is_probed());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn streams_are_memoized() {
        let prober = Arc::new(Counting::default());
        let file = MediaFile::new("movie.mkv", prober.clone());

        let a = file.streams().unwrap();
        let b = file.streams().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
        assert!(file.is_probed());
        assert_eq!(a.audio(0).and_then(|s| s.channels()), Some(2));
    }

    #[test]
    fn failure_surfaces_lazily_and_is_not_memoized() {
        let prober = Arc::new(Counting {
            fail_first: true,
            ..Default::default()
        });
        let file = MediaFile::new("movie.mkv", prober.clone());

        assert!(matches!(file.streams(), Err(Error::SourceNotFound { .. })));
        assert!(!file.is_probed());
        assert!(file.streams().is_ok());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn refreshed_is_a_new_unprobed_instance() {
        let prober = Arc::new(Counting::default());
        let file = MediaFile::new("movie.mkv", prober.clone());
        file.streams().unwrap();

        let fresh = file.refreshed();
        assert_eq!(fresh.path(), file.path());
        assert!(!fresh.is_probed());
        fresh.streams().unwrap();
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    }
}
