//! Probe integration tests
//!
//! Runs the MediaInfo prober against a mock `mediainfo` script and checks
//! the typed stream model built from its report.

#![cfg(unix)]

mod common;

use assert_matches::assert_matches;
use common::{media_file, MockTools, SAMPLE_REPORT};
use tf_core::{Error, Tool};
use tf_probe::{Stream, StreamView};
use trackforge::services::Services;

#[test]
fn probe_builds_typed_streams_in_order() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");

    let services = Services::from_config(mocks.config()).unwrap();
    let file = services.media_file(&path);
    let streams = file.streams().unwrap();

    let kinds: Vec<&str> = streams
        .iter()
        .map(|s| match s {
            Stream::General(_) => "general",
            Stream::Video(_) => "video",
            Stream::Audio(_) => "audio",
        })
        .collect();
    assert_eq!(kinds, ["general", "video", "audio", "audio"]);

    let general = streams.general().unwrap();
    assert!(general.is_matroska());
    assert_eq!(general.movie_title().as_deref(), Some("Big Buck Bunny"));
    assert_eq!(general.duration_ms(), Some(5_400_123.0));

    let video = streams.video(0).unwrap();
    assert_eq!((video.width(), video.height()), (Some(1920), Some(1080)));
    assert_eq!(video.title().as_deref(), Some("Main"));

    let first = streams.audio(0).unwrap();
    assert_eq!(first.channels(), Some(6));
    assert_eq!(first.language().map(|l| l.to_string()).as_deref(), Some("en"));
    assert_eq!(first.language_name().as_deref(), Some("English"));
    assert!(first.is_default());

    let second = streams.audio(1).unwrap();
    assert_eq!(second.channels(), Some(2));
    assert_eq!(second.language().map(|l| l.to_string()).as_deref(), Some("de"));
    assert!(!second.is_default());
    assert!(streams.audio(2).is_none());
}

#[test]
fn prober_receives_full_verbosity_flag_and_path() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");

    let services = Services::from_config(mocks.config()).unwrap();
    services.media_file(&path).streams().unwrap();

    assert_eq!(mocks.log("mediainfo"), ["-f".to_string(), path.display().to_string()]);
}

#[test]
fn streams_are_probed_once_per_instance() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");

    let services = Services::from_config(mocks.config()).unwrap();
    let file = services.media_file(&path);
    file.streams().unwrap();
    file.streams().unwrap();
    assert_eq!(mocks.log("mediainfo").len(), 2);

    // A new instance probes again.
    file.refreshed().streams().unwrap();
    assert_eq!(mocks.log("mediainfo").len(), 4);
}

#[test]
fn missing_source_surfaces_on_access() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();

    let services = Services::from_config(mocks.config()).unwrap();
    let file = services.media_file(media.path().join("gone.mkv"));
    assert_matches!(file.streams(), Err(Error::SourceNotFound { .. }));
    assert!(mocks.log("mediainfo").is_empty());
}

#[test]
fn unconfigured_prober_surfaces_on_access() {
    let mocks = MockTools::new();
    // Configured, but the script was never written.
    let services = Services::from_config(mocks.config()).unwrap();
    let file = services.media_file("/any/movie.mkv");
    assert_matches!(
        file.streams(),
        Err(Error::ToolNotFound {
            tool: Tool::MediaInfo,
            ..
        })
    );
}

#[test]
fn prober_failure_carries_diagnostics() {
    let mocks = MockTools::new();
    mocks.script("mediainfo", "echo 'cannot open file' >&2\nexit 2");
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");

    let services = Services::from_config(mocks.config()).unwrap();
    let err = services.media_file(&path).streams().unwrap_err();
    assert_matches!(err, Error::ToolFailed { ref message, .. } if message == "cannot open file");

    let diagnostics = err.diagnostics().unwrap();
    assert_eq!(diagnostics.exit_code, Some(2));
    assert_eq!(diagnostics.args, ["-f".to_string(), path.display().to_string()]);
    assert_eq!(diagnostics.stderr, ["cannot open file"]);
}

#[test]
fn probe_all_runs_on_the_pool() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();

    let services = Services::from_config(mocks.config()).unwrap();
    let files: Vec<_> = (0..4)
        .map(|i| services.media_file(media_file(media.path(), &format!("{i}.mkv"), b"mkv")))
        .collect();
    let missing = services.media_file(media.path().join("missing.mkv"));

    let mut all = files;
    all.push(missing);
    let results = services.pools.probe_all(&all);

    assert_eq!(results.len(), 5);
    assert!(results[..4].iter().all(|r| r.as_ref().map(|s| s.len() == 4).unwrap_or(false)));
    assert_matches!(results[4], Err(Error::SourceNotFound { .. }));
}
