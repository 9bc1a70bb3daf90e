//! Commit orchestration tests
//!
//! Full commit cycles through the mkvpropedit runner and mock tools,
//! including retry of the whole batch and the re-probe afterwards.

#![cfg(unix)]

mod common;

use assert_matches::assert_matches;
use common::{media_file, MockTools, SAMPLE_REPORT};
use tf_core::Error;
use tf_probe::StreamView;
use trackforge::commit::{CommitOutcome, EditLedger, PendingField, PendingValue};
use trackforge::config::ExhaustedPolicy;
use trackforge::services::Services;

/// mkvpropedit mock failing its first `n` invocations.
fn flaky_propedit(mocks: &MockTools, n: u32) {
    let counter = mocks.path("count");
    mocks.mkvpropedit(&format!(
        "c=$(cat '{c}' 2>/dev/null || echo 0)\nc=$((c+1))\necho $c > '{c}'\n\
         if [ $c -le {n} ]; then echo 'Error: file is locked'; exit 2; fi\nexit 0",
        c = counter.display(),
    ));
}

fn full_ledger(services: &Services, path: &std::path::Path) -> EditLedger {
    let file = services.media_file(path);
    let streams = file.streams().unwrap();

    let mut ledger = EditLedger::new();
    ledger.propose_against(PendingField::Default(1), PendingValue::Flag(Some(true)), &streams);
    ledger.propose_against(PendingField::Title, PendingValue::Text(Some("Director's Cut".into())), &streams);
    ledger.propose_against(PendingField::Language(0), PendingValue::Language(Some("ja".parse().unwrap())), &streams);
    ledger.propose_against(PendingField::DisplayName, PendingValue::Text(Some("Main".into())), &streams);
    ledger.propose_against(PendingField::StereoMode, PendingValue::StereoMode(None), &streams);
    ledger
}

#[test]
fn only_changed_fields_are_pending() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let ledger = full_ledger(&services, &path);
    let fields: Vec<PendingField> = ledger.iter().map(|(f, _)| *f).collect();
    // Display name is already "Main" and there is no stereo mode to clear.
    assert_eq!(
        fields,
        [PendingField::Title, PendingField::Language(0), PendingField::Default(1)]
    );
}

#[test]
fn edits_run_in_fixed_order() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    flaky_propedit(&mocks, 0);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let file = services.media_file(&path);
    let mut ledger = full_ledger(&services, &path);
    let (outcome, _) = services.committer.commit(&file, &mut ledger);
    assert_matches!(outcome, CommitOutcome::Committed { attempts: 1 });

    let p = path.display();
    assert_eq!(
        mocks.log("mkvpropedit"),
        [
            format!("{p} --edit info --set title=Director's Cut"),
            format!("{p} --edit track:a1 --set language=ja"),
            format!("{p} --edit track:a2 --set flag-default=1"),
        ]
    );
}

#[test]
fn two_failures_then_success_clears_ledger() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    flaky_propedit(&mocks, 2);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let file = services.media_file(&path);
    let mut ledger = full_ledger(&services, &path);
    let (outcome, refreshed) = services.committer.commit(&file, &mut ledger);

    assert_matches!(outcome, CommitOutcome::Committed { attempts: 3 });
    assert!(ledger.is_empty());
    assert!(outcome.into_result(ExhaustedPolicy::Escalate).is_ok());

    // Each failed attempt stopped at the first edit; the last ran all three.
    let calls = mocks.log("mkvpropedit");
    assert_eq!(calls.len(), 5);
    assert!(calls[0].contains("--edit info"));
    assert!(calls[1].contains("--edit info"));
    assert!(calls[2].contains("--edit info"));

    // The returned file is re-probed from disk.
    let before = mocks.log("mediainfo").len();
    assert!(!refreshed.is_probed());
    let streams = refreshed.streams().unwrap();
    assert_eq!(streams.general().and_then(|g| g.format()).as_deref(), Some("Matroska"));
    assert_eq!(mocks.log("mediainfo").len(), before + 2);
}

#[test]
fn exhausted_retries_keep_ledger() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    flaky_propedit(&mocks, 100);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let file = services.media_file(&path);
    let mut ledger = full_ledger(&services, &path);
    let (outcome, _) = services.committer.commit(&file, &mut ledger);

    assert_eq!(ledger.len(), 3);
    assert_eq!(mocks.log("mkvpropedit").len(), 3);
    let CommitOutcome::Failed { attempts, cause } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(attempts, 3);
    assert_matches!(cause, Error::ToolFailed { ref message, .. } if message == "file is locked");

    let escalated = CommitOutcome::Failed { attempts, cause }.into_result(ExhaustedPolicy::Escalate);
    assert_matches!(escalated, Err(Error::ToolFailed { .. }));
}

#[test]
fn logged_exhaustion_is_swallowed() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    flaky_propedit(&mocks, 100);
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let file = services.media_file(&path);
    let mut ledger = full_ledger(&services, &path);
    let (outcome, _) = services.committer.commit(&file, &mut ledger);
    assert!(!outcome.is_success());
    assert!(outcome.into_result(ExhaustedPolicy::Log).is_ok());
}

#[test]
fn missing_tool_fails_without_retry() {
    let mocks = MockTools::new();
    mocks.mediainfo(SAMPLE_REPORT);
    // No mkvpropedit script.
    let media = tempfile::tempdir().unwrap();
    let path = media_file(media.path(), "movie.mkv", b"mkv");
    let services = Services::from_config(mocks.config()).unwrap();

    let file = services.media_file(&path);
    let mut ledger = full_ledger(&services, &path);
    let (outcome, _) = services.committer.commit(&file, &mut ledger);
    assert_matches!(
        outcome,
        CommitOutcome::Failed {
            attempts: 1,
            cause: Error::ToolNotFound { .. }
        }
    );
}
