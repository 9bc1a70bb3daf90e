//! Shared test harness for integration tests.
//!
//! Provides [`MockTools`], a temp directory of small `/bin/sh` scripts that
//! stand in for mediainfo, mkvmerge and mkvpropedit, plus a [`Config`]
//! pointing at them.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trackforge::config::Config;
use tf_core::Tool;

/// MediaInfo `-f` report for a Matroska file with one video and two audio
/// tracks, plus a menu section without a typed view.
pub const SAMPLE_REPORT: &str = "General
Count                                    : 331
Complete name                            : movie.mkv
Format                                   : Matroska
File size                                : 1268098203
File size                                : 1.18 GiB
Duration                                 : 5400123.000
Duration                                 : 1 h 30 min
Movie name                               : Big Buck Bunny
VideoCount                               : 1
AudioCount                               : 2

Video
ID                                       : 1
Format                                   : AVC
Width                                    : 1920
Width                                    : 1 920 pixels
Height                                   : 1080
Height                                   : 1 080 pixels
Frame rate                               : 23.976
Title                                    : Main
Default                                  : Yes

Audio #1
ID                                       : 2
Format                                   : AC-3
Channel(s)                               : 6
Channel(s)                               : 6 channels
Sampling rate                            : 48000
Sampling rate                            : 48.0 kHz
Language                                 : en
Language                                 : English
Default                                  : Yes

Audio #2
ID                                       : 3
Format                                   : AAC
Channel(s)                               : 2 channels
Language                                 : German
Default                                  : No

Menu
00:00:00.000                             : en:Chapter 1
";

/// A directory of mock tool scripts.
pub struct MockTools {
    pub dir: TempDir,
}

impl MockTools {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write an executable `/bin/sh` script named `name`.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Mock mediainfo printing `report`. Every invocation appends its
    /// arguments to `mediainfo.log`.
    pub fn mediainfo(&self, report: &str) -> PathBuf {
        let report_path = self.path("report.txt");
        fs::write(&report_path, report).unwrap();
        self.script(
            "mediainfo",
            &format!(
                "printf '%s\\n' \"$@\" >> '{log}'\n[ \"$1\" = \"-f\" ] || exit 3\ncat '{report}'",
                log = self.path("mediainfo.log").display(),
                report = report_path.display(),
            ),
        )
    }

    /// Mock mkvmerge running `body` after logging its arguments to
    /// `mkvmerge.log`. In `body`, `$2` is the output path and `$3` the source.
    pub fn mkvmerge(&self, body: &str) -> PathBuf {
        self.script(
            "mkvmerge",
            &format!(
                "printf '%s\\n' \"$@\" > '{log}'\n{body}",
                log = self.path("mkvmerge.log").display(),
            ),
        )
    }

    /// Mock mkvpropedit running `body` after appending its arguments, one
    /// invocation per line, to `mkvpropedit.log`.
    pub fn mkvpropedit(&self, body: &str) -> PathBuf {
        self.script(
            "mkvpropedit",
            &format!(
                "echo \"$*\" >> '{log}'\n{body}",
                log = self.path("mkvpropedit.log").display(),
            ),
        )
    }

    /// Lines of a log written by one of the mocks; empty if never run.
    pub fn log(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.path(&format!("{name}.log")))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// A config pointing every configured tool at its mock.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        for (tool, name) in [
            (Tool::MediaInfo, "mediainfo"),
            (Tool::Mkvmerge, "mkvmerge"),
            (Tool::Mkvpropedit, "mkvpropedit"),
        ] {
            config.tools = config.tools.with_path(tool, self.path(name));
        }
        config
    }
}

/// Create a dummy media file with `contents`.
pub fn media_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Names of files in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
