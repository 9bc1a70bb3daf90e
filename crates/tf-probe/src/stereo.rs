//! Stereoscopic (3D) layout of a video track.

use std::fmt;

use serde::Serialize;

/// Matroska `StereoMode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StereoMode {
    Mono,
    SideBySideLeftFirst,
    TopBottomRightFirst,
    TopBottomLeftFirst,
    CheckerboardRightFirst,
    CheckerboardLeftFirst,
    RowInterleavedRightFirst,
    RowInterleavedLeftFirst,
    ColumnInterleavedRightFirst,
    ColumnInterleavedLeftFirst,
    AnaglyphCyanRed,
    SideBySideRightFirst,
    AnaglyphGreenMagenta,
    BothEyesLacedLeftFirst,
    BothEyesLacedRightFirst,
}

const ALL: [StereoMode; 15] = [
    StereoMode::Mono,
    StereoMode::SideBySideLeftFirst,
    StereoMode::TopBottomRightFirst,
    StereoMode::TopBottomLeftFirst,
    StereoMode::CheckerboardRightFirst,
    StereoMode::CheckerboardLeftFirst,
    StereoMode::RowInterleavedRightFirst,
    StereoMode::RowInterleavedLeftFirst,
    StereoMode::ColumnInterleavedRightFirst,
    StereoMode::ColumnInterleavedLeftFirst,
    StereoMode::AnaglyphCyanRed,
    StereoMode::SideBySideRightFirst,
    StereoMode::AnaglyphGreenMagenta,
    StereoMode::BothEyesLacedLeftFirst,
    StereoMode::BothEyesLacedRightFirst,
];

impl StereoMode {
    /// The integer written to the container's `stereo-mode` property.
    pub fn matroska_value(self) -> u8 {
        ALL.iter().position(|m| *m == self).unwrap_or(0) as u8
    }

    /// Inverse of [`StereoMode::matroska_value`].
    pub fn from_matroska_value(value: u8) -> Option<Self> {
        ALL.get(usize::from(value)).copied()
    }

    /// Map MediaInfo's `MultiView_Layout` text, e.g.
    /// `"Side by Side (left eye first)"`.
    pub fn from_layout(layout: &str) -> Option<Self> {
        let s = layout.to_lowercase();
        let right_first = s.contains("right eye first");

        let mode = if s.contains("side by side") {
            if right_first {
                StereoMode::SideBySideRightFirst
            } else {
                StereoMode::SideBySideLeftFirst
            }
        } else if s.contains("top-bottom") || s.contains("top-and-bottom") {
            if right_first {
                StereoMode::TopBottomRightFirst
            } else {
                StereoMode::TopBottomLeftFirst
            }
        } else if s.contains("checkerboard") {
            if right_first {
                StereoMode::CheckerboardRightFirst
            } else {
                StereoMode::CheckerboardLeftFirst
            }
        } else if s.contains("row interleaved") {
            if right_first {
                StereoMode::RowInterleavedRightFirst
            } else {
                StereoMode::RowInterleavedLeftFirst
            }
        } else if s.contains("column interleaved") {
            if right_first {
                StereoMode::ColumnInterleavedRightFirst
            } else {
                StereoMode::ColumnInterleavedLeftFirst
            }
        } else if s.contains("cyan/red") {
            StereoMode::AnaglyphCyanRed
        } else if s.contains("green/magenta") {
            StereoMode::AnaglyphGreenMagenta
        } else if s.contains("laced") {
            if right_first {
                StereoMode::BothEyesLacedRightFirst
            } else {
                StereoMode::BothEyesLacedLeftFirst
            }
        } else if s.contains("mono") {
            StereoMode::Mono
        } else {
            return None;
        };

        Some(mode)
    }
}

impl fmt::Display for StereoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matroska_value())
    }
}
