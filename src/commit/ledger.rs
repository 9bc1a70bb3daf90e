//! Pending property edits awaiting a commit.

use std::collections::BTreeMap;
use std::fmt;

use tf_av::{PropertyEdit, TrackKind};
use tf_probe::{LanguageIdentifier, StereoMode, StreamSet, StreamView};

/// A logical, editable property of a file.
///
/// The derived ordering is the commit order: container title, video
/// display name, stereoscopic mode, then audio languages by track, then
/// audio default flags by track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PendingField {
    Title,
    /// Name of the first video track.
    DisplayName,
    /// Stereoscopic mode of the first video track.
    StereoMode,
    /// Language of the n-th (0-based) audio track.
    Language(usize),
    /// Default flag of the n-th (0-based) audio track.
    Default(usize),
}

impl PendingField {
    /// Whether `value` is of the type this field holds.
    pub fn accepts(&self, value: &PendingValue) -> bool {
        matches!(
            (self, value),
            (PendingField::Title | PendingField::DisplayName, PendingValue::Text(_))
                | (PendingField::StereoMode, PendingValue::StereoMode(_))
                | (PendingField::Language(_), PendingValue::Language(_))
                | (PendingField::Default(_), PendingValue::Flag(_))
        )
    }

    /// The committed value of this field as currently probed.
    pub fn current(&self, streams: &StreamSet) -> PendingValue {
        match *self {
            PendingField::Title => {
                PendingValue::Text(streams.general().and_then(|g| g.movie_title()))
            }
            PendingField::DisplayName => {
                PendingValue::Text(streams.video(0).and_then(|v| v.title()).filter(|t| !t.is_empty()))
            }
            PendingField::StereoMode => {
                PendingValue::StereoMode(streams.video(0).and_then(|v| v.stereo_mode()))
            }
            PendingField::Language(i) => {
                PendingValue::Language(streams.audio(i).and_then(|a| a.language()))
            }
            PendingField::Default(i) => {
                PendingValue::Flag(streams.audio(i).map(|a| a.is_default()))
            }
        }
    }

    /// The property edit that writes `value` to this field.
    ///
    /// Returns `None` if `value` is of the wrong type.
    pub fn edit(&self, value: &PendingValue) -> Option<PropertyEdit> {
        let edit = match (*self, value) {
            (PendingField::Title, PendingValue::Text(v)) => PropertyEdit::Title(v.clone()),
            (PendingField::DisplayName, PendingValue::Text(v)) => PropertyEdit::TrackName {
                kind: TrackKind::Video,
                index: 0,
                value: v.clone(),
            },
            (PendingField::StereoMode, PendingValue::StereoMode(v)) => {
                PropertyEdit::StereoMode { index: 0, value: *v }
            }
            (PendingField::Language(index), PendingValue::Language(v)) => PropertyEdit::Language {
                kind: TrackKind::Audio,
                index,
                value: v.clone(),
            },
            (PendingField::Default(index), PendingValue::Flag(v)) => PropertyEdit::DefaultFlag {
                kind: TrackKind::Audio,
                index,
                value: *v,
            },
            _ => return None,
        };
        Some(edit)
    }
}

impl fmt::Display for PendingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingField::Title => f.write_str("title"),
            PendingField::DisplayName => f.write_str("display name"),
            PendingField::StereoMode => f.write_str("stereo mode"),
            PendingField::Language(i) => write!(f, "audio {i} language"),
            PendingField::Default(i) => write!(f, "audio {i} default"),
        }
    }
}

/// A proposed value. `None` inside any variant clears the property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingValue {
    Text(Option<String>),
    StereoMode(Option<StereoMode>),
    Language(Option<LanguageIdentifier>),
    Flag(Option<bool>),
}

/// Field → proposed value, holding only values that differ from what is
/// committed on disk. An empty ledger means there is nothing to commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLedger {
    pending: BTreeMap<PendingField, PendingValue>,
}

impl EditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `new` for `field` if it differs from `committed`; otherwise
    /// drop any stale proposal for the field. Returns whether the field is
    /// now pending.
    pub fn propose(&mut self, field: PendingField, new: PendingValue, committed: PendingValue) -> bool {
        if !field.accepts(&new) {
            tracing::warn!("ignoring {:?} proposed for {}", new, field);
            return false;
        }
        if new == committed {
            self.pending.remove(&field);
            false
        } else {
            self.pending.insert(field, new);
            true
        }
    }

    /// [`EditLedger::propose`] against the committed value in `streams`.
    pub fn propose_against(&mut self, field: PendingField, new: PendingValue, streams: &StreamSet) -> bool {
        let committed = field.current(streams);
        self.propose(field, new, committed)
    }

    pub fn get(&self, field: PendingField) -> Option<&PendingValue> {
        self.pending.get(&field)
    }

    pub fn remove(&mut self, field: PendingField) -> Option<PendingValue> {
        self.pending.remove(&field)
    }

    /// Discard every pending edit.
    pub fn revert(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending fields in commit order.
    pub fn iter(&self) -> impl Iterator<Item = (&PendingField, &PendingValue)> {
        self.pending.iter()
    }

    /// Property edits in commit order.
    pub fn edits(&self) -> Vec<PropertyEdit> {
        self.pending
            .iter()
            .filter_map(|(field, value)| field.edit(value))
            .collect()
    }
}
