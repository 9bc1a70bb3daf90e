//! Typed, read-only views over parsed probe sections.
//!
//! Every accessor fetches one raw value by `(key, occurrence)` and applies
//! exactly one coercion from [`crate::coerce`]. Nothing is cached; a view
//! is a thin projection over the [`SectionMap`] it owns.

mod audio;
mod general;
mod video;

pub use audio::AudioStream;
pub use general::GeneralStream;
pub use video::VideoStream;

use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::coerce;
use crate::language;
use crate::parser::{Section, SectionKind};
use crate::section::SectionMap;

/// Accessors shared by every stream kind.
pub trait StreamView {
    /// The underlying fields.
    fn fields(&self) -> &SectionMap;

    /// Kind of section this view was built from.
    fn kind(&self) -> SectionKind;

    /// Raw text of the `index`-th occurrence of `key`.
    fn raw(&self, key: &str, index: usize) -> Option<&str> {
        self.fields().get(key, index)
    }

    /// Track ID as written by the muxer (1-based for Matroska).
    fn id(&self) -> Option<i64> {
        coerce::some_int(self.fields().get_or("ID", 0, ""))
    }

    /// Zero-based position of the stream inside the container.
    fn stream_order(&self) -> Option<i32> {
        coerce::to_int(self.fields().get_or("StreamOrder", 0, ""))
    }

    fn format(&self) -> Option<String> {
        text(self.fields(), "Format", 0)
    }

    fn format_info(&self) -> Option<String> {
        text(self.fields(), "Format/Info", 0)
    }

    fn format_profile(&self) -> Option<String> {
        text(self.fields(), "Format profile", 0)
    }

    fn commercial_name(&self) -> Option<String> {
        text(self.fields(), "Commercial name", 0)
    }

    fn codec_id(&self) -> Option<String> {
        text(self.fields(), "Codec ID", 0)
    }

    /// Track or container title. Present-but-empty is reported as `Some("")`.
    fn title(&self) -> Option<String> {
        self.raw("Title", 0).map(str::to_string)
    }

    /// Language tag of the track.
    fn language(&self) -> Option<LanguageIdentifier> {
        language::to_language(self.fields().get_or("Language", 0, ""))
    }

    /// Human-readable language name (second `Language` occurrence).
    fn language_name(&self) -> Option<String> {
        text(self.fields(), "Language", 1)
    }

    fn is_default(&self) -> bool {
        coerce::to_bool(self.fields().get_or("Default", 0, "No"))
    }

    fn is_forced(&self) -> bool {
        coerce::to_bool(self.fields().get_or("Forced", 0, "No"))
    }

    /// Duration in milliseconds (first, numeric occurrence).
    fn duration_ms(&self) -> Option<f64> {
        coerce::to_double(self.fields().get_or("Duration", 0, ""))
    }

    /// Bit rate in bits per second.
    fn bit_rate(&self) -> Option<i64> {
        coerce::to_long(self.fields().get_or("Bit rate", 0, ""))
    }

    /// Stream size in bytes.
    fn stream_size(&self) -> Option<i64> {
        coerce::to_long(self.fields().get_or("Stream size", 0, ""))
    }
}

/// Non-empty text at `(key, index)`.
fn text(fields: &SectionMap, key: &str, index: usize) -> Option<String> {
    fields
        .get(key, index)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A typed view of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    General(GeneralStream),
    Video(VideoStream),
    Audio(AudioStream),
}

impl Stream {
    /// Build a typed view, or `None` for kinds without one.
    pub fn from_section(section: Section) -> Option<Self> {
        match section.kind {
            SectionKind::General => Some(Stream::General(GeneralStream::new(section.fields))),
            SectionKind::Video => Some(Stream::Video(VideoStream::new(section.fields))),
            SectionKind::Audio => Some(Stream::Audio(AudioStream::new(section.fields))),
            SectionKind::Other(ref name) => {
                tracing::trace!("no typed view for section kind {:?}", name);
                None
            }
        }
    }

    /// The shared accessors of whichever variant this is.
    pub fn view(&self) -> &dyn StreamView {
        match self {
            Stream::General(s) => s,
            Stream::Video(s) => s,
            Stream::Audio(s) => s,
        }
    }
}

/// All typed streams of one file, in probe emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSet {
    streams: Vec<Stream>,
}

impl StreamSet {
    /// Build views from parsed sections, skipping unrecognised kinds.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self {
            streams: sections.into_iter().filter_map(Stream::from_section).collect(),
        }
    }

    /// Parse a full probe report and build views in one step.
    pub fn parse(text: &str) -> Self {
        Self::from_sections(crate::parser::parse_sections(text))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// The General stream, if the report had one.
    pub fn general(&self) -> Option<&GeneralStream> {
        self.streams.iter().find_map(|s| match s {
            Stream::General(g) => Some(g),
            _ => None,
        })
    }

    pub fn videos(&self) -> impl Iterator<Item = &VideoStream> {
        self.streams.iter().filter_map(|s| match s {
            Stream::Video(v) => Some(v),
            _ => None,
        })
    }

    pub fn audios(&self) -> impl Iterator<Item = &AudioStream> {
        self.streams.iter().filter_map(|s| match s {
            Stream::Audio(a) => Some(a),
            _ => None,
        })
    }

    /// The `index`-th video stream (0-based).
    pub fn video(&self, index: usize) -> Option<&VideoStream> {
        self.videos().nth(index)
    }

    /// The `index`-th audio stream (0-based).
    pub fn audio(&self, index: usize) -> Option<&AudioStream> {
        self.audios().nth(index)
    }

    /// Serializable typed summary of every stream.
    pub fn summary(&self) -> Vec<StreamSummary> {
        self.streams.iter().map(StreamSummary::from).collect()
    }
}

/// Flattened, serializable snapshot of the most useful accessors.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSummary {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub default: bool,
    pub forced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereo_mode: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
}

impl From<&Stream> for StreamSummary {
    fn from(stream: &Stream) -> Self {
        let view = stream.view();
        let mut summary = StreamSummary {
            kind: view.kind().to_string(),
            id: view.id(),
            format: view.format(),
            title: view.title().filter(|t| !t.is_empty()),
            language: view.language().map(|l| l.to_string()),
            default: view.is_default(),
            forced: view.is_forced(),
            duration_ms: view.duration_ms(),
            width: None,
            height: None,
            frame_rate: None,
            stereo_mode: None,
            channels: None,
            sampling_rate: None,
            file_size: None,
        };

        match stream {
            Stream::General(g) => {
                summary.title = g.movie_title();
                summary.file_size = g.file_size();
            }
            Stream::Video(v) => {
                summary.width = v.width();
                summary.height = v.height();
                summary.frame_rate = v.frame_rate();
                summary.stereo_mode = v.stereo_mode().map(|m| m.matroska_value());
            }
            Stream::Audio(a) => {
                summary.channels = a.channels();
                summary.sampling_rate = a.sampling_rate();
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn fields(pairs: &[(&str, &str)]) -> SectionMap {
        let mut map = SectionMap::new();
        for (k, v) in pairs {
            map.push(*k, *v);
        }
        map
    }

    const REPORT: &str = "General\n\
        Format : Matroska\n\
        Duration : 5400123\n\
        \n\
        Video\n\
        ID : 1\n\
        Width : 1920\n\
        \n\
        Audio\n\
        ID : 2\n\
        Channel(s) : 2\n\
        \n\
        Text\n\
        ID : 3\n\
        \n\
        Menu\n\
        00:00:00.000 : Chapter 1\n";

    #[test]
    fn one_view_per_known_kind_in_order() {
        let set = StreamSet::parse(REPORT);
        assert_eq!(set.len(), 3);
        let kinds: Vec<SectionKind> = set.iter().map(|s| s.view().kind()).collect();
        assert_eq!(kinds, [SectionKind::General, SectionKind::Video, SectionKind::Audio]);
        assert!(set.general().is_some());
        assert_eq!(set.videos().count(), 1);
        assert_eq!(set.audios().count(), 1);
    }

    #[test]
    fn indexed_track_lookup() {
        let set = StreamSet::parse(REPORT);
        assert_eq!(set.video(0).and_then(|v| v.id()), Some(1));
        assert_eq!(set.audio(0).and_then(|a| a.id()), Some(2));
        assert!(set.audio(1).is_none());
    }

    #[test]
    fn base_accessors_are_total() {
        let empty = GeneralStream::new(SectionMap::new());
        assert_eq!(empty.id(), None);
        assert_eq!(empty.format(), None);
        assert_eq!(empty.title(), None);
        assert_eq!(empty.language(), None);
        assert!(!empty.is_default());
        assert!(!empty.is_forced());
        assert_eq!(empty.duration_ms(), None);
        assert_eq!(empty.bit_rate(), None);
    }

    #[test]
    fn malformed_values_degrade() {
        let view = AudioStream::new(fields(&[
            ("ID", "abc"),
            ("Duration", "a while"),
            ("Bit rate", "lots"),
            ("Default", "maybe"),
            ("Language", "@@"),
        ]));
        assert_eq!(view.id(), None);
        assert_eq!(view.duration_ms(), None);
        assert_eq!(view.bit_rate(), None);
        assert!(!view.is_default());
        assert_eq!(view.language(), None);
    }

    #[test]
    fn language_and_name() {
        let view = AudioStream::new(fields(&[("Language", "de"), ("Language", "German")]));
        assert_eq!(view.language().map(|l| l.to_string()), Some("de".to_string()));
        assert_eq!(view.language_name(), Some("German".to_string()));
    }

    #[test]
    fn summary_serializes_typed_fields() {
        let set = StreamSet::parse(REPORT);
        let json = serde_json::to_value(set.summary()).unwrap();
        assert_eq!(json[0]["kind"], "General");
        assert_eq!(json[1]["width"], 1920);
        assert_eq!(json[2]["channels"], 2);
        assert!(json[2].get("width").is_none());
    }
}
