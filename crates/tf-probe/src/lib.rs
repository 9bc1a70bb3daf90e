//! # tf-probe
//!
//! Parsing of MediaInfo's full-verbosity (`mediainfo -f`) text report into
//! typed, queryable stream views.
//!
//! The report has no schema: sections of `key : value` lines where one
//! logical field may appear several times in different textual forms. This
//! crate keeps every occurrence ([`SectionMap`]), groups them per section
//! ([`parse_sections`]) and exposes total, side-effect-free accessors on
//! top ([`GeneralStream`], [`VideoStream`], [`AudioStream`]).
//!
//! ## Quick start
//!
//! ```
//! use tf_probe::{StreamSet, StreamView};
//!
//! let report = "General\nFormat : Matroska\n\nAudio\nChannel(s) : 6 channels\n";
//! let streams = StreamSet::parse(report);
//! assert_eq!(streams.audio(0).and_then(|a| a.channels()), Some(6));
//! assert_eq!(streams.general().and_then(|g| g.format()).as_deref(), Some("Matroska"));
//! ```
//!
//! Nothing here spawns processes or touches the filesystem, so parsing is
//! safe to run on any thread.

pub mod coerce;
pub mod language;
pub mod parser;
pub mod section;
pub mod stereo;
pub mod stream;

pub use parser::{parse_lines, parse_sections, Section, SectionKind};
pub use section::SectionMap;
pub use stereo::StereoMode;
pub use stream::{
    AudioStream, GeneralStream, Stream, StreamSet, StreamSummary, StreamView, VideoStream,
};
pub use unic_langid::LanguageIdentifier;
