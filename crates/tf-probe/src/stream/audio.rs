use super::{text, StreamView};
use crate::coerce;
use crate::parser::SectionKind;
use crate::section::SectionMap;

/// An audio track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    fields: SectionMap,
}

impl AudioStream {
    pub fn new(fields: SectionMap) -> Self {
        Self { fields }
    }

    /// Channel count. MediaInfo may only emit `"6 channels"`, so this
    /// takes the first digit run.
    pub fn channels(&self) -> Option<i64> {
        coerce::some_int(self.fields.get_or("Channel(s)", 0, ""))
    }

    /// Sampling rate in Hz.
    pub fn sampling_rate(&self) -> Option<i64> {
        coerce::some_int(self.fields.get_or("Sampling rate", 0, ""))
    }

    pub fn channel_layout(&self) -> Option<String> {
        text(&self.fields, "ChannelLayout", 0)
    }

    pub fn bit_rate_mode(&self) -> Option<String> {
        text(&self.fields, "Bit rate mode", 0)
    }

    pub fn compression_mode(&self) -> Option<String> {
        text(&self.fields, "Compression mode", 0)
    }

    /// Delay relative to video, in milliseconds.
    pub fn delay_ms(&self) -> Option<f64> {
        coerce::to_double(self.fields.get_or("Delay relative to video", 0, ""))
    }
}

impl StreamView for AudioStream {
    fn fields(&self) -> &SectionMap {
        &self.fields
    }

    fn kind(&self) -> SectionKind {
        SectionKind::Audio
    }
}
