use super::{text, StreamView};
use crate::coerce;
use crate::parser::SectionKind;
use crate::section::SectionMap;

/// Container-level information (the `General` section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralStream {
    fields: SectionMap,
}

impl GeneralStream {
    pub fn new(fields: SectionMap) -> Self {
        Self { fields }
    }

    /// File size in bytes.
    pub fn file_size(&self) -> Option<i64> {
        coerce::to_long(self.fields.get_or("File size", 0, ""))
    }

    /// Overall bit rate in bits per second.
    pub fn overall_bit_rate(&self) -> Option<i64> {
        coerce::to_long(self.fields.get_or("Overall bit rate", 0, ""))
    }

    /// Container title. Matroska files report it as `Title`, other
    /// containers as `Movie name`.
    pub fn movie_title(&self) -> Option<String> {
        text(&self.fields, "Title", 0).or_else(|| text(&self.fields, "Movie name", 0))
    }

    pub fn encoded_date(&self) -> Option<String> {
        text(&self.fields, "Encoded date", 0)
    }

    pub fn writing_application(&self) -> Option<String> {
        text(&self.fields, "Writing application", 0)
    }

    pub fn writing_library(&self) -> Option<String> {
        text(&self.fields, "Writing library", 0)
    }

    pub fn video_count(&self) -> i32 {
        coerce::to_int(self.fields.get_or("VideoCount", 0, "0")).unwrap_or(0)
    }

    pub fn audio_count(&self) -> i32 {
        coerce::to_int(self.fields.get_or("AudioCount", 0, "0")).unwrap_or(0)
    }

    pub fn text_count(&self) -> i32 {
        coerce::to_int(self.fields.get_or("TextCount", 0, "0")).unwrap_or(0)
    }

    /// Whether the container is Matroska, i.e. editable in place.
    pub fn is_matroska(&self) -> bool {
        self.fields
            .get_or("Format", 0, "")
            .eq_ignore_ascii_case("matroska")
    }
}

impl StreamView for GeneralStream {
    fn fields(&self) -> &SectionMap {
        &self.fields
    }

    fn kind(&self) -> SectionKind {
        SectionKind::General
    }
}
