use super::{text, StreamView};
use crate::coerce;
use crate::parser::SectionKind;
use crate::section::SectionMap;
use crate::stereo::StereoMode;

/// A video track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStream {
    fields: SectionMap,
}

impl VideoStream {
    pub fn new(fields: SectionMap) -> Self {
        Self { fields }
    }

    /// Width in pixels.
    pub fn width(&self) -> Option<i64> {
        coerce::some_int(self.fields.get_or("Width", 0, ""))
    }

    /// Height in pixels.
    pub fn height(&self) -> Option<i64> {
        coerce::some_int(self.fields.get_or("Height", 0, ""))
    }

    pub fn frame_rate(&self) -> Option<f64> {
        coerce::to_double(self.fields.get_or("Frame rate", 0, ""))
    }

    pub fn bit_depth(&self) -> Option<i32> {
        coerce::to_int(self.fields.get_or("Bit depth", 0, ""))
    }

    pub fn display_aspect_ratio(&self) -> Option<f64> {
        coerce::to_double(self.fields.get_or("Display aspect ratio", 0, ""))
    }

    pub fn scan_type(&self) -> Option<String> {
        text(&self.fields, "Scan type", 0)
    }

    pub fn hdr_format(&self) -> Option<String> {
        text(&self.fields, "HDR format", 0)
    }

    pub fn color_primaries(&self) -> Option<String> {
        text(&self.fields, "Color primaries", 0)
    }

    /// Number of views (2 for stereoscopic content).
    pub fn multiview_count(&self) -> i64 {
        coerce::some_int(self.fields.get_or("MultiView_Count", 0, "1")).unwrap_or(1)
    }

    pub fn is_stereoscopic(&self) -> bool {
        self.multiview_count() > 1 || self.stereo_mode().is_some_and(|m| m != StereoMode::Mono)
    }

    /// Stereoscopic layout from `MultiView_Layout`.
    pub fn stereo_mode(&self) -> Option<StereoMode> {
        StereoMode::from_layout(self.fields.get_or("MultiView_Layout", 0, ""))
    }
}

impl StreamView for VideoStream {
    fn fields(&self) -> &SectionMap {
        &self.fields
    }

    fn kind(&self) -> SectionKind {
        SectionKind::Video
    }
}
