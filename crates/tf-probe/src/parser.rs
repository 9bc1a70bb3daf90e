//! Parser for MediaInfo's full-verbosity text report.
//!
//! The report is a sequence of sections. A section starts with a header
//! line that contains no colon (`General`, `Video`, `Audio #2`, `Menu`);
//! the token up to the first space names its kind. Every following
//! `key : value` line belongs to that section until the next header or
//! blank line.

use std::fmt;

use serde::Serialize;

use crate::section::SectionMap;

/// Kind of a probe section, taken from the header's leading token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SectionKind {
    General,
    Video,
    Audio,
    /// Any section kind without a typed view (`Text`, `Menu`, ...).
    Other(String),
}

impl SectionKind {
    /// Classify a header line such as `"Audio #2"`.
    pub fn from_header(header: &str) -> Self {
        let token = header.trim().split(' ').next().unwrap_or_default();
        match token {
            "General" => SectionKind::General,
            "Video" => SectionKind::Video,
            "Audio" => SectionKind::Audio,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::General => f.write_str("General"),
            SectionKind::Video => f.write_str("Video"),
            SectionKind::Audio => f.write_str("Audio"),
            SectionKind::Other(name) => f.write_str(name),
        }
    }
}

/// One parsed section: its header and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// The full header line, e.g. `"Audio #2"`.
    pub header: String,
    pub fields: SectionMap,
}

/// Split a probe report into sections, in emission order.
///
/// Never fails. A blank line closes the current section; `key : value`
/// lines that follow it, or that appear before the first header, have no
/// section to belong to and are dropped.
pub fn parse_sections(text: &str) -> Vec<Section> {
    parse_lines(text.lines())
}

/// Same as [`parse_sections`] for pre-split lines.
pub fn parse_lines<'a, I>(lines: I) -> Vec<Section>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections: Vec<Section> = Vec::new();
    let mut open = false;

    for line in lines {
        if line.trim().is_empty() {
            open = false;
            continue;
        }

        match line.split_once(':') {
            None => {
                let header = line.trim().to_string();
                sections.push(Section {
                    kind: SectionKind::from_header(&header),
                    header,
                    fields: SectionMap::new(),
                });
                open = true;
            }
            Some((key, value)) => match sections.last_mut().filter(|_| open) {
                Some(section) => section.fields.push(key.trim_end(), value.trim_start()),
                None => tracing::trace!("dropping field outside any section: {}", line),
            },
        }
    }

    sections
}
