//! Language tag coercion.
//!
//! MediaInfo reports a track language several ways (`de`, `German`,
//! `deu`). A small synonym table maps common natural-language names to
//! short tags before falling back to standard BCP 47 parsing.

use unic_langid::LanguageIdentifier;

/// Natural-language names (lowercase) and the tag they stand for.
const SYNONYMS: &[(&str, &str)] = &[
    ("english", "en"),
    ("englisch", "en"),
    ("german", "de"),
    ("deutsch", "de"),
    ("french", "fr"),
    ("français", "fr"),
    ("francais", "fr"),
    ("französisch", "fr"),
    ("spanish", "es"),
    ("español", "es"),
    ("spanisch", "es"),
    ("italian", "it"),
    ("italienisch", "it"),
    ("japanese", "ja"),
    ("japanisch", "ja"),
];

/// Coerce free text to a language tag.
///
/// Returns `None` for empty input, `und`, and anything the tag parser
/// rejects.
pub fn to_language(s: &str) -> Option<LanguageIdentifier> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let tag = SYNONYMS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map_or(trimmed, |(_, tag)| *tag);

    match tag.parse::<LanguageIdentifier>() {
        Ok(id) => {
            // 5-8 letter subtags are syntactically valid but are really
            // unlisted language names such as "Russian".
            let language = id.language.to_string();
            (language != "und" && language.len() <= 3).then_some(id)
        }
        Err(e) => {
            tracing::trace!("unparseable language {:?}: {}", trimmed, e);
            None
        }
    }
}
