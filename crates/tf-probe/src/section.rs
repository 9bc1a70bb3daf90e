//! Case-insensitive, multi-valued key/value store for one probe section.

use std::collections::HashMap;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Key/value pairs of one section, in emission order.
///
/// MediaInfo repeats a field once per textual representation (a duration
/// as milliseconds, then as "1 h 30 min", ...), so a key maps to an ordered
/// list of values addressed by occurrence index. Keys compare
/// case-insensitively. A map is built once by the parser and is read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, Vec<usize>>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value. Existing values for the same key are kept.
    pub(crate) fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let slot = self.entries.len();
        self.index.entry(normalize(&key)).or_default().push(slot);
        self.entries.push((key, value.into()));
    }

    /// The `index`-th occurrence of `key`, or `None` if there are fewer.
    pub fn get(&self, key: &str, index: usize) -> Option<&str> {
        let slot = *self.index.get(&normalize(key))?.get(index)?;
        Some(self.entries[slot].1.as_str())
    }

    /// The `index`-th occurrence of `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, index: usize, default: &'a str) -> &'a str {
        self.get(key, index).unwrap_or(default)
    }

    /// All values recorded for `key`, in emission order.
    pub fn values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        let slots = self.index.get(&normalize(key)).map(Vec::as_slice).unwrap_or(&[]);
        slots.iter().map(move |&slot| self.entries[slot].1.as_str())
    }

    /// Number of occurrences of `key`.
    pub fn count(&self, key: &str) -> usize {
        self.index.get(&normalize(key)).map_or(0, Vec::len)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&normalize(key))
    }

    /// Every entry with its original key spelling, in emission order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Total number of entries, counting repeated keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            seq.serialize_element(&[key, value])?;
        }
        seq.end()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}
