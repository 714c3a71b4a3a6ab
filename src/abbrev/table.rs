//! The abbreviation table and its entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What an abbreviation expands to, plus its matching flags.
///
/// Serialized in the same shape as the persisted settings file:
/// `{ "value": ..., "isEnabled": ..., "isCaseSensitive": ..., "position": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expansion {
    /// Text inserted in place of the abbreviation.
    #[serde(rename = "value")]
    pub expansion_text: String,
    pub is_enabled: bool,
    /// When set, the typed word must match the key's casing exactly.
    #[serde(default)]
    pub is_case_sensitive: bool,
    /// Display order. Never consulted when matching.
    #[serde(default)]
    pub position: u32,
}

impl Expansion {
    /// An enabled, case-insensitive expansion at position 0.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            expansion_text: text.into(),
            is_enabled: true,
            is_case_sensitive: false,
            position: 0,
        }
    }

    #[must_use]
    pub const fn case_sensitive(mut self, yes: bool) -> Self {
        self.is_case_sensitive = yes;
        self
    }

    #[must_use]
    pub const fn enabled(mut self, yes: bool) -> Self {
        self.is_enabled = yes;
        self
    }

    #[must_use]
    pub const fn at_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    /// Whether a match on this entry may touch the document.
    ///
    /// An empty expansion is treated as disabled.
    pub fn is_actionable(&self) -> bool {
        self.is_enabled && !self.expansion_text.is_empty()
    }
}

/// Ordered mapping from abbreviation to [`Expansion`].
///
/// Iteration follows insertion order, which is also the order used to break
/// ties between keys that differ only by case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationTable {
    entries: IndexMap<String, Expansion>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, abbreviation: &str) -> Option<&Expansion> {
        self.entries.get(abbreviation)
    }

    pub fn get_key_value(&self, abbreviation: &str) -> Option<(&str, &Expansion)> {
        self.entries
            .get_key_value(abbreviation)
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.entries.contains_key(abbreviation)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expansion)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by display position (stable for equal positions).
    pub fn by_position(&self) -> Vec<(&str, &Expansion)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by_key(|(_, expansion)| expansion.position);
        sorted
    }

    /// Append or overwrite an entry.
    pub fn insert(&mut self, abbreviation: impl Into<String>, expansion: Expansion) {
        self.entries.insert(abbreviation.into(), expansion);
    }

    /// Mutable access for the configuration layer.
    pub(crate) const fn entries_mut(&mut self) -> &mut IndexMap<String, Expansion> {
        &mut self.entries
    }
}

impl FromIterator<(String, Expansion)> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = (String, Expansion)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, Expansion)> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, Expansion)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// The table shipped with a fresh install.
pub fn default_abbreviations() -> AbbreviationTable {
    [
        ("eg.", "for example"),
        ("atm", "at the moment"),
        ("imo", "in my opinion"),
        ("w/", "with"),
        ("w/o", "without"),
        ("ily", "I love you"),
        ("btw", "by the way"),
        ("afaik", "as far as I know"),
        ("rn", "right now"),
    ]
    .into_iter()
    .zip(0u32..)
    .map(|((key, text), position)| (key, Expansion::new(text).at_position(position)))
    .collect()
}
