//! Resolving a typed word against the abbreviation table.

use super::scanner::word_before;
use super::table::{AbbreviationTable, Expansion};

/// Outcome of looking a word up in the table.
///
/// Only [`Resolution::Match`] leads to a replacement; the other variants
/// exist so callers can log why nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Empty word or no key equal to it ignoring case.
    NoMatch,
    /// A case-sensitive key matched only when ignoring case.
    CaseMismatch { abbreviation: &'a str },
    /// The key matched but the entry is disabled or has no text.
    Inert {
        abbreviation: &'a str,
        expansion: &'a Expansion,
    },
    Match {
        abbreviation: &'a str,
        expansion: &'a Expansion,
    },
}

impl<'a> Resolution<'a> {
    /// The matched entry, if the match may edit the document.
    pub const fn actionable(self) -> Option<(&'a str, &'a Expansion)> {
        match self {
            Self::Match {
                abbreviation,
                expansion,
            } => Some((abbreviation, expansion)),
            _ => None,
        }
    }
}

/// A detected abbreviation: where the word starts and what replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationLocation {
    /// Offset of the first character of the typed word.
    pub start: usize,
    /// The word as typed.
    pub word: String,
    /// The table key it resolved to.
    pub abbreviation: String,
    pub expansion: Expansion,
}

/// Find the key `word` refers to, ignoring case.
///
/// A key with identical casing wins; otherwise the first key in table order
/// whose lowercase form equals the word's.
pub fn find_candidate<'a>(word: &str, table: &'a AbbreviationTable) -> Option<(&'a str, &'a Expansion)> {
    if word.is_empty() {
        return None;
    }
    if let Some(exact) = table.get_key_value(word) {
        return Some(exact);
    }
    let folded = word.to_lowercase();
    table.iter().find(|(key, _)| key.to_lowercase() == folded)
}

/// Apply the full matching policy to `word`.
pub fn resolve<'a>(word: &str, table: &'a AbbreviationTable) -> Resolution<'a> {
    let Some((abbreviation, expansion)) = find_candidate(word, table) else {
        return Resolution::NoMatch;
    };
    if expansion.is_case_sensitive && abbreviation != word {
        return Resolution::CaseMismatch { abbreviation };
    }
    if !expansion.is_actionable() {
        return Resolution::Inert {
            abbreviation,
            expansion,
        };
    }
    Resolution::Match {
        abbreviation,
        expansion,
    }
}

/// Detect an actionable abbreviation ending at `end` in `text`.
///
/// ```text
///                       v end
/// what are you doing atm|     -> detects "atm" at 19
/// what are you doing atm |    -> nothing
/// ```
pub fn detect(text: &str, end: usize, table: &AbbreviationTable) -> Option<AbbreviationLocation> {
    let (start, word) = word_before(text, end);
    let resolution = resolve(word, table);
    match resolution {
        Resolution::CaseMismatch { abbreviation } => {
            tracing::trace!(word, abbreviation, "case-sensitive abbreviation not matched");
        }
        Resolution::Inert { abbreviation, .. } => {
            tracing::trace!(word, abbreviation, "abbreviation is disabled or empty");
        }
        Resolution::NoMatch | Resolution::Match { .. } => {}
    }
    let (abbreviation, expansion) = resolution.actionable()?;
    Some(AbbreviationLocation {
        start,
        word: word.to_string(),
        abbreviation: abbreviation.to_string(),
        expansion: expansion.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, Expansion)]) -> AbbreviationTable {
        entries.iter().map(|(k, e)| (*k, e.clone())).collect()
    }

    #[test]
    fn test_case_insensitive_entry_matches_any_casing() {
        let t = table(&[("atm", Expansion::new("at the moment"))]);
        for word in ["atm", "ATM", "Atm"] {
            let (key, exp) = resolve(word, &t).actionable().unwrap();
            assert_eq!(key, "atm");
            assert_eq!(exp.expansion_text, "at the moment");
        }
    }

    #[test]
    fn test_case_sensitive_entry_rejects_other_casing() {
        let t = table(&[(
            "NASA",
            Expansion::new("National Aeronautics and Space Administration").case_sensitive(true),
        )]);
        assert_eq!(
            resolve("nasa", &t),
            Resolution::CaseMismatch {
                abbreviation: "NASA"
            }
        );
        assert!(resolve("NASA", &t).actionable().is_some());
    }

    #[test]
    fn test_disabled_entry_is_inert() {
        let t = table(&[("btw", Expansion::new("by the way").enabled(false))]);
        assert!(matches!(resolve("btw", &t), Resolution::Inert { .. }));
        assert!(detect("btw", 3, &t).is_none());
    }

    #[test]
    fn test_empty_expansion_is_inert() {
        let t = table(&[("zz", Expansion::new(""))]);
        assert!(matches!(resolve("zz", &t), Resolution::Inert { .. }));
    }

    #[test]
    fn test_empty_word_never_matches() {
        let t = table(&[("", Expansion::new("blank"))]);
        assert_eq!(resolve("", &t), Resolution::NoMatch);
    }

    #[test]
    fn test_unknown_word_is_no_match() {
        let t = table(&[("atm", Expansion::new("at the moment"))]);
        assert_eq!(resolve("atmosphere", &t), Resolution::NoMatch);
    }

    #[test]
    fn test_exact_case_key_wins_tie() {
        let t = table(&[
            ("rs", Expansion::new("right side")),
            ("RS", Expansion::new("Rust")),
        ]);
        assert_eq!(resolve("RS", &t).actionable().unwrap().0, "RS");
        assert_eq!(resolve("rs", &t).actionable().unwrap().0, "rs");
    }

    #[test]
    fn test_first_key_in_table_order_wins_without_exact_case() {
        let t = table(&[
            ("Rs", Expansion::new("first")),
            ("rS", Expansion::new("second")),
        ]);
        assert_eq!(resolve("RS", &t).actionable().unwrap().1.expansion_text, "first");
    }

    #[test]
    fn test_detect_reports_word_start() {
        let t = table(&[("atm", Expansion::new("at the moment"))]);
        let loc = detect("see you atm", 11, &t).unwrap();
        assert_eq!(loc.start, 8);
        assert_eq!(loc.word, "atm");
        assert_eq!(loc.abbreviation, "atm");
    }

    #[test]
    fn test_detect_at_document_start() {
        let t = table(&[("ily", Expansion::new("I love you"))]);
        let loc = detect("ILY", 3, &t).unwrap();
        assert_eq!(loc.start, 0);
        assert_eq!(loc.word, "ILY");
    }

    #[test]
    fn test_detect_after_whitespace_is_none() {
        let t = table(&[("atm", Expansion::new("at the moment"))]);
        assert!(detect("see you atm ", 12, &t).is_none());
    }

    #[test]
    fn test_position_does_not_affect_matching() {
        let t = table(&[
            ("Ab", Expansion::new("late").at_position(9)),
            ("aB", Expansion::new("early").at_position(0)),
        ]);
        assert_eq!(resolve("ab", &t).actionable().unwrap().1.expansion_text, "late");
    }
}
