//! Identifier helpers for catalog entities
//!
//! Subjects and topics are keyed by a slug derived from their name, questions
//! and flashcards by a numeric id that is unique within their subject.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

fn dash_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-+").expect("valid regex"))
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

/// Derive a deterministic slug id from a display name.
///
/// `"Entrées / Sorties"` becomes `"entrees-sorties"`. The result may be empty
/// when the name has no alphanumeric characters; callers treat that as invalid.
pub fn slugify(name: &str) -> String {
    let replaced: String = name
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();

    dash_runs()
        .replace_all(&replaced, "-")
        .trim_matches('-')
        .to_string()
}

/// Pick an id for a new question or flashcard.
///
/// Uses the current time in milliseconds, bumped past the largest id already
/// in use so two items created in the same millisecond never collide. When
/// the largest id is `u64::MAX` the smallest unused id is taken instead.
pub fn next_item_id(existing: impl IntoIterator<Item = u64>) -> u64 {
    let used: BTreeSet<u64> = existing.into_iter().collect();
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    match used.last() {
        Some(&max) if max >= now => max.checked_add(1).unwrap_or_else(|| smallest_unused(&used)),
        _ => now,
    }
}

fn smallest_unused(used: &BTreeSet<u64>) -> u64 {
    let mut candidate = 1;
    for &id in used.range(1..) {
        if id != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Computer I/O"), "computer-i-o");
        assert_eq!(slugify("  Operating   Systems  "), "operating-systems");
        assert_eq!(slugify("Réseaux & Télécoms"), "reseaux-telecoms");
        assert_eq!(slugify("Français"), "francais");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Data Structures"), slugify("data structures"));
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_next_item_id_skips_existing() {
        let far_future = u64::MAX / 2;
        assert_eq!(next_item_id([1, far_future, 3]), far_future + 1);

        let id = next_item_id([1, 2, 3]);
        assert!(id > 3);
        assert!(next_item_id(std::iter::empty()) > 0);
    }

    #[test]
    fn test_next_item_id_at_max() {
        assert_eq!(next_item_id([u64::MAX]), 1);
        assert_eq!(next_item_id([1, 2, 4, u64::MAX]), 3);
        assert_eq!(next_item_id([0, 1, 2, u64::MAX]), 3);
    }
}
