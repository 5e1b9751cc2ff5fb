//! Column identifier derivation.
//!
//! Header text from a CSV file can contain anything: spaces, punctuation,
//! mixed case, leading digits. Columns are addressed by identifiers derived
//! from that text:
//!
//! 1. Lowercase the header
//! 2. Collapse whitespace runs into single underscores
//! 3. Strip every character outside `[A-Za-z0-9_]`
//! 4. Prefix an underscore when the result starts with a digit
//!
//! A header that normalizes to nothing gets `_<position>` instead.

use std::collections::HashSet;

use crate::error::TableError;
use crate::Result;

/// Lowercase, join whitespace-separated words with `_` and drop every
/// character outside `[A-Za-z0-9_]`.
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Prefix an underscore when the identifier starts with an ASCII digit.
pub fn fix_leading_digit(ident: String) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// Derive the identifier for the header at `position`.
pub fn make_identifier(raw: &str, position: usize) -> String {
    let slug = slugify(raw);
    if slug.is_empty() {
        format!("_{position}")
    } else {
        fix_leading_digit(slug)
    }
}

/// Derive identifiers for a whole header row.
///
/// Fails with [`TableError::DuplicateHeader`] on the first header whose
/// identifier was already produced by an earlier one.
pub fn make_identifiers<I, S>(headers: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut idents = Vec::new();

    for (position, header) in headers.into_iter().enumerate() {
        let ident = make_identifier(header.as_ref(), position);
        if !seen.insert(ident.clone()) {
            return Err(TableError::DuplicateHeader {
                name: ident,
                header: header.as_ref().to_string(),
            });
        }
        idents.push(ident);
    }

    Ok(idents)
}

/// Edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() < b.len() {
        return levenshtein_chars(&b, &a);
    }
    levenshtein_chars(&a, &b)
}

// `longer` must be at least as long as `shorter`; keeps the row buffer small.
fn levenshtein_chars(longer: &[char], shorter: &[char]) -> usize {
    if shorter.is_empty() {
        return longer.len();
    }

    let mut previous: Vec<usize> = (0..=shorter.len()).collect();
    for (i, c1) in longer.iter().enumerate() {
        let mut current = Vec::with_capacity(shorter.len() + 1);
        current.push(i + 1);
        for (j, c2) in shorter.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(c1 != c2);
            current.push(insertion.min(deletion).min(substitution));
        }
        previous = current;
    }

    previous[shorter.len()]
}

/// Pick the candidate closest to `name`, if any is close enough to be a
/// plausible typo.
pub fn suggest<'a, I>(name: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let threshold = (name.chars().count() / 3).max(1);
    candidates
        .into_iter()
        .map(|c| (levenshtein(name, c), c))
        .filter(|(dist, _)| *dist <= threshold)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, c)| c.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Name"), "name");
        assert_eq!(slugify("First   Name"), "first_name");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("Price ($)"), "price_");
        assert_eq!(slugify("e-mail"), "email");
    }

    #[test]
    fn test_slugify_tabs_and_newlines() {
        assert_eq!(slugify("a\t\nb"), "a_b");
    }

    #[test]
    fn test_leading_digit_gets_underscore() {
        assert_eq!(make_identifier("2nd place", 0), "_2nd_place");
        assert_eq!(make_identifier("1", 0), "_1");
    }

    #[test]
    fn test_empty_identifier_uses_position() {
        assert_eq!(make_identifier("???", 3), "_3");
        assert_eq!(make_identifier("", 0), "_0");
    }

    #[test]
    fn test_identifier_is_idempotent() {
        for raw in ["Total Score", "2nd", "a-b c", "___"] {
            let once = make_identifier(raw, 0);
            assert_eq!(make_identifier(&once, 0), once);
        }
    }

    #[test]
    fn test_identifier_grammar() {
        let inputs = [
            "Hello World",
            "42",
            "naïve café",
            "tab\tsep",
            "UPPER_lower",
            "--",
            "9 lives",
        ];
        for (i, raw) in inputs.iter().enumerate() {
            let ident = make_identifier(raw, i);
            assert!(!ident.is_empty());
            assert!(ident
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_'));
            assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_make_identifiers_preserves_count() {
        let ids = make_identifiers(["Name", "Age", "Home Town"]).unwrap();
        assert_eq!(ids, vec!["name", "age", "home_town"]);
    }

    #[test]
    fn test_make_identifiers_duplicate() {
        let err = make_identifiers(["Name", "age", "NAME"]).unwrap_err();
        match err {
            TableError::DuplicateHeader { name, header } => {
                assert_eq!(name, "name");
                assert_eq!(header, "NAME");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("name", "nme"), 1);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_suggest() {
        let names = vec!["name".to_string(), "age".to_string(), "city".to_string()];
        assert_eq!(suggest("nme", &names), Some("name".to_string()));
        assert_eq!(suggest("agee", &names), Some("age".to_string()));
        assert_eq!(suggest("zzzzzz", &names), None);
    }
}
