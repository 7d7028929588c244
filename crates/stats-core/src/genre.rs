//! Genre string normalization.
//!
//! Raw genre cells come in many shapes (`"RPG, Adventure"`, `["Indie"]`,
//! `Action/Shooter`). They are reduced to a single canonical lowercase token
//! so that genre counts line up across platforms.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{non_missing, GenreLabel};

/// Token used when a genre is absent or normalizes to nothing.
pub const UNKNOWN_GENRE: &str = "unknown";

fn delimiter_re() -> &'static Regex {
    static DELIMITER_RE: OnceLock<Regex> = OnceLock::new();
    DELIMITER_RE.get_or_init(|| Regex::new(r"[,;/|]").expect("valid genre delimiter regex"))
}

fn strip_re() -> &'static Regex {
    static STRIP_RE: OnceLock<Regex> = OnceLock::new();
    STRIP_RE.get_or_init(|| Regex::new(r#"["'\[\]\\]"#).expect("valid genre strip regex"))
}

fn whitespace_re() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Reduce a raw genre cell to its canonical lowercase token.
///
/// Takes the first delimiter-separated token, strips quote/bracket
/// characters, collapses whitespace and lowercases. `None`, missing-value
/// cells and empty results map to [`UNKNOWN_GENRE`].
///
/// ```
/// use stats_core::genre::normalize_genre;
///
/// assert_eq!(normalize_genre(Some("RPG, Adventure")), "rpg");
/// assert_eq!(normalize_genre(Some("[\"Indie\"]")), "indie");
/// assert_eq!(normalize_genre(None), "unknown");
/// ```
pub fn normalize_genre(raw: Option<&str>) -> String {
    let Some(raw) = raw.and_then(non_missing) else {
        return UNKNOWN_GENRE.to_string();
    };

    let first = delimiter_re().split(raw).next().unwrap_or("");
    let stripped = strip_re().replace_all(first, "");
    let collapsed = whitespace_re().replace_all(&stripped, " ");
    let token = collapsed.trim().to_lowercase();

    if token.is_empty() {
        UNKNOWN_GENRE.to_string()
    } else {
        token
    }
}

/// Title-case a token: the first letter after any non-letter is uppercased,
/// every other letter lowercased (`"free-to-play"` → `"Free-To-Play"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Build the full [`GenreLabel`] for a raw cell.
pub fn genre_label(raw: Option<&str>) -> GenreLabel {
    let token = normalize_genre(raw);
    let display = title_case(&token);
    GenreLabel { token, display }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_comma_token() {
        assert_eq!(normalize_genre(Some("RPG, Adventure")), "rpg");
    }

    #[test]
    fn test_bracketed_list() {
        assert_eq!(normalize_genre(Some("[\"Indie\"]")), "indie");
        assert_eq!(normalize_genre(Some("['Action', 'Shooter']")), "action");
    }

    #[test]
    fn test_other_delimiters() {
        assert_eq!(normalize_genre(Some("Racing; Sports")), "racing");
        assert_eq!(normalize_genre(Some("Action/Adventure")), "action");
        assert_eq!(normalize_genre(Some("Puzzle|Casual")), "puzzle");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            normalize_genre(Some("  Massively   Multiplayer  ")),
            "massively multiplayer"
        );
    }

    #[test]
    fn test_empty_and_absent_are_unknown() {
        assert_eq!(normalize_genre(Some("")), UNKNOWN_GENRE);
        assert_eq!(normalize_genre(None), UNKNOWN_GENRE);
        assert_eq!(normalize_genre(Some("NaN")), UNKNOWN_GENRE);
        assert_eq!(normalize_genre(Some("[]")), UNKNOWN_GENRE);
        assert_eq!(normalize_genre(Some(", Action")), UNKNOWN_GENRE);
    }

    #[test]
    fn test_backslashes_stripped() {
        assert_eq!(normalize_genre(Some(r#"\"Strategy\""#)), "strategy");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let samples = [
            "RPG, Adventure",
            "[\"Indie\"]",
            "",
            "Free to Play",
            "  Action /Shooter",
            "unknown",
        ];
        for raw in samples {
            let once = normalize_genre(Some(raw));
            let twice = normalize_genre(Some(&once));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("rpg"), "Rpg");
        assert_eq!(title_case("free to play"), "Free To Play");
        assert_eq!(title_case("action-adventure"), "Action-Adventure");
        assert_eq!(title_case("4x strategy"), "4X Strategy");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_genre_label() {
        let label = genre_label(Some("Role-Playing Games (RPG), Action"));
        assert_eq!(label.token, "role-playing games (rpg)");
        assert_eq!(label.display, "Role-Playing Games (Rpg)");

        let unknown = genre_label(None);
        assert_eq!(unknown.token, "unknown");
        assert_eq!(unknown.display, "Unknown");
    }
}
