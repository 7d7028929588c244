//! Column-name resolution for the platform CSV exports.
//!
//! The exports disagree on naming (`gameid` vs `id`, `usd` vs `price`, ...).
//! Each logical field carries an ordered candidate list; the first candidate
//! present in a header row wins.

/// Ordered candidate column names for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct ColumnCandidates {
    /// Logical field name, used in log messages.
    pub field: &'static str,
    /// Candidate header names in priority order.
    pub candidates: &'static [&'static str],
}

impl ColumnCandidates {
    /// The first candidate present in `headers` (exact, case-sensitive).
    pub fn resolve<'h, S: AsRef<str>>(&self, headers: &'h [S]) -> Option<&'h str> {
        self.resolve_index(headers).map(|i| headers[i].as_ref())
    }

    /// Position of the first candidate present in `headers`.
    pub fn resolve_index<S: AsRef<str>>(&self, headers: &[S]) -> Option<usize> {
        self.candidates
            .iter()
            .find_map(|cand| headers.iter().position(|h| h.as_ref() == *cand))
    }
}

pub const GAME_ID: ColumnCandidates = ColumnCandidates {
    field: "game id",
    candidates: &["gameid", "id"],
};

/// Currency columns first, then the generic price names.
pub const PRICE: ColumnCandidates = ColumnCandidates {
    field: "price",
    candidates: &[
        "usd",
        "eur",
        "gbp",
        "price",
        "current_price",
        "retail_price",
        "final_price",
    ],
};

pub const ACQUIRED_AT: ColumnCandidates = ColumnCandidates {
    field: "acquisition date",
    candidates: &["date_acquired"],
};

pub const RELEASE_DATE: ColumnCandidates = ColumnCandidates {
    field: "release date",
    candidates: &["release_date"],
};

pub const GENRE: ColumnCandidates = ColumnCandidates {
    field: "genre",
    candidates: &["genre", "genres"],
};

pub const CREATED: ColumnCandidates = ColumnCandidates {
    field: "account creation",
    candidates: &["created"],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_game_id_prefers_gameid() {
        let h = headers(&["id", "title", "gameid"]);
        assert_eq!(GAME_ID.resolve(&h), Some("gameid"));
        assert_eq!(GAME_ID.resolve_index(&h), Some(2));
    }

    #[test]
    fn test_game_id_falls_back_to_id() {
        let h = headers(&["id", "title"]);
        assert_eq!(GAME_ID.resolve(&h), Some("id"));
    }

    #[test]
    fn test_game_id_absent() {
        let h = headers(&["title", "platform"]);
        assert_eq!(GAME_ID.resolve(&h), None);
    }

    #[test]
    fn test_price_usd_beats_generic_price() {
        let h = headers(&["gameid", "price", "usd"]);
        assert_eq!(PRICE.resolve(&h), Some("usd"));
    }

    #[test]
    fn test_price_currency_priority() {
        assert_eq!(PRICE.resolve(&headers(&["gbp", "eur"])), Some("eur"));
        assert_eq!(PRICE.resolve(&headers(&["gbp", "final_price"])), Some("gbp"));
    }

    #[test]
    fn test_price_generic_fallback_order() {
        assert_eq!(
            PRICE.resolve(&headers(&["final_price", "current_price"])),
            Some("current_price")
        );
        assert_eq!(PRICE.resolve(&headers(&["retail_price"])), Some("retail_price"));
        assert_eq!(PRICE.resolve(&headers(&["date_acquired"])), None);
    }

    #[test]
    fn test_resolution_is_case_sensitive() {
        assert_eq!(PRICE.resolve(&headers(&["USD"])), None);
    }

    #[test]
    fn test_genre_prefers_singular() {
        assert_eq!(GENRE.resolve(&headers(&["genres", "genre"])), Some("genre"));
        assert_eq!(GENRE.resolve(&headers(&["genres"])), Some("genres"));
    }

    #[test]
    fn test_works_on_str_slices() {
        let h = ["created", "playerid"];
        assert_eq!(CREATED.resolve(&h[..]), Some("created"));
    }
}
