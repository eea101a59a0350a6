//! Query composer
//!
//! Turns the raw `t` and `pagina` parameters into a [`ListQuery`]. Never
//! fails: missing or malformed input only removes constraints.

use super::Cursor;

/// Records per page.
pub const PAGE_SIZE: usize = 5;

/// Case-insensitive substring match against name or nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            None
        } else {
            Some(Self(term.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `%term%` with LIKE metacharacters escaped by `\`.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Backend-neutral listing filter.
///
/// Rows must satisfy the search (if any) and lie strictly after `after`
/// (if any): `seq_id > after.sequence_id AND created_at >= after.created_at`.
/// The id comparison is authoritative; the timestamp one is a coarse
/// pre-filter that relies on timestamps growing with ids. Rows come back
/// ordered by `seq_id` ascending, at most `limit` of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<SearchTerm>,
    pub after: Option<Cursor>,
    pub limit: usize,
}

impl ListQuery {
    pub fn compose(search_term: Option<&str>, cursor: Option<&str>) -> Self {
        let after = cursor
            .map(Cursor::decode)
            .filter(|cursor| !cursor.is_origin());

        Self {
            search: search_term.and_then(SearchTerm::new),
            after,
            limit: PAGE_SIZE,
        }
    }

    /// Unfiltered first page.
    pub fn first_page() -> Self {
        Self::compose(None, None)
    }
}
