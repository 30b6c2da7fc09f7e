//! Free-text search helpers shared by the list endpoints.
//!
//! Search is a case-insensitive substring match (`ILIKE`) OR'd across a fixed
//! set of columns per entity.

/// Columns matched by the project search filter.
pub const PROJECT_SEARCH_COLUMNS: &[&str] = &["title", "description", "client"];

/// Columns matched by the contact message search filter.
pub const MESSAGE_SEARCH_COLUMNS: &[&str] = &["name", "email", "company", "message"];

/// Normalize a user-supplied search term.
///
/// Surrounding whitespace is dropped; a blank term means "no filter".
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Build an `ILIKE` pattern matching `term` anywhere in a column.
///
/// `%`, `_` and `\` in the term are escaped so they match literally.
///
/// # Examples
///
/// ```
/// use enki_core::search::like_pattern;
/// assert_eq!(like_pattern("video"), "%video%");
/// assert_eq!(like_pattern("50%"), "%50\\%%");
/// ```
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Build an OR'd `ILIKE` condition over `columns` sharing placeholder `$idx`.
///
/// # Examples
///
/// ```
/// use enki_core::search::ilike_any;
/// assert_eq!(
///     ilike_any(&["title", "client"], 2),
///     "(title ILIKE $2 OR client ILIKE $2)"
/// );
/// ```
pub fn ilike_any(columns: &[&str], idx: u32) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|col| format!("{col} ILIKE ${idx}"))
        .collect();
    format!("({})", parts.join(" OR "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_are_dropped() {
        assert_eq!(normalize_term(None), None);
        assert_eq!(normalize_term(Some("   ")), None);
        assert_eq!(normalize_term(Some(" reel ")), Some("reel".to_string()));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn ilike_any_single_column() {
        assert_eq!(ilike_any(&["name"], 1), "(name ILIKE $1)");
    }

    #[test]
    fn message_search_covers_four_columns() {
        assert_eq!(
            ilike_any(MESSAGE_SEARCH_COLUMNS, 3),
            "(name ILIKE $3 OR email ILIKE $3 OR company ILIKE $3 OR message ILIKE $3)"
        );
    }
}
