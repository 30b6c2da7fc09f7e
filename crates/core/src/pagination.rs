//! Page-number pagination for admin list endpoints.
//!
//! Produces the conventional envelope
//! `{ data, current_page, per_page, total, last_page, from, to }`.

use serde::Serialize;

/// Default page size when `per_page` is not supplied.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a user-provided page size to `1..=max`.
pub fn clamp_per_page(per_page: Option<i64>, default: i64, max: i64) -> i64 {
    per_page.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided 1-based page number.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based page, saturating for absurdly large pages.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page - 1).saturating_mul(per_page)
}

/// Number of the last page; an empty result still has one page.
pub fn last_page(total: i64, per_page: i64) -> i64 {
    ((total + per_page - 1) / per_page).max(1)
}

/// One page of results plus its position in the full result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    /// 1-based index of the first item on this page, `None` when empty.
    pub from: Option<i64>,
    /// 1-based index of the last item on this page, `None` when empty.
    pub to: Option<i64>,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = page_offset(page, per_page).saturating_add(1);
            (Some(first), Some(first.saturating_add(data.len() as i64 - 1)))
        };
        Self {
            data,
            current_page: page,
            per_page,
            total,
            last_page: last_page(total, per_page),
            from,
            to,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
