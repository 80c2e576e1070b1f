//! Helper types and utility functions for handlers.

/// Clamp a 1-based page number and compute the query window.
///
/// Returns (page, limit, offset).
pub fn paginate(page: Option<usize>, per_page: usize) -> (usize, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;
    (page, per_page as i64, offset as i64)
}

/// Number of pages needed for `total` items, at least 1.
pub fn page_count(total: u64, per_page: usize) -> usize {
    ((total as usize).div_ceil(per_page)).max(1)
}
