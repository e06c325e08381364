//! Stable pagination of the collected URL set.
//!
//! The page size is the single source of truth for both slicing and the
//! index's page count: both are derived from the same two numbers (total
//! entries, page size) through the functions here, so the sitemap index can
//! never advertise a different number of pages than generation produces.
//!
//! ## Page addressing
//!
//! Pages are zero-based. Page `i` covers entries `[i * page_size, (i + 1) *
//! page_size)` of the ordered URL set. Pages are disjoint and together cover
//! the full set, so for a fixed underlying set a URL always lands on the same
//! page index across regenerations.
//!
//! ## The `page` query parameter
//!
//! The raw `page` value arrives from the outside world (a query string, a CLI
//! flag) and is coerced defensively: anything that isn't a clean non-negative
//! integer is [`PageRequest::Invalid`], which downstream renders as the empty
//! sitemap document. Out-of-range is not detected here — it is a data
//! condition resolved against the actual entry count at slicing time.

/// How the caller addressed the sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// No `page` parameter: the sitemap index (or the sole page).
    Index,
    /// A specific zero-based page. May be out of range for the current set.
    Page(usize),
    /// Unparseable or negative `page` value. Served as an empty document.
    Invalid,
}

/// Coerce a raw `page` parameter into a [`PageRequest`].
///
/// - `None` or empty/whitespace-only → [`PageRequest::Index`]
/// - `"0"`, `"7"`, `" 12 "` → [`PageRequest::Page`]
/// - `"-1"`, `"abc"`, `"1.5"`, overflow → [`PageRequest::Invalid`]
///
/// Never panics, whatever the input.
pub fn parse_page_param(raw: Option<&str>) -> PageRequest {
    let Some(raw) = raw else {
        return PageRequest::Index;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PageRequest::Index;
    }
    match trimmed.parse::<usize>() {
        Ok(n) => PageRequest::Page(n),
        Err(_) => PageRequest::Invalid,
    }
}

/// Number of sitemap pages needed for `total` entries at `page_size` per page.
///
/// Ceiling division; an empty set has zero pages. `page_size` is validated
/// non-zero by config loading, but a zero here degrades to zero pages rather
/// than dividing by zero.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The slice of `entries` belonging to zero-based `page`.
///
/// Out-of-range pages return an empty slice — a data condition, not an error.
pub fn page_slice<T>(entries: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = match page.checked_mul(page_size) {
        Some(s) if s < entries.len() => s,
        _ => return &[],
    };
    let end = (start + page_size).min(entries.len());
    &entries[start..end]
}
