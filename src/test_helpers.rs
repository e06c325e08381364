//! Shared fixtures for unit tests.
//!
//! Keeps URL-entry construction in one place so tests read as intent
//! ("three entries in the blog section") rather than struct literals.

use crate::collect::UrlEntry;

/// A bare entry with just a path and section.
pub(crate) fn entry_in(path: &str, section: &str) -> UrlEntry {
    UrlEntry {
        path: path.to_string(),
        lastmod: None,
        changefreq: None,
        priority: None,
        section: section.to_string(),
    }
}

/// `n` root-section entries with zero-padded paths (`page-000`, `page-001`,
/// ...), already in canonical order.
pub(crate) fn numbered_entries(n: usize) -> Vec<UrlEntry> {
    (0..n)
        .map(|i| entry_in(&format!("page-{:03}", i), ""))
        .collect()
}
