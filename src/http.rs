//! HTTP header contract for whatever serves the generated XML.
//!
//! The serving layer (a web server location block, an edge function, a tiny
//! handler) is out of scope here, but the headers it must send are not:
//! they derive from configuration this crate owns. This module is that
//! boundary — pure functions and constants, no I/O.

/// `Content-Type` for every sitemap response.
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Sitemaps are for crawlers to read, not to index as pages themselves.
pub const X_ROBOTS_TAG: &str = "noindex, follow";

/// Derive the `Cache-Control` value from the configured cache lifetime.
///
/// A lifetime of `0` means "do not cache publicly" — no directive at all,
/// letting the server's default (typically no-store or private) apply.
pub fn cache_control(cache_lifetime: u64) -> Option<String> {
    if cache_lifetime == 0 {
        None
    } else {
        Some(format!("public, max-age={}", cache_lifetime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lifetime_means_no_directive() {
        assert_eq!(cache_control(0), None);
    }

    #[test]
    fn positive_lifetime_is_public_max_age() {
        assert_eq!(
            cache_control(3600),
            Some("public, max-age=3600".to_string())
        );
    }

    #[test]
    fn default_lifetime_formats() {
        assert_eq!(
            cache_control(crate::config::DEFAULT_CACHE_LIFETIME),
            Some("public, max-age=86400".to_string())
        );
    }
}
