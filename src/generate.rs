//! Sitemap generation: the pipeline's orchestration stage.
//!
//! A [`Generator`] wires one domain's URL source to the paginator and
//! renderer, answering the two questions the outside world asks:
//!
//! - [`Generator::sitemap`]: "give me the document for this page request" —
//!   stateless, read-only, safe to run concurrently with anything.
//! - [`regenerate_all`]: "rebuild every domain's cached sitemap set" — the
//!   one operation with side effects, writing through [`SitemapCache`].
//!
//! ## Index semantics
//!
//! When the URL set fits in a single page, the index request returns that
//! page's `<urlset>` directly; a `<sitemapindex>` is produced only when the
//! set spans more than one page. Small sites get one self-contained document
//! at `/sitemap.xml`, large sites get an index plus paged documents.
//!
//! ## Failure isolation
//!
//! `regenerate_all` treats each domain independently. A domain whose source
//! fails gets its error recorded in its [`DomainResult`]; the pass continues
//! and no other domain's cached output is disturbed.

use crate::cache::{DocKey, RegenStats, SitemapCache};
use crate::collect::{
    CollectError, HtmlDirSource, ManifestSource, UrlEntry, UrlSource, order_urls,
};
use crate::config::{DomainConfig, EntryDefaults, SitemapConfig};
use crate::paginate::{PageRequest, page_count, page_slice};
use crate::render;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("URL collection failed: {0}")]
    Collect(#[from] CollectError),
    #[error("cache write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-domain record returned by [`regenerate_all`].
///
/// `urls`/`pages` are zero when the domain failed; callers sum successes for
/// the summary line and report errors individually.
#[derive(Debug, Serialize)]
pub struct DomainResult {
    pub domain: String,
    pub urls: usize,
    pub pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Cache write/skip counters. CLI display only, not part of the record.
    #[serde(skip)]
    pub stats: RegenStats,
}

/// Sitemap generator for a single domain.
pub struct Generator {
    base_url: String,
    page_size: usize,
    defaults: EntryDefaults,
    source: Box<dyn UrlSource>,
}

impl Generator {
    /// Build a generator from explicit parts. Library embedders use this
    /// with their own [`UrlSource`].
    pub fn new(
        base_url: impl Into<String>,
        page_size: usize,
        defaults: EntryDefaults,
        source: Box<dyn UrlSource>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            page_size,
            defaults,
            source,
        }
    }

    /// Build a generator for one configured domain. Source paths resolve
    /// relative to `base_dir` (conventionally the config file's directory).
    pub fn for_domain(domain: &DomainConfig, config: &SitemapConfig, base_dir: &Path) -> Self {
        let source: Box<dyn UrlSource> = match (&domain.html_dir, &domain.manifest) {
            (Some(dir), _) => Box::new(HtmlDirSource::new(base_dir.join(dir))),
            (_, Some(manifest)) => Box::new(ManifestSource::new(base_dir.join(manifest))),
            // Config validation guarantees one source is set; an impossible
            // state still collects as an empty directory error path.
            (None, None) => Box::new(HtmlDirSource::new(base_dir.join("."))),
        };
        Self::new(
            domain.base_url.clone(),
            config.page_size,
            config.defaults.clone(),
            source,
        )
    }

    /// Collect, default-fill, and canonically order the domain's URL set.
    fn collect(&self) -> Result<Vec<UrlEntry>, GenerateError> {
        let mut entries = self.source.list_urls()?;
        for entry in &mut entries {
            if entry.changefreq.is_none() {
                entry.changefreq = self.defaults.changefreq.clone();
            }
            if entry.priority.is_none() {
                entry.priority = self.defaults.priority;
            }
        }
        Ok(order_urls(entries))
    }

    /// Count the domain's URLs and pages without rendering anything.
    ///
    /// Backs the `check` command: validates that the source is readable and
    /// reports the shape of the sitemap set a regeneration would produce.
    pub fn inventory(&self) -> Result<(usize, usize), GenerateError> {
        let entries = self.collect()?;
        let pages = page_count(entries.len(), self.page_size);
        Ok((entries.len(), pages))
    }

    /// Produce the XML document for a page request.
    ///
    /// Out-of-range and unparseable page values yield the minimal valid
    /// empty document — a data condition, never an error. Only a failing
    /// URL source surfaces as `Err`.
    pub fn sitemap(&self, request: PageRequest) -> Result<String, GenerateError> {
        let entries = self.collect()?;
        let pages = page_count(entries.len(), self.page_size);
        let xml = match request {
            PageRequest::Index => self.index_document(&entries, pages),
            PageRequest::Page(n) => {
                let slice = page_slice(&entries, n, self.page_size);
                if slice.is_empty() {
                    render::render_empty()
                } else {
                    render::render_urlset(&self.base_url, slice)
                }
            }
            PageRequest::Invalid => render::render_empty(),
        };
        Ok(xml)
    }

    /// The document served at the bare `/sitemap.xml` URL.
    fn index_document(&self, entries: &[UrlEntry], pages: usize) -> String {
        if pages > 1 {
            render::render_index(&self.base_url, pages)
        } else {
            render::render_urlset(&self.base_url, entries)
        }
    }

    /// Rebuild this domain's full document set into the cache.
    ///
    /// Writes each page document and the index atomically, then drops cached
    /// pages beyond the new page count. Returns (urls, pages, stats).
    pub fn regenerate_into(
        &self,
        cache: &SitemapCache,
        domain: &str,
    ) -> Result<(usize, usize, RegenStats), GenerateError> {
        let entries = self.collect()?;
        let pages = page_count(entries.len(), self.page_size);
        let mut stats = RegenStats::default();

        for page in 0..pages {
            let slice = page_slice(&entries, page, self.page_size);
            let xml = render::render_urlset(&self.base_url, slice);
            stats.record(cache.put(domain, DocKey::Page(page), &xml)?);
        }
        let index = self.index_document(&entries, pages);
        stats.record(cache.put(domain, DocKey::Index, &index)?);
        cache.invalidate_beyond(domain, pages)?;

        Ok((entries.len(), pages, stats))
    }
}

/// Rebuild cached sitemaps for every configured domain.
///
/// Domains are processed sequentially and independently; a failure is
/// recorded in that domain's result and the pass moves on.
pub fn regenerate_all(
    config: &SitemapConfig,
    base_dir: &Path,
    cache: &SitemapCache,
) -> Vec<DomainResult> {
    config
        .domains
        .iter()
        .map(|domain| {
            let generator = Generator::for_domain(domain, config, base_dir);
            match generator.regenerate_into(cache, &domain.name) {
                Ok((urls, pages, stats)) => DomainResult {
                    domain: domain.name.clone(),
                    urls,
                    pages,
                    error: None,
                    stats,
                },
                Err(err) => DomainResult {
                    domain: domain.name.clone(),
                    urls: 0,
                    pages: 0,
                    error: Some(err.to_string()),
                    stats: RegenStats::default(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PutOutcome;
    use crate::collect::StaticSource;
    use crate::test_helpers::numbered_entries;
    use tempfile::TempDir;

    fn generator(total: usize, page_size: usize) -> Generator {
        Generator::new(
            "https://example.com",
            page_size,
            EntryDefaults::default(),
            Box::new(StaticSource::new(numbered_entries(total))),
        )
    }

    // =========================================================================
    // sitemap: page requests
    // =========================================================================

    #[test]
    fn pages_partition_the_url_set() {
        let g = generator(25, 10);
        let mut seen = Vec::new();
        for page in 0..3 {
            let xml = g.sitemap(PageRequest::Page(page)).unwrap();
            for i in 0..25 {
                let loc = format!("<loc>https://example.com/page-{:03}</loc>", i);
                if xml.contains(&loc) {
                    seen.push(i);
                }
            }
        }
        // Union over all pages is the full set, no duplicates, no omissions
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn page_contains_only_its_slice() {
        let g = generator(25, 10);
        let xml = g.sitemap(PageRequest::Page(1)).unwrap();
        assert!(xml.contains("<loc>https://example.com/page-010</loc>"));
        assert!(xml.contains("<loc>https://example.com/page-019</loc>"));
        assert!(!xml.contains("page-009<"));
        assert!(!xml.contains("page-020<"));
        assert_eq!(xml.matches("<url>").count(), 10);
    }

    #[test]
    fn out_of_range_page_is_empty_document() {
        let g = generator(25, 10);
        let xml = g.sitemap(PageRequest::Page(3)).unwrap();
        assert_eq!(xml, render::render_empty());
    }

    #[test]
    fn invalid_request_is_empty_document() {
        let g = generator(25, 10);
        let xml = g.sitemap(PageRequest::Invalid).unwrap();
        assert_eq!(xml, render::render_empty());
    }

    // =========================================================================
    // sitemap: index requests
    // =========================================================================

    #[test]
    fn multi_page_index_lists_every_page() {
        let g = generator(25, 10);
        let xml = g.sitemap(PageRequest::Index).unwrap();
        assert_eq!(xml.matches("<sitemap>").count(), 3);
        assert!(xml.contains("sitemap.xml?page=0"));
        assert!(xml.contains("sitemap.xml?page=2"));
    }

    #[test]
    fn single_page_index_is_the_urlset_itself() {
        let g = generator(5, 10);
        let xml = g.sitemap(PageRequest::Index).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<sitemapindex"));
        assert_eq!(xml.matches("<url>").count(), 5);
    }

    #[test]
    fn empty_set_index_is_empty_urlset() {
        let g = generator(0, 10);
        let xml = g.sitemap(PageRequest::Index).unwrap();
        assert_eq!(xml, render::render_empty());
    }

    #[test]
    fn repeated_calls_are_byte_identical() {
        let g = generator(25, 10);
        assert_eq!(
            g.sitemap(PageRequest::Index).unwrap(),
            g.sitemap(PageRequest::Index).unwrap()
        );
        assert_eq!(
            g.sitemap(PageRequest::Page(1)).unwrap(),
            g.sitemap(PageRequest::Page(1)).unwrap()
        );
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn defaults_fill_unset_entry_fields() {
        let g = Generator::new(
            "https://example.com",
            10,
            EntryDefaults {
                changefreq: Some("weekly".to_string()),
                priority: Some(0.5),
            },
            Box::new(StaticSource::new(numbered_entries(1))),
        );
        let xml = g.sitemap(PageRequest::Page(0)).unwrap();
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
    }

    #[test]
    fn entry_values_beat_defaults() {
        let mut entries = numbered_entries(1);
        entries[0].changefreq = Some("daily".to_string());
        let g = Generator::new(
            "https://example.com",
            10,
            EntryDefaults {
                changefreq: Some("weekly".to_string()),
                priority: None,
            },
            Box::new(StaticSource::new(entries)),
        );
        let xml = g.sitemap(PageRequest::Page(0)).unwrap();
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(!xml.contains("weekly"));
    }

    // =========================================================================
    // Source failure
    // =========================================================================

    #[test]
    fn failing_source_surfaces_as_error() {
        let g = Generator::new(
            "https://example.com",
            10,
            EntryDefaults::default(),
            Box::new(HtmlDirSource::new("/nonexistent/site")),
        );
        assert!(matches!(
            g.sitemap(PageRequest::Index),
            Err(GenerateError::Collect(_))
        ));
    }

    // =========================================================================
    // regenerate_into
    // =========================================================================

    #[test]
    fn regeneration_writes_pages_and_index() {
        let tmp = TempDir::new().unwrap();
        let cache = SitemapCache::new(tmp.path());
        let g = generator(25, 10);

        let (urls, pages, stats) = g.regenerate_into(&cache, "main").unwrap();
        assert_eq!(urls, 25);
        assert_eq!(pages, 3);
        assert_eq!(stats.written, 4); // 3 pages + index
        assert!(cache.get("main", DocKey::Index).is_some());
        assert!(cache.get("main", DocKey::Page(2)).is_some());
    }

    #[test]
    fn second_regeneration_is_all_unchanged() {
        let tmp = TempDir::new().unwrap();
        let cache = SitemapCache::new(tmp.path());
        let g = generator(25, 10);

        g.regenerate_into(&cache, "main").unwrap();
        let before = cache.get("main", DocKey::Page(1)).unwrap();
        let (_, _, stats) = g.regenerate_into(&cache, "main").unwrap();

        assert_eq!(stats.written, 0);
        assert_eq!(stats.unchanged, 4);
        assert_eq!(cache.get("main", DocKey::Page(1)).unwrap(), before);
    }

    #[test]
    fn shrinking_set_drops_stale_pages() {
        let tmp = TempDir::new().unwrap();
        let cache = SitemapCache::new(tmp.path());

        generator(25, 10).regenerate_into(&cache, "main").unwrap();
        assert!(cache.get("main", DocKey::Page(2)).is_some());

        generator(12, 10).regenerate_into(&cache, "main").unwrap();
        assert!(cache.get("main", DocKey::Page(1)).is_some());
        assert!(cache.get("main", DocKey::Page(2)).is_none());
    }

    #[test]
    fn cached_documents_match_direct_generation() {
        let tmp = TempDir::new().unwrap();
        let cache = SitemapCache::new(tmp.path());
        let g = generator(25, 10);

        g.regenerate_into(&cache, "main").unwrap();
        assert_eq!(
            cache.get("main", DocKey::Index).unwrap(),
            g.sitemap(PageRequest::Index).unwrap()
        );
        assert_eq!(
            cache.get("main", DocKey::Page(0)).unwrap(),
            g.sitemap(PageRequest::Page(0)).unwrap()
        );
    }

    #[test]
    fn unchanged_put_outcome_flows_from_cache() {
        // Guard against regenerate_into bypassing the unchanged-skip
        let tmp = TempDir::new().unwrap();
        let cache = SitemapCache::new(tmp.path());
        let g = generator(3, 10);
        g.regenerate_into(&cache, "main").unwrap();

        let xml = g.sitemap(PageRequest::Page(0)).unwrap();
        assert_eq!(
            cache.put("main", DocKey::Page(0), &xml).unwrap(),
            PutOutcome::Unchanged
        );
    }
}
