//! URL collection: stage 1 of the sitemap pipeline.
//!
//! Every sitemap starts from an ordered list of indexable URLs. This module
//! defines the entry type, the [`UrlSource`] seam that produces entries, and
//! the single ordering rule all sources share.
//!
//! ## Sources
//!
//! - [`HtmlDirSource`]: walks a built static site directory and derives one
//!   entry per HTML file. `index.html` files map to their directory's clean
//!   URL; other `.html` files keep their filename. `lastmod` comes from the
//!   file's modification time.
//! - [`ManifestSource`]: reads an explicit `[[urls]]` TOML manifest, for
//!   sites whose URL set is not filesystem-derived (or that want per-URL
//!   changefreq/priority control).
//! - [`StaticSource`]: a fixed in-memory list. Used by library embedders and
//!   as the test fixture the generator is exercised against.
//!
//! ## Ordering
//!
//! Pagination is only stable if collection order is. All sources funnel
//! through [`order_urls`], which sorts entries by section priority (the order
//! in which sections first appear, root section first) and then by byte-wise
//! path. Duplicate paths collapse to their first occurrence. For an unchanged
//! URL set this puts every URL on the same page index across regenerations.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("URL manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("source directory does not exist: {0}")]
    MissingDir(PathBuf),
}

/// One indexable URL on the site.
///
/// Immutable for the duration of a generation pass; derived on demand from
/// content state, never persisted as its own record.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    /// Site-relative path, without leading slash (`""` is the site root).
    pub path: String,
    /// Last-modified date (`YYYY-MM-DD`), if known.
    pub lastmod: Option<String>,
    /// Protocol change-frequency hint (`daily`, `weekly`, ...), if set.
    pub changefreq: Option<String>,
    /// Protocol priority hint (0.0–1.0), if set.
    pub priority: Option<f32>,
    /// Grouping key used for ordering: top-level directory for filesystem
    /// sources, free-form for manifests. `""` is the root section.
    pub section: String,
}

/// The narrow content-query seam the generator depends on.
///
/// A source answers one question: which URLs are indexable right now. It
/// reads content state and never mutates anything, so concurrent collection
/// passes need no coordination. Implementations do not need to order their
/// output; the generator applies [`order_urls`] to whatever they return.
pub trait UrlSource {
    fn list_urls(&self) -> Result<Vec<UrlEntry>, CollectError>;
}

/// Sort entries into the canonical pagination order and drop duplicates.
///
/// Sections rank by first appearance in the input, except the root section
/// (`""`) which always ranks first. Within a section, paths sort byte-wise.
/// The first occurrence of a duplicated path wins.
pub fn order_urls(entries: Vec<UrlEntry>) -> Vec<UrlEntry> {
    let mut section_rank: HashMap<String, usize> = HashMap::new();
    section_rank.insert(String::new(), 0);
    for entry in &entries {
        let next = section_rank.len();
        section_rank.entry(entry.section.clone()).or_insert(next);
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<UrlEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(entry.path.clone()) {
            deduped.push(entry);
        }
    }

    deduped.sort_by(|a, b| {
        let ra = section_rank[&a.section];
        let rb = section_rank[&b.section];
        ra.cmp(&rb).then_with(|| a.path.cmp(&b.path))
    });
    deduped
}

// ============================================================================
// Filesystem source
// ============================================================================

/// Collects URLs by walking a built static site directory.
pub struct HtmlDirSource {
    root: PathBuf,
}

impl HtmlDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl UrlSource for HtmlDirSource {
    fn list_urls(&self) -> Result<Vec<UrlEntry>, CollectError> {
        if !self.root.is_dir() {
            return Err(CollectError::MissingDir(self.root.clone()));
        }
        let mut entries = Vec::new();
        // depth 0 is the root itself; its name (e.g. a dot-prefixed build
        // dir) must not trip the hidden filter
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !is_hidden(e.file_name().to_string_lossy().as_ref())
            });
        for item in walker {
            let item = item?;
            if !item.file_type().is_file() {
                continue;
            }
            let rel = item
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(item.path());
            let Some(path) = url_path_for(rel) else {
                continue;
            };
            let lastmod = fs::metadata(item.path())
                .and_then(|m| m.modified())
                .ok()
                .map(|t| DateTime::<Utc>::from(t).format("%Y-%m-%d").to_string());
            entries.push(UrlEntry {
                section: section_of(&path),
                path,
                lastmod,
                changefreq: None,
                priority: None,
            });
        }
        Ok(entries)
    }
}

/// Hidden files and directories (dotfiles) are never indexed.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Map a site-relative file path to its URL path, or `None` if not indexable.
///
/// - `index.html` → the containing directory's clean URL (`""` at the root)
/// - `about.html` → `about.html`
/// - `404.html` at the root → skipped (an error page, not content)
/// - non-HTML files → skipped
fn url_path_for(rel: &Path) -> Option<String> {
    if rel.extension().and_then(|e| e.to_str()) != Some("html") {
        return None;
    }
    let rel_str = rel.to_string_lossy().replace('\\', "/");
    if rel_str == "404.html" {
        return None;
    }
    if rel.file_name().and_then(|n| n.to_str()) == Some("index.html") {
        let parent = rel.parent().unwrap_or(Path::new(""));
        return Some(parent.to_string_lossy().replace('\\', "/"));
    }
    Some(rel_str)
}

/// Top-level path component, or `""` for root-level URLs.
fn section_of(path: &str) -> String {
    match path.split_once('/') {
        Some((first, _)) => first.to_string(),
        None => {
            // A root-level file like `about.html` has no section directory.
            String::new()
        }
    }
}

// ============================================================================
// Manifest source
// ============================================================================

/// Shape of one `[[urls]]` entry in a URL manifest file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestUrl {
    path: String,
    #[serde(default)]
    lastmod: Option<String>,
    #[serde(default)]
    changefreq: Option<String>,
    #[serde(default)]
    priority: Option<f32>,
    #[serde(default)]
    section: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UrlManifest {
    #[serde(default)]
    urls: Vec<ManifestUrl>,
}

/// Collects URLs from an explicit TOML manifest:
///
/// ```toml
/// [[urls]]
/// path = "products/widget"
/// lastmod = "2026-08-01"
/// changefreq = "weekly"
/// priority = 0.8
/// section = "products"
/// ```
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UrlSource for ManifestSource {
    fn list_urls(&self) -> Result<Vec<UrlEntry>, CollectError> {
        let content = fs::read_to_string(&self.path)?;
        let manifest: UrlManifest = toml::from_str(&content)?;
        Ok(manifest
            .urls
            .into_iter()
            .map(|u| UrlEntry {
                path: u.path.trim_start_matches('/').to_string(),
                lastmod: u.lastmod,
                changefreq: u.changefreq,
                priority: u.priority,
                section: u.section.unwrap_or_default(),
            })
            .collect())
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// A fixed URL list. The substitute for a real content store in tests and
/// for embedders that already know their URL set.
pub struct StaticSource {
    entries: Vec<UrlEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<UrlEntry>) -> Self {
        Self { entries }
    }
}

impl UrlSource for StaticSource {
    fn list_urls(&self) -> Result<Vec<UrlEntry>, CollectError> {
        Ok(self.entries.clone())
    }
}
