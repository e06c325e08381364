//! On-disk cache for generated sitemap XML.
//!
//! Regeneration renders every document for a domain and parks the results
//! here; whatever serves `/sitemap.xml` reads the files straight off disk.
//! The cache has two jobs beyond plain file storage:
//!
//! - **Atomic visibility**: each document is written to a temp file in the
//!   same directory and renamed into place. A concurrent reader sees either
//!   the fully-old or fully-new bytes for a given page, never a torn write.
//!   Two regenerations racing each other degrade to last-writer-wins, which
//!   is acceptable because both writers render from the same content state.
//! - **Change detection**: a per-domain JSON manifest records the SHA-256 of
//!   every cached document. A regeneration that produces identical XML skips
//!   the write entirely, so back-to-back runs with unchanged content leave
//!   byte-identical files (and mtimes) behind.
//!
//! ## Layout
//!
//! ```text
//! <cache_root>/
//! ├── main/                      # one directory per configured domain
//! │   ├── .sitemap-cache.json    # manifest: filename → content hash
//! │   ├── sitemap.xml            # the index document (or sole page)
//! │   ├── sitemap-0.xml          # page documents
//! │   └── sitemap-1.xml
//! └── docs/
//!     └── ...
//! ```
//!
//! Domains are fully isolated: a failure while regenerating one domain can
//! touch nothing under another domain's directory.
//!
//! ## Manifest robustness
//!
//! A missing, corrupt, or version-mismatched manifest loads as empty — the
//! next regeneration rewrites everything rather than erroring. Lookups verify
//! the stored hash against the bytes actually on disk, so a hand-edited or
//! half-copied file is treated as absent instead of being served.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within each domain directory.
const MANIFEST_FILENAME: &str = ".sitemap-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// Which document of a domain's sitemap set a cache operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKey {
    /// The document served at `/sitemap.xml` with no page parameter.
    Index,
    /// The document served at `/sitemap.xml?page=N`.
    Page(usize),
}

impl DocKey {
    /// Filename of this document inside the domain directory.
    pub fn filename(&self) -> String {
        match self {
            DocKey::Index => "sitemap.xml".to_string(),
            DocKey::Page(n) => format!("sitemap-{}.xml", n),
        }
    }
}

/// Outcome of a [`SitemapCache::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// New or changed content was written.
    Written,
    /// The cached document already had identical content; nothing touched.
    Unchanged,
}

/// Per-domain manifest mapping document filenames to content hashes.
///
/// `BTreeMap` keeps the serialized manifest stable across runs, so an
/// unchanged regeneration leaves the manifest file byte-identical too.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CacheManifest {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl CacheManifest {
    fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from a domain directory. Returns an empty manifest if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    fn load(domain_dir: &Path) -> Self {
        let path = domain_dir.join(MANIFEST_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest
    }

    fn save(&self, domain_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(&domain_dir.join(MANIFEST_FILENAME), json.as_bytes())
    }
}

/// File-backed sitemap cache rooted at a directory.
pub struct SitemapCache {
    root: PathBuf,
}

impl SitemapCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one domain's documents and manifest.
    pub fn domain_dir(&self, domain: &str) -> PathBuf {
        self.root.join(domain)
    }

    /// Fetch a cached document, verifying its recorded content hash.
    ///
    /// Returns `None` when the document was never cached, the file is gone,
    /// or the bytes on disk no longer match the manifest (tampering or a
    /// partial external copy).
    pub fn get(&self, domain: &str, key: DocKey) -> Option<String> {
        let dir = self.domain_dir(domain);
        let manifest = CacheManifest::load(&dir);
        let filename = key.filename();
        let expected = manifest.entries.get(&filename)?;
        let content = fs::read_to_string(dir.join(&filename)).ok()?;
        if hash_content(&content) == *expected {
            Some(content)
        } else {
            None
        }
    }

    /// Store a document, atomically, skipping the write when content is
    /// unchanged.
    pub fn put(&self, domain: &str, key: DocKey, xml: &str) -> io::Result<PutOutcome> {
        let dir = self.domain_dir(domain);
        fs::create_dir_all(&dir)?;
        let filename = key.filename();
        let hash = hash_content(xml);

        let mut manifest = CacheManifest::load(&dir);
        if manifest.entries.get(&filename) == Some(&hash) && dir.join(&filename).exists() {
            return Ok(PutOutcome::Unchanged);
        }

        write_atomic(&dir.join(&filename), xml.as_bytes())?;
        manifest.entries.insert(filename, hash);
        manifest.save(&dir)?;
        Ok(PutOutcome::Written)
    }

    /// Drop page documents at or beyond `page_count` after the URL set
    /// shrank. The index document is never removed here; regeneration always
    /// rewrites it.
    pub fn invalidate_beyond(&self, domain: &str, page_count: usize) -> io::Result<()> {
        let dir = self.domain_dir(domain);
        if !dir.exists() {
            return Ok(());
        }
        let mut manifest = CacheManifest::load(&dir);
        let stale: Vec<String> = manifest
            .entries
            .keys()
            .filter(|name| page_number_of(name).is_some_and(|n| n >= page_count))
            .cloned()
            .collect();
        if stale.is_empty() {
            return Ok(());
        }
        for name in &stale {
            let path = dir.join(name);
            if path.exists() {
                fs::remove_file(&path)?;
            }
            manifest.entries.remove(name);
        }
        manifest.save(&dir)
    }
}

/// Parse the page number out of a `sitemap-N.xml` filename.
fn page_number_of(filename: &str) -> Option<usize> {
    filename
        .strip_prefix("sitemap-")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// SHA-256 of document content, as a hex string.
fn hash_content(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Write bytes to a temp file in the target's directory, then rename into
/// place. Rename within one filesystem is atomic, so readers never observe
/// partial content.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sitemap".to_string());
    let tmp = path.with_file_name(format!("{}.tmp", name));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Write/skip counters for one regeneration pass over a domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegenStats {
    pub written: u32,
    pub unchanged: u32,
}

impl RegenStats {
    pub fn record(&mut self, outcome: PutOutcome) {
        match outcome {
            PutOutcome::Written => self.written += 1,
            PutOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.written + self.unchanged
    }
}

impl fmt::Display for RegenStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} written, {} unchanged ({} total)",
                self.written,
                self.unchanged,
                self.total()
            )
        } else {
            write!(f, "{} written", self.written)
        }
    }
}
