//! # Sitemapper
//!
//! A minimal multi-domain sitemap generator for static sites. Declare your
//! domains in `sitemapper.toml` and each one gets its own sitemaps.org
//! document set: a sitemap index plus fixed-size pages, cached on disk and
//! ready to be served at `/sitemap.xml` and `/sitemap.xml?page=N`.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Each domain's sitemap set is produced by three independent stages:
//!
//! ```text
//! 1. Collect    content source  →  ordered Vec<UrlEntry>
//! 2. Paginate   entries         →  fixed-size, disjoint page slices
//! 3. Render     slices          →  sitemap XML (index + pages)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Determinism**: ordering lives in one place ([`collect::order_urls`])
//!   and slicing in another ([`paginate`]), so "same URL set → same page
//!   assignment → byte-identical XML" holds by construction.
//! - **Testability**: the generator takes its URLs through the narrow
//!   [`collect::UrlSource`] trait, so tests substitute a fixed list instead
//!   of a filesystem.
//! - **Agreement**: the page size is read in exactly one stage, so the index
//!   document's page count can never disagree with what generation produces.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Stage 1 — URL sources (built-site walk, TOML manifest, in-memory) and the canonical ordering rule |
//! | [`paginate`] | Stage 2 — page counting, slicing, and defensive `page` parameter coercion |
//! | [`render`] | Stage 3 — sitemaps.org XML: `urlset`, `sitemapindex`, the empty document |
//! | [`generate`] | Orchestration — per-domain [`generate::Generator`], bulk [`generate::regenerate_all`] |
//! | [`cache`] | On-disk XML cache: atomic per-document writes, content-hash change detection |
//! | [`config`] | `sitemapper.toml` loading, validation, stock config printing |
//! | [`http`] | Header contract (Cache-Control, Content-Type) for whatever serves the XML |
//! | [`output`] | CLI output formatting — per-domain reports and the regeneration summary |
//!
//! # Design Decisions
//!
//! ## Empty Is Not An Error
//!
//! An out-of-range or unparseable `page` value yields a minimal valid empty
//! `<urlset>`, never an error. Crawlers hit stale page URLs all the time
//! (an old index kept a reference to a page that no longer exists); serving
//! a valid empty document is the protocol-conformant answer. Only a failing
//! content source is an actual error.
//!
//! ## One Page, No Index
//!
//! When every URL fits in a single page, `/sitemap.xml` serves that page's
//! `<urlset>` directly. A `<sitemapindex>` appears only once the set spans
//! multiple pages — small sites get one self-contained document, large
//! sites get an index plus pages, and both are valid protocol documents.
//!
//! ## Atomic Cache, Last Writer Wins
//!
//! Regeneration writes each document via temp-file-and-rename, so a reader
//! concurrent with a regeneration sees fully-old or fully-new bytes, never
//! a torn file. Two regenerations racing resolve to last-writer-wins with
//! no locking — both render from the same content state, so either result
//! is correct. Unchanged documents (same content hash) are not rewritten,
//! which keeps back-to-back regenerations byte-identical on disk.
//!
//! ## Domains Are Independent
//!
//! Each configured domain has its own source, cache directory, and result
//! record. A domain whose source fails reports the failure in its
//! [`generate::DomainResult`] and leaves every other domain's cached output
//! untouched.

pub mod cache;
pub mod collect;
pub mod config;
pub mod generate;
pub mod http;
pub mod output;
pub mod paginate;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
