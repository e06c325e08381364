//! CLI output formatting.
//!
//! # Format
//!
//! ## Check
//!
//! ```text
//! main (https://example.com)
//!     Source: dist/
//!     120 URLs over 1 page
//! docs (https://docs.example.com)
//!     Source: docs-urls.toml
//!     5000 URLs over 5 pages
//! ```
//!
//! ## Generate
//!
//! ```text
//! main (https://example.com)
//!     120 URLs over 1 page
//!     Cache: 2 written
//! staging (https://staging.example.com)
//!     FAILED: source directory does not exist: staging-dist
//!
//! Regenerated sitemaps for 1 domain with 120 total URLs (1 failed).
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::config::DomainConfig;
use crate::generate::DomainResult;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page` / `3 pages` — counts read poorly without number agreement.
fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Header line for a domain: name plus base URL.
fn domain_header(name: &str, base_url: &str) -> String {
    format!("{} ({})", name, base_url)
}

/// Describe a domain's configured source for the check display.
fn source_label(domain: &DomainConfig) -> String {
    match (&domain.html_dir, &domain.manifest) {
        (Some(dir), _) => format!("{}/", dir.trim_end_matches('/')),
        (_, Some(manifest)) => manifest.clone(),
        (None, None) => "(no source)".to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the `check` inventory: per-domain source and URL/page counts.
///
/// `counts` pairs with `domains` positionally; a failed collection carries
/// the error string instead.
pub fn format_check_output(
    domains: &[DomainConfig],
    counts: &[Result<(usize, usize), String>],
) -> Vec<String> {
    let mut lines = Vec::new();
    for (domain, count) in domains.iter().zip(counts) {
        lines.push(domain_header(&domain.name, &domain.base_url));
        lines.push(format!("{}Source: {}", indent(1), source_label(domain)));
        match count {
            Ok((urls, pages)) => lines.push(format!(
                "{}{} over {}",
                indent(1),
                pluralize(*urls, "URL"),
                pluralize(*pages, "page")
            )),
            Err(err) => lines.push(format!("{}FAILED: {}", indent(1), err)),
        }
    }
    lines
}

pub fn print_check_output(domains: &[DomainConfig], counts: &[Result<(usize, usize), String>]) {
    for line in format_check_output(domains, counts) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the regeneration report: per-domain detail plus the summary line.
pub fn format_generate_output(results: &[DomainResult], base_urls: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (result, base_url) in results.iter().zip(base_urls) {
        lines.push(domain_header(&result.domain, base_url));
        match &result.error {
            None => {
                lines.push(format!(
                    "{}{} over {}",
                    indent(1),
                    pluralize(result.urls, "URL"),
                    pluralize(result.pages, "page")
                ));
                lines.push(format!("{}Cache: {}", indent(1), result.stats));
            }
            Some(err) => lines.push(format!("{}FAILED: {}", indent(1), err)),
        }
    }

    let succeeded: Vec<&DomainResult> = results.iter().filter(|r| r.error.is_none()).collect();
    let failed = results.len() - succeeded.len();
    let total_urls: usize = succeeded.iter().map(|r| r.urls).sum();
    let mut summary = format!(
        "Regenerated sitemaps for {} with {} total URLs",
        pluralize(succeeded.len(), "domain"),
        total_urls
    );
    if failed > 0 {
        summary.push_str(&format!(" ({} failed)", failed));
    }
    summary.push('.');
    lines.push(String::new());
    lines.push(summary);
    lines
}

pub fn print_generate_output(results: &[DomainResult], base_urls: &[String]) {
    for line in format_generate_output(results, base_urls) {
        println!("{}", line);
    }
}
