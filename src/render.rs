//! Sitemap-protocol XML rendering.
//!
//! Produces the two document kinds of the sitemaps.org protocol:
//!
//! - **urlset**: one `<url>` per [`UrlEntry`](crate::collect::UrlEntry), with
//!   the required `<loc>` and optional `<lastmod>`/`<changefreq>`/`<priority>`
//! - **sitemapindex**: one `<sitemap>` per non-empty page, each pointing at
//!   the paged endpoint (`sitemap.xml?page=N`)
//!
//! ## Determinism
//!
//! Rendering is a pure function of its arguments: no clocks, no randomness,
//! fixed `\n` separators, fixed attribute order. Identical input yields
//! byte-identical output, which is what makes regeneration idempotent and
//! cached documents comparable by content hash.
//!
//! ## Why no XML library
//!
//! The protocol surface is four element names and one namespace attribute.
//! Documents are assembled with `push_str` and a five-entity escaper, the same
//! way static site generators in the wild emit their sitemaps. A streaming
//! XML writer would add a dependency to avoid a dozen lines of formatting.

use crate::collect::UrlEntry;

/// Namespace required on both `urlset` and `sitemapindex` roots.
const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escape the five XML-significant characters for element content.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Join a base URL and a site-relative path into an absolute `<loc>` value.
///
/// `base_url` is normalized (no trailing slash) by config loading; the path
/// may or may not carry a leading slash.
fn absolute_url(base_url: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{}/", base_url)
    } else {
        format!("{}/{}", base_url, path)
    }
}

/// Render a `<urlset>` document for one page's entries.
///
/// Optional per-entry fields are emitted only when present. Priority is
/// formatted to one decimal place, the conventional sitemap notation.
pub fn render_urlset(base_url: &str, entries: &[UrlEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_XMLNS));
    xml.push('\n');
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&absolute_url(base_url, &entry.path))
        ));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
        }
        if let Some(changefreq) = &entry.changefreq {
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                escape_xml(changefreq)
            ));
        }
        if let Some(priority) = entry.priority {
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", priority));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render the `<sitemapindex>` document referencing `page_count` pages.
///
/// Each `<sitemap>` entry points at the paged endpoint under `base_url`.
pub fn render_index(base_url: &str, page_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!(r#"<sitemapindex xmlns="{}">"#, SITEMAP_XMLNS));
    xml.push('\n');
    for page in 0..page_count {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!(
            "    <loc>{}/sitemap.xml?page={}</loc>\n",
            escape_xml(base_url),
            page
        ));
        xml.push_str("  </sitemap>\n");
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// Render the minimal valid empty `<urlset>`.
///
/// Served for out-of-range or unparseable page requests — a data condition,
/// never an error surfaced to the caller.
pub fn render_empty() -> String {
    format!(
        "{}\n<urlset xmlns=\"{}\">\n</urlset>\n",
        XML_DECL, SITEMAP_XMLNS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::UrlEntry;

    fn entry(path: &str) -> UrlEntry {
        UrlEntry {
            path: path.to_string(),
            lastmod: None,
            changefreq: None,
            priority: None,
            section: String::new(),
        }
    }

    // =========================================================================
    // escape_xml
    // =========================================================================

    #[test]
    fn escapes_all_five_entities() {
        assert_eq!(
            escape_xml(r#"a&b<c>d"e'f"#),
            "a&amp;b&lt;c&gt;d&quot;e&apos;f"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_xml("products/page-1"), "products/page-1");
    }

    // =========================================================================
    // render_urlset
    // =========================================================================

    #[test]
    fn urlset_contains_loc_per_entry() {
        let xml = render_urlset("https://example.com", &[entry("a"), entry("b/c")]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<loc>https://example.com/a</loc>"));
        assert!(xml.contains("<loc>https://example.com/b/c</loc>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn root_path_renders_trailing_slash() {
        let xml = render_urlset("https://example.com", &[entry("")]);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
    }

    #[test]
    fn leading_slash_in_path_is_not_doubled() {
        let xml = render_urlset("https://example.com", &[entry("/about")]);
        assert!(xml.contains("<loc>https://example.com/about</loc>"));
    }

    #[test]
    fn optional_fields_emitted_when_present() {
        let mut e = entry("news");
        e.lastmod = Some("2026-08-01".to_string());
        e.changefreq = Some("daily".to_string());
        e.priority = Some(0.8);
        let xml = render_urlset("https://example.com", &[e]);
        assert!(xml.contains("<lastmod>2026-08-01</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn optional_fields_omitted_when_absent() {
        let xml = render_urlset("https://example.com", &[entry("about")]);
        assert!(!xml.contains("<lastmod>"));
        assert!(!xml.contains("<changefreq>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn url_with_ampersand_is_escaped() {
        let xml = render_urlset("https://example.com", &[entry("search?a=1&b=2")]);
        assert!(xml.contains("<loc>https://example.com/search?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn urlset_is_byte_identical_across_calls() {
        let entries = vec![entry("a"), entry("b")];
        assert_eq!(
            render_urlset("https://example.com", &entries),
            render_urlset("https://example.com", &entries)
        );
    }

    // =========================================================================
    // render_index
    // =========================================================================

    #[test]
    fn index_lists_one_sitemap_per_page() {
        let xml = render_index("https://example.com", 3);
        assert_eq!(xml.matches("<sitemap>").count(), 3);
        assert!(xml.contains("<loc>https://example.com/sitemap.xml?page=0</loc>"));
        assert!(xml.contains("<loc>https://example.com/sitemap.xml?page=2</loc>"));
        assert!(xml.ends_with("</sitemapindex>\n"));
    }

    #[test]
    fn index_with_zero_pages_has_no_entries() {
        let xml = render_index("https://example.com", 0);
        assert!(!xml.contains("<sitemap>"));
        assert!(xml.contains("<sitemapindex"));
    }

    // =========================================================================
    // render_empty
    // =========================================================================

    #[test]
    fn empty_document_is_schema_shaped() {
        let xml = render_empty();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.ends_with("</urlset>\n"));
        assert!(!xml.contains("<url>"));
    }
}
