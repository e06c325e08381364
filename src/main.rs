use clap::{Parser, Subcommand};
use sitemapper::cache::{DocKey, SitemapCache};
use sitemapper::paginate::{PageRequest, parse_page_param};
use sitemapper::{config, generate, output, render};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitemapper")]
#[command(about = "Multi-domain sitemap generator for static sites")]
#[command(long_about = "\
Multi-domain sitemap generator for static sites

Declare your domains in sitemapper.toml; each gets its own sitemap set
(index + fixed-size pages) written into the cache directory, ready to be
served at /sitemap.xml and /sitemap.xml?page=N.

Configuration:

  sitemapper.toml
  ├── page_size = 1000             # Entries per sitemap page
  ├── cache_lifetime = 86400       # Seconds serving layers may cache (0 = don't)
  ├── [defaults]                   # Optional changefreq/priority fill-ins
  ├── [[domains]]
  │   ├── name = \"main\"
  │   ├── base_url = \"https://example.com\"
  │   └── html_dir = \"dist\"        # Walk a built site for HTML files...
  └── [[domains]]
      └── manifest = \"urls.toml\"   # ...or list URLs explicitly

Cache layout (one directory per domain):

  sitemaps/
  └── main/
      ├── sitemap.xml              # Index document (or sole page)
      ├── sitemap-0.xml            # Page documents
      └── sitemap-1.xml

Pagination is deterministic: for an unchanged URL set every URL stays on
the same page across regenerations, and regenerating twice produces
byte-identical files.

Run 'sitemapper gen-config' to print a documented sitemapper.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "sitemapper.toml", global = true)]
    config: PathBuf,

    /// Cache directory for generated XML
    #[arg(long, default_value = "sitemaps", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate cached sitemaps for every configured domain
    Generate {
        /// Emit per-domain results as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Print one domain's sitemap document to stdout
    Page {
        /// Domain name from the config file
        #[arg(long)]
        domain: String,
        /// Raw page value, as it would appear in ?page=... (omit for the index)
        #[arg(long)]
        page: Option<String>,
        /// Serve the cached document instead of generating fresh
        #[arg(long)]
        from_cache: bool,
    },
    /// Validate config and report per-domain URL/page counts without writing
    Check,
    /// Print a stock sitemapper.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // gen-config must work without an existing config file
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::SitemapConfig::load(&cli.config)?;
    let base_dir = cli
        .config
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Command::Generate { json } => {
            let cache = SitemapCache::new(&cli.output);
            let results = generate::regenerate_all(&config, &base_dir, &cache);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let base_urls: Vec<String> =
                    config.domains.iter().map(|d| d.base_url.clone()).collect();
                output::print_generate_output(&results, &base_urls);
            }
        }
        Command::Page {
            domain,
            page,
            from_cache,
        } => {
            let domain_config = config
                .domains
                .iter()
                .find(|d| d.name == domain)
                .ok_or_else(|| format!("no domain named '{}' in {}", domain, cli.config.display()))?;
            let request = parse_page_param(page.as_deref());
            if from_cache {
                let cache = SitemapCache::new(&cli.output);
                let key = match request {
                    PageRequest::Index => Some(DocKey::Index),
                    PageRequest::Page(n) => Some(DocKey::Page(n)),
                    PageRequest::Invalid => None,
                };
                let xml = match key.and_then(|k| cache.get(&domain, k)) {
                    Some(xml) => xml,
                    None if matches!(request, PageRequest::Invalid) => render::render_empty(),
                    None => {
                        return Err(format!(
                            "document not cached for domain '{}'; run 'sitemapper generate' first",
                            domain
                        )
                        .into());
                    }
                };
                print!("{}", xml);
            } else {
                let generator =
                    generate::Generator::for_domain(domain_config, &config, &base_dir);
                print!("{}", generator.sitemap(request)?);
            }
        }
        Command::Check => {
            let counts: Vec<Result<(usize, usize), String>> = config
                .domains
                .iter()
                .map(|d| {
                    generate::Generator::for_domain(d, &config, &base_dir)
                        .inventory()
                        .map_err(|e| e.to_string())
                })
                .collect();
            output::print_check_output(&config.domains, &counts);
            if counts.iter().any(|c| c.is_err()) {
                return Err("one or more domains failed the check".into());
            }
        }
        Command::GenConfig => unreachable!("handled above"),
    }

    Ok(())
}
