use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const DEFAULT_LOGO_SERVICE: &str = "https://logo.clearbit.com";
const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// `<link rel>` variants in priority order: high-res icons first.
const ICON_SELECTORS: &[&str] = &[
    r#"link[rel="apple-touch-icon"]"#,
    r#"link[rel="icon"][sizes="192x192"]"#,
    r#"link[rel="icon"][type="image/png"]"#,
    r#"link[rel="shortcut icon"]"#,
    r#"link[rel="icon"]"#,
];

/// Conventional favicon locations probed when the HTML names none.
const COMMON_PATHS: &[&str] = &[
    "/favicon.ico",
    "/favicon.png",
    "/apple-touch-icon.png",
    "/assets/favicon.ico",
    "/static/favicon.ico",
];

const IMAGE_EXTENSIONS: &[&str] = &[".ico", ".png", ".jpg", ".jpeg", ".svg", ".gif", ".webp"];

/// TLDs where the apex domain keeps three labels (example.co.uk).
const TWO_PART_TLDS: &[&str] = &["co.uk", "com.au", "co.nz", "co.za", "com.br"];

pub struct LogoResolverConfig {
    /// Scheme used for domain-relative probes; tests point this at http.
    pub probe_scheme: String,
    pub logo_service: String,
    pub favicon_service: String,
    pub timeout: Duration,
}

impl Default for LogoResolverConfig {
    fn default() -> Self {
        Self {
            probe_scheme: "https".to_string(),
            logo_service: DEFAULT_LOGO_SERVICE.to_string(),
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

/// Resolves a logo URL through an ordered fallback chain. The final tier is
/// constructed without a probe, so `resolve` always returns a usable URL.
pub struct LogoResolver {
    client: Client,
    config: LogoResolverConfig,
}

impl LogoResolver {
    pub fn new() -> Self {
        Self::with_config(LogoResolverConfig::default())
    }

    pub fn with_config(config: LogoResolverConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    /// Resolve a logo URL for `domain`, consulting the page HTML first.
    /// Probe failures fall through to the next tier; tier 4 cannot fail.
    pub async fn resolve(&self, domain: &str, html_source: &str) -> String {
        if let Some(url) = icon_from_html(domain, html_source) {
            return url;
        }
        if let Some(url) = self.probe_common_paths(domain).await {
            return url;
        }
        if let Some(url) = self.probe_logo_service(domain).await {
            return url;
        }
        self.favicon_url(domain)
    }

    async fn probe_common_paths(&self, domain: &str) -> Option<String> {
        for path in COMMON_PATHS {
            let url = format!("{}://{}{}", self.config.probe_scheme, domain, path);
            if self.head_ok(&url).await {
                return Some(url);
            }
        }
        None
    }

    async fn probe_logo_service(&self, domain: &str) -> Option<String> {
        let url = format!("{}/{}", self.config.logo_service, root_domain(domain));
        if self.head_ok(&url).await {
            Some(url)
        } else {
            None
        }
    }

    /// Tier 4: no probe, so the non-empty postcondition always holds.
    fn favicon_url(&self, domain: &str) -> String {
        format!(
            "{}?sz=128&domain={}",
            self.config.favicon_service,
            root_domain(domain)
        )
    }

    /// Timeouts, connection errors and non-200s all count as probe failure.
    async fn head_ok(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!("probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

/// Tier 1: icon links and og:image from the page itself. Pure parse, no
/// network.
fn icon_from_html(domain: &str, html_source: &str) -> Option<String> {
    let doc = Html::parse_document(html_source);

    for sel_str in ICON_SELECTORS {
        let sel = Selector::parse(sel_str).unwrap();
        for el in doc.select(&sel) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if let Some(abs) = absolutize(domain, href) {
                if looks_like_image(&abs) && is_absolute_url(&abs) {
                    return Some(abs);
                }
            }
        }
    }

    let og_sel = Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    if let Some(el) = doc.select(&og_sel).next() {
        if let Some(content) = el.value().attr("content") {
            let content = content.trim();
            if is_absolute_url(content) {
                return Some(content.to_string());
            }
        }
    }

    None
}

/// Resolve relative and protocol-relative hrefs against the domain.
fn absolutize(domain: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Some(rest) = href.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    if href.starts_with('/') {
        return Some(format!("https://{}{}", domain, href));
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    let base = Url::parse(&format!("https://{}/", domain)).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

fn looks_like_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

fn is_absolute_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// Strip subdomains down to the registrable apex, keeping three labels for
/// known two-part TLDs: www.example.com -> example.com,
/// shop.example.co.uk -> example.co.uk.
pub fn root_domain(domain: &str) -> String {
    let domain = domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let domain = domain.split('/').next().unwrap_or(domain);

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 3 {
        let last_two = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if TWO_PART_TLDS.contains(&last_two.as_str()) {
            return parts[parts.len() - 3..].join(".");
        }
    }
    if parts.len() > 1 {
        parts[parts.len() - 2..].join(".")
    } else {
        domain.to_string()
    }
}

// ── Tests ──
