//! URL cleanup and same-domain classification.
//!
//! Every URL that enters the node registry goes through [`normalize`], so two
//! hrefs that differ only in query string or fragment collapse onto one node.

use url::{Position, Url};

/// Resolve `raw_href` against `base_url` and drop its query and fragment.
///
/// Returns `None` for hrefs that should be skipped: empty or blank values,
/// hrefs that do not resolve, and anything that is not http(s) once resolved
/// (`mailto:`, `javascript:`, `tel:` and friends).
pub fn normalize(raw_href: &str, base_url: &str) -> Option<String> {
    let href = raw_href.trim();
    if href.is_empty() {
        return None;
    }

    let base = Url::parse(base_url).ok()?;
    let resolved = base.join(href).ok()?;
    strip(resolved)
}

/// Normalize an absolute URL such as the crawl seed.
pub fn normalize_absolute(url: &str) -> Option<String> {
    strip(Url::parse(url.trim()).ok()?)
}

fn strip(mut url: Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.into())
}

/// Network location of `url`: host plus the port when one is written.
///
/// Unparseable input yields an empty string.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .filter(|u| u.has_host())
        .map(|u| u[Position::BeforeHost..Position::AfterPort].to_string())
        .unwrap_or_default()
}

/// Same-domain heuristic: `domain` only has to appear inside the network
/// location of `url`, so subdomains count as internal.
pub fn is_internal(url: &str, domain: &str) -> bool {
    domain_of(url).contains(domain)
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}
