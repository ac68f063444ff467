use crate::error::{Result, ScanError};
use crate::result::FetchedPage;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Source of raw anchor hrefs for a page.
///
/// The crawl engine only ever needs "given a URL, the hrefs on that page in
/// document order". Implementations decide how the page is obtained.
pub trait LinkExtractor {
    fn fetch_links(&self, url: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

pub struct HttpLinkExtractor {
    client: Client,
}

impl HttpLinkExtractor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Linkweave/0.1 (https://github.com/trapdoorsec/linkweave)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and collect every anchor on it along with response metadata.
    ///
    /// The body is parsed whatever the status code or content type, so error
    /// pages still contribute their links.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        debug!("Fetching {}", url);

        let parsed_url =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        let start = Instant::now();
        let response = self.client.get(parsed_url).send().await?;
        let response_time = start.elapsed();

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = response.content_length();

        let body = response.text().await?;

        let mut page = FetchedPage::new(url.to_string());
        page.status_code = status_code;
        page.content_type = content_type;
        page.content_length = content_length;
        page.response_time = response_time;
        page.hrefs = extract_hrefs(&body)?;

        debug!(
            "Fetched {} ({} in {:?}, {} anchors)",
            url,
            status_code,
            response_time,
            page.hrefs.len()
        );

        Ok(page)
    }
}

impl LinkExtractor for HttpLinkExtractor {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>> {
        Ok(self.fetch_page(url).await?.hrefs)
    }
}

/// Raw href of every `<a>` in document order. Missing attributes become `""`.
pub fn extract_hrefs(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let anchor_selector =
        Selector::parse("a").map_err(|e| ScanError::ParseError(e.to_string()))?;

    Ok(document
        .select(&anchor_selector)
        .map(|element| element.value().attr("href").unwrap_or("").to_string())
        .collect())
}

/// Pages served from memory, keyed by exact URL.
///
/// Useful for replaying a known site offline. A URL with no entry fails the
/// same way an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct StaticLinkExtractor {
    pages: HashMap<String, Vec<String>>,
}

impl StaticLinkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page<I, S>(mut self, url: &str, hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_page(url, hrefs);
        self
    }

    pub fn insert_page<I, S>(&mut self, url: &str, hrefs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages
            .insert(url.to_string(), hrefs.into_iter().map(Into::into).collect());
    }
}

impl LinkExtractor for StaticLinkExtractor {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::UnknownPage(url.to_string()))
    }
}
