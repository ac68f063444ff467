use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a single page fetch produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    /// Raw `href` values of every `<a>` element, in document order.
    /// Anchors without an `href` attribute appear as empty strings.
    pub hrefs: Vec<String>,
}

impl FetchedPage {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            hrefs: Vec::new(),
        }
    }
}
