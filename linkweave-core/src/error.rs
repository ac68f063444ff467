use linkweave_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ScanError,
    },

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Max depth {0} is out of range (0-{max})", max = crate::budget::MAX_DEPTH_LIMIT)]
    InvalidDepth(u8),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
