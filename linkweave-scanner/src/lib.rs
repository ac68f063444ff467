pub mod error;
pub mod extractor;
pub mod result;

pub use error::ScanError;
pub use extractor::{HttpLinkExtractor, LinkExtractor, StaticLinkExtractor};
pub use result::FetchedPage;
