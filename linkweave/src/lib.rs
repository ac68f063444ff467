pub mod handlers;
pub mod prompt;

// Re-export commonly used handler functions for convenience
pub use handlers::{crawl_options_from_args, infer_format, resolve_output_path};
pub use prompt::{InputError, parse_max_depth, parse_seed_url, prompt_max_depth, prompt_seed_url};

// Re-export crawl functionality from linkweave-core
pub use linkweave_core::crawl::{CrawlOptions, FetchErrorPolicy, execute_crawl};
