use colored::Colorize;

pub mod budget;
pub mod crawl;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod registry;
pub mod report;

pub use crawl::{CrawlMap, CrawlOptions, CrawlSession, CrawlSummary, FetchErrorPolicy};
pub use error::CrawlError;
pub use graph::{LinkGraph, NodeId, NodeKind};
pub use registry::NodeRegistry;

pub fn print_banner() {
    let banner = r#"
   ╻  ╻┏┓╻╻┏ ╻ ╻┏━╸┏━┓╻ ╻┏━╸
   ┃  ┃┃┗┫┣┻┓┃╻┃┣╸ ┣━┫┃┏┛┣╸
   ┗━╸╹╹ ╹╹ ╹┗┻┛┗━╸╹ ╹┗┛ ┗━╸"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "   {} {}\n",
        "map how pages link to each other".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
