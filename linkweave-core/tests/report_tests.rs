// Tests for summary and report rendering

use linkweave_core::budget::LinkBudgetMode;
use linkweave_core::crawl::{CrawlMap, CrawlOptions, CrawlSummary, execute_crawl};
use linkweave_core::report::{
    GraphExport, ReportFormat, generate_dot_report, generate_json_report, generate_summary,
    generate_text_report, render_report, save_report,
};
use linkweave_scanner::StaticLinkExtractor;
use tempfile::TempDir;

async fn sample_map() -> CrawlMap {
    let extractor = StaticLinkExtractor::new().with_page(
        "http://example.com",
        ["/a", "http://other.com/x", "/a", "/say?to=you"],
    );
    let options = CrawlOptions {
        max_depth: 1,
        link_budget: LinkBudgetMode::Fixed(100.0),
        ..CrawlOptions::default()
    };
    execute_crawl("http://example.com", extractor, options, None, None)
        .await
        .unwrap()
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("dot"), Some(ReportFormat::Dot));
    assert_eq!(ReportFormat::from_str("graphviz"), Some(ReportFormat::Dot));
    assert_eq!(ReportFormat::from_str("Svg"), Some(ReportFormat::Svg));
    assert_eq!(ReportFormat::from_str("pdf"), None);
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_generate_summary_three_lines() {
    let summary = CrawlSummary {
        external: 1,
        internal: 2,
        total: 3,
    };

    assert_eq!(
        generate_summary(&summary),
        "[+] External links: 1\n[+] Internal links: 2\n[+] Total links: 3\n"
    );
}

#[tokio::test]
async fn test_summary_of_sample_crawl() {
    let map = sample_map().await;
    let summary = map.summary();

    assert_eq!(summary.internal, 2);
    assert_eq!(summary.external, 1);
    assert_eq!(summary.total, 3);
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[tokio::test]
async fn test_text_report_lists_nodes_and_summary() {
    let map = sample_map().await;
    let report = generate_text_report(&map);

    assert!(report.contains("Seed:          http://example.com"));
    assert!(report.contains("seed"));
    assert!(report.contains("http://other.com/x"));
    assert!(report.contains("path: /a"));
    assert!(report.contains("links: 1, 2, 3"));
    assert!(report.ends_with("[+] Total links: 3\n"));
}

#[tokio::test]
async fn test_json_report_round_trips() {
    let map = sample_map().await;
    let json = generate_json_report(&map).unwrap();
    let export: GraphExport = serde_json::from_str(&json).unwrap();

    assert_eq!(export.nodes.len(), 4);
    assert_eq!(export.edges.len(), 3);
    assert_eq!(export.summary.total, 3);
    assert!(json.contains("\"kind\": \"seed\""));
    assert!(json.contains("\"kind\": \"external\""));
}

#[tokio::test]
async fn test_dot_report_colours_and_legend() {
    let map = sample_map().await;
    let dot = generate_dot_report(&map);

    assert!(dot.starts_with("graph linkweave {"));
    assert!(dot.contains("\"0\" [label=\"0\", fillcolor=\"green\""));
    assert!(dot.contains("\"1\" [label=\"1\", fillcolor=\"blue\""));
    assert!(dot.contains("\"2\" [label=\"2\", fillcolor=\"yellow\""));
    assert!(dot.contains("\"0\" -- \"1\";"));
    assert!(dot.contains("subgraph cluster_legend"));
    assert!(dot.contains("label=\"Seed link\""));
    assert!(dot.contains("label=\"External link\""));
    assert!(dot.contains("label=\"Internal link\""));
    assert!(dot.contains("tooltip=\"http://example.com/say\""));
}

#[tokio::test]
async fn test_render_and_save_report() {
    let map = sample_map().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crawl.json");

    let content = render_report(&map, ReportFormat::Json).await.unwrap();
    save_report(&content, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("http://other.com/x"));
}
