// Report generation and rendering of a finished crawl map

use crate::crawl::{CrawlMap, CrawlSummary};
use crate::error::{CrawlError, Result};
use crate::graph::{NodeId, NodeKind};
use crate::normalize::extract_url_path;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Dot,
    Svg,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "dot" | "gv" | "graphviz" => Some(ReportFormat::Dot),
            "svg" => Some(ReportFormat::Svg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Dot => "dot",
            ReportFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub seed: String,
    pub max_depth: u8,
    pub depth_reached: u32,
    pub pages_crawled: usize,
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub summary: SummaryExport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExport {
    pub id: NodeId,
    pub url: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryExport {
    pub external: usize,
    pub internal: usize,
    pub total: usize,
}

impl From<CrawlSummary> for SummaryExport {
    fn from(summary: CrawlSummary) -> Self {
        Self {
            external: summary.external,
            internal: summary.internal,
            total: summary.total,
        }
    }
}

impl GraphExport {
    pub fn from_map(map: &CrawlMap) -> Self {
        let nodes = map
            .registry
            .iter()
            .map(|(id, url)| NodeExport {
                id,
                url: url.to_string(),
                kind: map.kind_of(id),
            })
            .collect();

        Self {
            seed: map.seed_url.clone(),
            max_depth: map.max_depth,
            depth_reached: map.depth_reached,
            pages_crawled: map.pages_crawled,
            nodes,
            edges: map.graph.edges(),
            summary: map.summary().into(),
        }
    }
}

/// The three closing summary lines.
pub fn generate_summary(summary: &CrawlSummary) -> String {
    format!(
        "[+] External links: {}\n[+] Internal links: {}\n[+] Total links: {}\n",
        summary.external, summary.internal, summary.total
    )
}

pub fn generate_text_report(map: &CrawlMap) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          LINKWEAVE CRAWL REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Seed:          {}\n", map.seed_url));
    report.push_str(&format!("Max depth:     {}\n", map.max_depth));
    report.push_str(&format!("Depth reached: {}\n", map.depth_reached));
    report.push_str(&format!("Pages fetched: {}\n", map.pages_crawled));
    report.push_str(&format!(
        "Graph:         {} nodes, {} edges\n",
        map.graph.node_count(),
        map.graph.edge_count()
    ));
    if !map.failed_pages.is_empty() {
        report.push_str(&format!("Failed pages:  {}\n", map.failed_pages.len()));
        for url in &map.failed_pages {
            report.push_str(&format!("  ✗ {}\n", url));
        }
    }
    report.push('\n');

    report.push_str(RULE);
    report.push_str("\nNODES\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    for (id, url) in map.registry.iter() {
        let kind = map.kind_of(id);
        let neighbors = map
            .graph
            .neighbors(id)
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        report.push_str(&format!("[{:>3}] {:<8} {}\n", id, kind.as_str(), url));
        if kind == NodeKind::Internal {
            report.push_str(&format!("      path: {}\n", extract_url_path(url)));
        }
        if !neighbors.is_empty() {
            report.push_str(&format!("      links: {}\n", neighbors));
        }
    }
    report.push('\n');

    report.push_str(RULE);
    report.push('\n');
    report.push_str(&generate_summary(&map.summary()));

    report
}

pub fn generate_json_report(map: &CrawlMap) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&GraphExport::from_map(map))
}

/// Graphviz source: nodes coloured by classification and a legend cluster.
pub fn generate_dot_report(map: &CrawlMap) -> String {
    let mut dot = String::new();
    dot.push_str("graph linkweave {\n");
    dot.push_str("    node [shape=circle, style=filled, fontsize=10];\n");

    for (id, url) in map.registry.iter() {
        let kind = map.kind_of(id);
        dot.push_str(&format!(
            "    \"{}\" [label=\"{}\", fillcolor=\"{}\", tooltip=\"{}\"];\n",
            id,
            id,
            kind.color(),
            escape_dot(url)
        ));
    }

    for (a, b) in map.graph.edges() {
        dot.push_str(&format!("    \"{}\" -- \"{}\";\n", a, b));
    }

    dot.push_str("    subgraph cluster_legend {\n");
    dot.push_str("        label=\"Legend\";\n");
    for kind in [NodeKind::Seed, NodeKind::External, NodeKind::Internal] {
        dot.push_str(&format!(
            "        \"legend_{}\" [label=\"{}\", shape=box, fillcolor=\"{}\"];\n",
            kind.as_str(),
            kind.legend_label(),
            kind.color()
        ));
    }
    dot.push_str("    }\n");
    dot.push_str("}\n");
    dot
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Lay out DOT source as SVG with the Graphviz `dot` binary.
pub async fn render_svg(dot_source: &str) -> Result<Vec<u8>> {
    let mut child = Command::new("dot")
        .arg("-Tsvg")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CrawlError::Render(format!("could not start graphviz `dot`: {}", e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot_source.as_bytes()).await?;
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(CrawlError::Render(format!(
            "graphviz `dot` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output.stdout)
}

/// Render `map` in `format`.
pub async fn render_report(map: &CrawlMap, format: ReportFormat) -> Result<Vec<u8>> {
    Ok(match format {
        ReportFormat::Text => generate_text_report(map).into_bytes(),
        ReportFormat::Json => generate_json_report(map)?.into_bytes(),
        ReportFormat::Dot => generate_dot_report(map).into_bytes(),
        ReportFormat::Svg => render_svg(&generate_dot_report(map)).await?,
    })
}

pub fn save_report(content: &[u8], path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot(r#"http://a.com/"q"\x"#), r#"http://a.com/\"q\"\\x"#);
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Dot.extension(), "dot");
    }
}
