use crate::budget::{
    DEFAULT_VISIT_BUDGET, DepthTracker, LinkBudgetMode, LinkBudgetSource, MAX_DEPTH_LIMIT,
};
use crate::error::{CrawlError, Result};
use crate::graph::{LinkGraph, NodeId, NodeKind};
use crate::normalize::{domain_of, is_internal, normalize, normalize_absolute};
use crate::registry::NodeRegistry;
use linkweave_scanner::LinkExtractor;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_depth: u8,
    /// Visit budget of the seed page.
    pub root_visit_budget: u32,
    /// Visit budget handed to every child page.
    pub child_visit_budget: u32,
    pub link_budget: LinkBudgetMode,
    pub fetch_error_policy: FetchErrorPolicy,
}

impl CrawlOptions {
    pub fn new(max_depth: u8) -> Result<Self> {
        let options = Self {
            max_depth,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(CrawlError::InvalidDepth(self.max_depth));
        }
        Ok(())
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            root_visit_budget: DEFAULT_VISIT_BUDGET,
            child_visit_budget: DEFAULT_VISIT_BUDGET,
            link_budget: LinkBudgetMode::default(),
            fetch_error_policy: FetchErrorPolicy::Abort,
        }
    }
}

/// What to do when a page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchErrorPolicy {
    /// Stop the whole crawl with the fetch error
    #[default]
    Abort,
    /// Log the failure, keep the node, and move on to the next page
    Skip,
}

/// A URL that got its own node.
#[derive(Debug, Clone, Serialize)]
pub struct Discovery {
    pub id: NodeId,
    pub url: String,
    pub kind: NodeKind,
    pub parent: NodeId,
    /// First time this URL entered its internal/external set.
    pub first_sighting: bool,
}

/// Callback for every newly created node
pub type DiscoveryCallback = Arc<dyn Fn(&Discovery) + Send + Sync>;

/// Callback for reporting crawl progress: pages fetched so far and the page
/// about to be fetched
pub type PageCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// A page waiting to be crawled.
#[derive(Debug, Clone)]
struct CrawlTask {
    url: String,
    node: NodeId,
    visit_budget: u32,
}

/// Everything a finished crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlMap {
    pub seed_url: String,
    pub max_depth: u8,
    pub registry: NodeRegistry,
    pub graph: LinkGraph,
    pub internal_urls: BTreeSet<String>,
    pub external_urls: BTreeSet<String>,
    pub depth_reached: u32,
    pub pages_crawled: usize,
    pub failed_pages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub external: usize,
    pub internal: usize,
    pub total: usize,
}

impl CrawlMap {
    pub fn summary(&self) -> CrawlSummary {
        let external = self.external_urls.len();
        let internal = self.internal_urls.len();
        CrawlSummary {
            external,
            internal,
            total: external + internal,
        }
    }

    /// Classification used for rendering: the seed node, then membership of
    /// the external set, everything else internal.
    pub fn kind_of(&self, id: NodeId) -> NodeKind {
        if id == NodeId::SEED {
            return NodeKind::Seed;
        }
        match self.registry.url_of(id) {
            Some(url) if self.external_urls.contains(url) => NodeKind::External,
            _ => NodeKind::Internal,
        }
    }
}

/// One crawl invocation: owns the registry, graph, counters and budgets.
///
/// The depth-first walk runs off an explicit LIFO stack of pending pages, so
/// pages are visited in the same order a recursive walk would visit them.
pub struct CrawlSession<E> {
    extractor: E,
    options: CrawlOptions,
    seed_url: String,
    link_budget: Box<dyn LinkBudgetSource>,
    registry: NodeRegistry,
    graph: LinkGraph,
    internal_urls: BTreeSet<String>,
    external_urls: BTreeSet<String>,
    depth: DepthTracker,
    pages_crawled: usize,
    failed_pages: Vec<String>,
    discovery_callback: Option<DiscoveryCallback>,
    page_callback: Option<PageCallback>,
}

impl<E: LinkExtractor> CrawlSession<E> {
    /// Start a session at `seed_url`, which becomes node 0.
    pub fn new(seed_url: &str, extractor: E, options: CrawlOptions) -> Result<Self> {
        options.validate()?;

        let seed_url = seed_url.trim();
        let normalized_seed = normalize_absolute(seed_url)
            .ok_or_else(|| CrawlError::InvalidSeed(seed_url.to_string()))?;

        let mut registry = NodeRegistry::new();
        registry.register(NodeId::SEED, &normalized_seed);

        let mut graph = LinkGraph::new();
        graph.add_node(NodeId::SEED, NodeKind::Seed);

        Ok(Self {
            extractor,
            link_budget: options.link_budget.into_source(),
            depth: DepthTracker::new(options.max_depth),
            options,
            seed_url: seed_url.to_string(),
            registry,
            graph,
            internal_urls: BTreeSet::new(),
            external_urls: BTreeSet::new(),
            pages_crawled: 0,
            failed_pages: Vec::new(),
            discovery_callback: None,
            page_callback: None,
        })
    }

    /// Replace the link budget source picked from the options.
    pub fn with_link_budget_source(mut self, source: Box<dyn LinkBudgetSource>) -> Self {
        self.link_budget = source;
        self
    }

    pub fn with_discovery_callback(mut self, callback: DiscoveryCallback) -> Self {
        self.discovery_callback = Some(callback);
        self
    }

    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    pub fn depth(&self) -> u32 {
        self.depth.depth()
    }

    /// Walk from the seed until every branch is exhausted or blocked by the
    /// depth ceiling.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Starting crawl of {} (max depth {})",
            self.seed_url, self.options.max_depth
        );

        let mut stack = vec![CrawlTask {
            url: self.seed_url.clone(),
            node: NodeId::SEED,
            visit_budget: self.options.root_visit_budget,
        }];

        while let Some(task) = stack.pop() {
            let links = match self.website_links(&task.url, task.node).await {
                Ok(links) => links,
                Err(e) if self.options.fetch_error_policy == FetchErrorPolicy::Skip => {
                    warn!("Skipping page: {}", e);
                    self.failed_pages.push(task.url);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.depth.observe(task.node) {
                debug!("Depth now {} (parent {})", self.depth.depth(), task.node);
            }

            if !self.depth.allows_descent() {
                debug!(
                    "Depth {} reached max {}, not descending from {}",
                    self.depth.depth(),
                    self.options.max_depth,
                    task.url
                );
                continue;
            }

            // Children go on the stack in reverse so the first one is crawled
            // next, along with its whole subtree, before the second.
            let child_budget = self.options.child_visit_budget;
            let children: Vec<CrawlTask> = links
                .into_iter()
                .take(task.visit_budget as usize)
                .map(|(node, url)| CrawlTask {
                    url,
                    node,
                    visit_budget: child_budget,
                })
                .collect();
            stack.extend(children.into_iter().rev());
        }

        info!(
            "Crawl complete. {} pages fetched, {} nodes, {} edges",
            self.pages_crawled,
            self.graph.node_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Fetch `url`, register every new link on it as a child of `parent_node`
    /// and wire cross edges to links that already have a node.
    ///
    /// Returns the new `(node, url)` pairs in page order.
    pub async fn website_links(
        &mut self,
        url: &str,
        parent_node: NodeId,
    ) -> Result<Vec<(NodeId, String)>> {
        if let Some(ref callback) = self.page_callback {
            callback(self.pages_crawled, url);
        }

        let domain_name = domain_of(url);
        let hrefs = self
            .extractor
            .fetch_links(url)
            .await
            .map_err(|source| CrawlError::Fetch {
                url: url.to_string(),
                source,
            })?;
        self.pages_crawled += 1;

        let mut link_budget = self.link_budget.next_budget();
        debug!(
            "{}: {} anchors, link budget {:.2}",
            url,
            hrefs.len(),
            link_budget
        );

        self.graph.add_node(parent_node, NodeKind::Internal);

        let mut found = Vec::new();
        for raw_href in hrefs {
            link_budget -= 1.0;

            let Some(href) = normalize(&raw_href, url) else {
                debug!("Skipping href {:?} on {}", raw_href, url);
                continue;
            };

            if let Some(existing) = self.registry.lookup_by_url(&href) {
                if existing != parent_node && self.graph.add_edge(existing, parent_node) {
                    debug!("Cross edge {} - {} ({})", existing, parent_node, href);
                }
                continue;
            }

            let (kind, visited) = if is_internal(&href, &domain_name) {
                (NodeKind::Internal, &mut self.internal_urls)
            } else {
                (NodeKind::External, &mut self.external_urls)
            };
            let first_sighting = visited.insert(href.clone());

            let id = self.registry.next_id();
            self.graph.add_node(id, kind);
            self.graph.add_edge(parent_node, id);
            let registered = self.registry.register(id, &href);
            debug_assert!(registered, "node {} was not the next free id", id);

            if let Some(ref callback) = self.discovery_callback {
                callback(&Discovery {
                    id,
                    url: href.clone(),
                    kind,
                    parent: parent_node,
                    first_sighting,
                });
            }

            found.push((id, href));

            if link_budget <= 0.0 {
                break;
            }
        }

        Ok(found)
    }

    pub fn into_map(self) -> CrawlMap {
        CrawlMap {
            seed_url: self.seed_url,
            max_depth: self.options.max_depth,
            registry: self.registry,
            graph: self.graph,
            internal_urls: self.internal_urls,
            external_urls: self.external_urls,
            depth_reached: self.depth.depth(),
            pages_crawled: self.pages_crawled,
            failed_pages: self.failed_pages,
        }
    }
}

/// Execute a crawl with the given options
/// Returns the finished crawl map
pub async fn execute_crawl<E: LinkExtractor>(
    seed_url: &str,
    extractor: E,
    options: CrawlOptions,
    discovery_callback: Option<DiscoveryCallback>,
    page_callback: Option<PageCallback>,
) -> Result<CrawlMap> {
    let mut session = CrawlSession::new(seed_url, extractor, options)?;
    if let Some(callback) = discovery_callback {
        session = session.with_discovery_callback(callback);
    }
    if let Some(callback) = page_callback {
        session = session.with_page_callback(callback);
    }
    session.run().await?;
    Ok(session.into_map())
}
