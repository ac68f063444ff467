use crate::graph::NodeId;
use std::collections::HashMap;

/// Node id to normalized URL mapping; the only authority on whether a URL
/// has been seen before.
///
/// Ids are dense and allocated in order, so the forward map is a `Vec`
/// indexed by id. The reverse index keeps the first id registered for a URL.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    urls: Vec<String>,
    by_url: HashMap<String, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_by_url(&self, url: &str) -> Option<NodeId> {
        self.by_url.get(url).copied()
    }

    /// Registers `id` for `url`. Ids must be handed out in sequence starting at
    /// 0; a known or out-of-sequence id is rejected and nothing is overwritten.
    pub fn register(&mut self, id: NodeId, url: &str) -> bool {
        if id.0 != self.urls.len() {
            return false;
        }
        self.urls.push(url.to_string());
        self.by_url.entry(url.to_string()).or_insert(id);
        true
    }

    pub fn url_of(&self, id: NodeId) -> Option<&str> {
        self.urls.get(id.0).map(String::as_str)
    }

    /// The id the next registration must use.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.urls.len())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.urls
            .iter()
            .enumerate()
            .map(|(i, url)| (NodeId(i), url.as_str()))
    }
}
