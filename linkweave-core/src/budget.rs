//! Fan-out and depth limits for a crawl.
//!
//! Two budgets shape the walk. The link budget is a random real drawn per page
//! that caps how many hrefs on that page are considered. The visit budget caps
//! how many of a page's new children are crawled in turn. Depth is tracked
//! separately by [`DepthTracker`].

use crate::graph::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Visit budget given to the seed page and to every child page.
pub const DEFAULT_VISIT_BUDGET: u32 = 8;

/// Highest max depth a crawl accepts.
pub const MAX_DEPTH_LIMIT: u8 = 20;

/// Link budgets are drawn from `[0, LINK_BUDGET_SCALE)`.
pub const LINK_BUDGET_SCALE: f64 = 10.0;

/// Produces one link budget per crawled page.
pub trait LinkBudgetSource: Send {
    fn next_budget(&mut self) -> f64;
}

/// Uniform budgets in `[0, 10)`.
pub struct RandomBudget<R = StdRng> {
    rng: R,
}

impl RandomBudget<StdRng> {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Same seed, same sequence of budgets.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> LinkBudgetSource for RandomBudget<R> {
    fn next_budget(&mut self) -> f64 {
        self.rng.random::<f64>() * LINK_BUDGET_SCALE
    }
}

/// The same budget for every page.
#[derive(Debug, Clone, Copy)]
pub struct FixedBudget(pub f64);

impl LinkBudgetSource for FixedBudget {
    fn next_budget(&mut self) -> f64 {
        self.0
    }
}

/// How a session obtains its link budgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkBudgetMode {
    /// Fresh OS entropy, or a fixed RNG seed when one is given.
    Random { seed: Option<u64> },
    Fixed(f64),
}

impl Default for LinkBudgetMode {
    fn default() -> Self {
        LinkBudgetMode::Random { seed: None }
    }
}

impl LinkBudgetMode {
    pub fn into_source(self) -> Box<dyn LinkBudgetSource> {
        match self {
            LinkBudgetMode::Random { seed: Some(seed) } => Box::new(RandomBudget::seeded(seed)),
            LinkBudgetMode::Random { seed: None } => Box::new(RandomBudget::from_os_rng()),
            LinkBudgetMode::Fixed(budget) => Box::new(FixedBudget(budget)),
        }
    }
}

/// Crawl depth counter.
///
/// The counter moves up by one every time the page being processed belongs to
/// a different parent node than the previous page, so it counts parent
/// contexts seen across the whole crawl rather than levels of the tree.
#[derive(Debug, Clone)]
pub struct DepthTracker {
    depth: u32,
    max_depth: u8,
    last_parent: Option<NodeId>,
}

impl DepthTracker {
    pub fn new(max_depth: u8) -> Self {
        Self {
            depth: 0,
            max_depth,
            last_parent: None,
        }
    }

    /// Record that `parent` is being processed. Returns `true` when the depth
    /// counter advanced.
    pub fn observe(&mut self, parent: NodeId) -> bool {
        if self.last_parent == Some(parent) {
            return false;
        }
        self.depth += 1;
        self.last_parent = Some(parent);
        true
    }

    /// Whether children of the current page may still be crawled.
    pub fn allows_descent(&self) -> bool {
        self.depth < u32::from(self.max_depth)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_budget_in_range() {
        let mut source = RandomBudget::seeded(7);
        for _ in 0..1000 {
            let budget = source.next_budget();
            assert!((0.0..LINK_BUDGET_SCALE).contains(&budget));
        }
    }

    #[test]
    fn test_seeded_budget_is_reproducible() {
        let mut a = RandomBudget::seeded(42);
        let mut b = RandomBudget::seeded(42);
        let first: Vec<f64> = (0..16).map(|_| a.next_budget()).collect();
        let second: Vec<f64> = (0..16).map(|_| b.next_budget()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_budget() {
        let mut source = LinkBudgetMode::Fixed(3.5).into_source();
        assert_eq!(source.next_budget(), 3.5);
        assert_eq!(source.next_budget(), 3.5);
    }

    #[test]
    fn test_depth_advances_only_on_parent_change() {
        let mut tracker = DepthTracker::new(5);

        assert!(tracker.observe(NodeId(0)));
        assert_eq!(tracker.depth(), 1);

        assert!(!tracker.observe(NodeId(0)));
        assert_eq!(tracker.depth(), 1);

        assert!(tracker.observe(NodeId(1)));
        assert!(tracker.observe(NodeId(0)));
        assert_eq!(tracker.depth(), 3);
    }

    #[test]
    fn test_depth_ceiling() {
        let mut tracker = DepthTracker::new(2);
        tracker.observe(NodeId(0));
        assert!(tracker.allows_descent());
        tracker.observe(NodeId(1));
        assert!(!tracker.allows_descent());
    }

    #[test]
    fn test_zero_max_depth_never_descends() {
        let mut tracker = DepthTracker::new(0);
        assert!(!tracker.allows_descent());
        tracker.observe(NodeId(0));
        assert!(!tracker.allows_descent());
    }
}
