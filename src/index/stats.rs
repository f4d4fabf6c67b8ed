//! Tree size, height and bucket-density statistics.
//!
//! The tree never changes after construction, so statistics are computed on
//! first use and then served from the cache.

use super::{KdIndex, NodeId};
use geobucket_types::stats::TreeStats;
use smallvec::SmallVec;
use std::collections::BTreeMap;

impl KdIndex {
    /// Cached statistics snapshot.
    pub fn stats(&self) -> &TreeStats {
        self.stats.get_or_init(|| self.compute_stats())
    }

    /// Number of nodes, equal to the number of distinct coordinates.
    pub fn size(&self) -> usize {
        self.stats().size
    }

    /// 0 for an empty tree, 1 for a single leaf.
    pub fn height(&self) -> usize {
        self.stats().height
    }

    /// Stations per coordinate -> number of nodes with that bucket size.
    pub fn bucket_size_distribution(&self) -> &BTreeMap<usize, usize> {
        &self.stats().bucket_distribution
    }

    /// Human-readable report of size, height, balance and bucket distribution.
    pub fn summary(&self) -> String {
        self.stats().to_string()
    }

    fn compute_stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        let mut stack: SmallVec<[(NodeId, usize); 64]> =
            self.root.into_iter().map(|root| (root, 1)).collect();

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            stats.size += 1;
            stats.height = stats.height.max(depth);
            stats.record_bucket(self.buckets[node.bucket].len());

            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }

        log::debug!(
            "Tree stats: size={}, height={}, balance={:.2}",
            stats.size,
            stats.height,
            stats.balance_factor()
        );
        stats
    }
}
