use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shape and density snapshot of a built index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of tree nodes, one per distinct coordinate
    pub size: usize,
    /// Longest root-to-leaf path; a single leaf has height 1
    pub height: usize,
    /// Stations per coordinate -> number of nodes with that bucket size
    pub bucket_distribution: BTreeMap<usize, usize>,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one node holding `bucket_size` stations.
    pub fn record_bucket(&mut self, bucket_size: usize) {
        *self.bucket_distribution.entry(bucket_size).or_insert(0) += 1;
    }

    /// Stations across all buckets.
    pub fn total_stations(&self) -> usize {
        self.bucket_distribution
            .iter()
            .map(|(per_bucket, nodes)| per_bucket * nodes)
            .sum()
    }

    /// `ceil(log2(size))`, the height a perfectly balanced tree would reach.
    pub fn expected_height(&self) -> usize {
        if self.size <= 1 {
            return 0;
        }
        (self.size as f64).log2().ceil() as usize
    }

    /// Ratio of actual to expected height (1.0 = perfect, < 1.5 = good).
    pub fn balance_factor(&self) -> f64 {
        match self.expected_height() {
            0 => 1.0,
            expected => self.height as f64 / expected as f64,
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== KD-Tree Summary ===")?;
        writeln!(f, "Size (nodes): {}", self.size)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(
            f,
            "Expected height for balanced tree: ~{}",
            self.expected_height()
        )?;
        writeln!(
            f,
            "Balance factor: {:.2} (1.0 = perfect, <1.5 = good)",
            self.balance_factor()
        )?;
        writeln!(f)?;
        writeln!(f, "Bucket Size Distribution:")?;
        for (per_bucket, nodes) in &self.bucket_distribution {
            let share = if self.size > 0 {
                100.0 * *nodes as f64 / self.size as f64
            } else {
                0.0
            };
            writeln!(
                f,
                "  {} station(s) per coordinate: {} nodes ({:.2}%)",
                per_bucket, nodes, share
            )?;
        }
        writeln!(f)?;
        write!(f, "Total stations indexed: {}", self.total_stations())
    }
}
