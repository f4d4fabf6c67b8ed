//! Bucketed, balanced 2D k-d tree over station coordinates.
//!
//! Construction happens once from a pair of [`AxisViews`]; afterwards the
//! index is immutable and every query is a read-only traversal, so a single
//! `KdIndex` can be shared across threads.
//!
//! Nodes live in an arena and refer to their children by [`NodeId`]. Each
//! node owns exactly one [`CoordinateBucket`]: the stations that share one
//! exact (latitude, longitude) pair.

pub mod bucket;
mod build;
mod query;
mod stats;
mod zones;

pub use bucket::{CoordinateBucket, ViewMismatch};
pub use query::StationDistance;

use crate::config::Config;
use crate::views::AxisViews;
use bucket::Bucketized;
use geobucket_types::stats::TreeStats;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Split dimension of a node, alternating with depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Latitude at even depths, longitude at odd depths.
    #[inline]
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::Latitude
        } else {
            Axis::Longitude
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Axis::Latitude => Axis::Longitude,
            Axis::Longitude => Axis::Latitude,
        }
    }
}

/// Position of a node in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct KdNode {
    axis: Axis,
    bucket: usize,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl KdNode {
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}

/// Immutable spatial index over stations.
///
/// # Examples
///
/// ```
/// use geobucket::{AxisViews, KdIndex, Station};
///
/// let (views, _) = AxisViews::from_stations(vec![
///     Station::new("Lisboa", 38.71387, -9.122271, "PT", "WET/WEST"),
///     Station::new("Porto", 41.1486, -8.5855, "PT", "WET/WEST"),
///     Station::new("Madrid", 40.4066, -3.6892, "ES", "CET/CEST"),
/// ]);
/// let index = KdIndex::from_views(views);
///
/// let nearest = index.nearest_neighbor(41.0, -8.6).unwrap();
/// assert_eq!(nearest.station.name, "Porto");
/// assert_eq!(index.size(), 3);
/// ```
#[derive(Debug)]
pub struct KdIndex {
    buckets: Vec<CoordinateBucket>,
    nodes: Vec<KdNode>,
    root: Option<NodeId>,
    station_count: usize,
    mismatch: Option<ViewMismatch>,
    config: Config,
    stats: OnceCell<TreeStats>,
    zones: OnceCell<zones::ZoneIndex>,
}

impl KdIndex {
    /// Build with the default configuration. View mismatches are logged and
    /// kept as a diagnostic, never fatal.
    pub fn from_views(views: AxisViews) -> Self {
        Self::assemble(bucket::bucketize(views), Config::default())
    }

    pub(crate) fn assemble(bucketized: Bucketized, config: Config) -> Self {
        let Bucketized {
            buckets,
            by_latitude,
            by_longitude,
            mismatch,
        } = bucketized;

        let (nodes, root) = build::build_tree(&buckets, by_latitude, by_longitude);
        let station_count: usize = buckets.iter().map(CoordinateBucket::len).sum();

        log::debug!(
            "Built k-d index: {} buckets, {} stations",
            nodes.len(),
            station_count
        );

        Self {
            buckets,
            nodes,
            root,
            station_count,
            mismatch,
            config,
            stats: OnceCell::new(),
            zones: OnceCell::new(),
        }
    }

    /// An index with no stations.
    pub fn empty() -> Self {
        Self::from_views(AxisViews::default())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this index.
    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id.0]
    }

    /// The bucket stored at node `id`.
    pub fn bucket(&self, id: NodeId) -> &CoordinateBucket {
        &self.buckets[self.nodes[id.0].bucket]
    }

    /// Present when the two input views disagreed on station totals.
    pub fn view_mismatch(&self) -> Option<&ViewMismatch> {
        self.mismatch.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of stations across all buckets.
    #[inline]
    pub fn station_count(&self) -> usize {
        self.station_count
    }
}

impl Default for KdIndex {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobucket_types::station::Station;

    #[test]
    fn test_axis_alternates() {
        assert_eq!(Axis::for_depth(0), Axis::Latitude);
        assert_eq!(Axis::for_depth(1), Axis::Longitude);
        assert_eq!(Axis::for_depth(6), Axis::Latitude);
        assert_eq!(Axis::Latitude.other(), Axis::Longitude);
    }

    #[test]
    fn test_empty_index() {
        let index = KdIndex::empty();
        assert!(index.is_empty());
        assert!(index.root().is_none());
        assert_eq!(index.station_count(), 0);
        assert!(index.view_mismatch().is_none());
    }

    #[test]
    fn test_single_bucket_is_root_leaf() {
        let (views, _) =
            AxisViews::from_stations(vec![Station::new("Solo", 1.0, 2.0, "PT", "WET/WEST")]);
        let index = KdIndex::from_views(views);

        let root = index.root().unwrap();
        assert_eq!(index.node(root).axis(), Axis::Latitude);
        assert!(index.node(root).left().is_none());
        assert!(index.node(root).right().is_none());
        assert_eq!(index.bucket(root).stations()[0].name, "Solo");
    }

    #[test]
    fn test_station_count_fixed_at_build() {
        let (views, _) = AxisViews::from_stations(vec![
            Station::new("A", 1.0, 2.0, "PT", "WET/WEST"),
            Station::new("B", 1.0, 2.0, "PT", "WET/WEST"),
            Station::new("C", 3.0, 4.0, "PT", "WET/WEST"),
        ]);
        let index = KdIndex::from_views(views);

        assert_eq!(index.station_count(), 3);
        assert_eq!(index.station_count, index.stats().total_stations());
        // k beyond the population is bounded by the stored count
        assert_eq!(index.k_nearest(0.0, 0.0, usize::MAX).len(), 3);
    }

    #[test]
    fn test_index_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KdIndex>();
    }
}
