//! Balanced tree construction over the two co-indexed bucket orderings.
//!
//! At every level the median is taken from the ordering of the current split
//! axis, and both orderings are partitioned around it with a stable filter.
//! Sub-lists therefore stay sorted and no level ever sorts again, which keeps
//! construction at O(n log n).

use super::bucket::CoordinateBucket;
use super::{Axis, KdNode, NodeId};
use std::cmp::Ordering;

enum Side {
    Left,
    Right,
}

struct TreeBuilder<'a> {
    buckets: &'a [CoordinateBucket],
    nodes: Vec<KdNode>,
}

/// Build the arena and return it with the root id (`None` for no buckets).
pub(super) fn build_tree(
    buckets: &[CoordinateBucket],
    by_latitude: Vec<usize>,
    by_longitude: Vec<usize>,
) -> (Vec<KdNode>, Option<NodeId>) {
    debug_assert_eq!(by_latitude.len(), by_longitude.len());

    let mut builder = TreeBuilder {
        buckets,
        nodes: Vec::with_capacity(buckets.len()),
    };
    let root = builder.build(by_latitude, by_longitude, 0);
    (builder.nodes, root)
}

impl TreeBuilder<'_> {
    fn build(
        &mut self,
        by_latitude: Vec<usize>,
        by_longitude: Vec<usize>,
        depth: usize,
    ) -> Option<NodeId> {
        if by_latitude.is_empty() {
            return None;
        }

        let axis = Axis::for_depth(depth);
        let ordered = match axis {
            Axis::Latitude => &by_latitude,
            Axis::Longitude => &by_longitude,
        };
        // Lower median for even lengths
        let median = ordered[(ordered.len() - 1) / 2];

        let id = NodeId(self.nodes.len());
        self.nodes.push(KdNode {
            axis,
            bucket: median,
            left: None,
            right: None,
        });

        let (lat_left, lat_right) = self.partition(&by_latitude, median, axis);
        let (lon_left, lon_right) = self.partition(&by_longitude, median, axis);
        // Release this level's lists before descending
        drop(by_latitude);
        drop(by_longitude);

        let left = self.build(lat_left, lon_left, depth + 1);
        let right = self.build(lat_right, lon_right, depth + 1);

        let node = &mut self.nodes[id.0];
        node.left = left;
        node.right = right;
        Some(id)
    }

    /// Split `ids` into buckets strictly before and strictly after the median
    /// on `axis`, ties broken by the other axis. The median itself is dropped.
    fn partition(&self, ids: &[usize], median: usize, axis: Axis) -> (Vec<usize>, Vec<usize>) {
        let pivot = &self.buckets[median];
        let mut left = Vec::with_capacity(ids.len() / 2);
        let mut right = Vec::with_capacity(ids.len() / 2 + 1);

        for &id in ids {
            match side_of(&self.buckets[id], pivot, axis) {
                Some(Side::Left) => left.push(id),
                Some(Side::Right) => right.push(id),
                None => {}
            }
        }

        (left, right)
    }
}

fn side_of(bucket: &CoordinateBucket, pivot: &CoordinateBucket, axis: Axis) -> Option<Side> {
    let primary = bucket.coord(axis).partial_cmp(&pivot.coord(axis));
    let secondary = || {
        bucket
            .coord(axis.other())
            .partial_cmp(&pivot.coord(axis.other()))
    };

    match primary {
        Some(Ordering::Less) => Some(Side::Left),
        Some(Ordering::Greater) => Some(Side::Right),
        _ => match secondary() {
            Some(Ordering::Less) => Some(Side::Left),
            Some(Ordering::Greater) => Some(Side::Right),
            _ => None,
        },
    }
}
