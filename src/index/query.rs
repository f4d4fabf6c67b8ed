//! Range, circular, nearest and k-nearest queries.
//!
//! All four walk the arena iteratively. Nearest-neighbor style searches push
//! the far child as a deferred step underneath the near child, so its pruning
//! test runs only after the whole near subtree has tightened the bound.

use super::{Axis, KdIndex, KdNode, NodeId};
use crate::compute::distance::{haversine_km, plane_distance_km};
use geo::Rect;
use geobucket_types::filter::StationFilter;
use geobucket_types::station::Station;
use serde::Serialize;
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// Inline capacity of traversal stacks; balanced trees rarely exceed it.
const STACK_INLINE: usize = 64;

/// A station paired with its great-circle distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationDistance<'a> {
    pub station: &'a Station,
    pub distance_km: f64,
}

impl<'a> StationDistance<'a> {
    pub fn new(station: &'a Station, distance_km: f64) -> Self {
        Self {
            station,
            distance_km,
        }
    }

    /// Ascending distance, then ascending name.
    fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| self.station.name.cmp(&other.station.name))
    }
}

impl fmt::Display for StationDistance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} km)", self.station.name, self.distance_km)
    }
}

/// Max-heap entry: the root is the worst of the current k best.
struct KnnEntry<'a>(StationDistance<'a>);

impl PartialEq for KnnEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KnnEntry<'_> {}

impl PartialOrd for KnnEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KnnEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_by_distance(&other.0)
    }
}

enum Step {
    Visit(NodeId),
    /// Far child of an already visited node, with the plane distance to its split
    Far { node: NodeId, plane_km: f64 },
}

impl KdIndex {
    #[inline]
    fn split_value(&self, node: &KdNode) -> f64 {
        self.buckets[node.bucket].coord(node.axis)
    }

    /// Children ordered as (near, far) relative to the query point.
    #[inline]
    fn near_far(&self, node: &KdNode, lat: f64, lon: f64) -> (Option<NodeId>, Option<NodeId>) {
        let query = match node.axis {
            Axis::Latitude => lat,
            Axis::Longitude => lon,
        };
        if query < self.split_value(node) {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        }
    }

    #[inline]
    fn plane_km(&self, node: &KdNode, lat: f64, lon: f64) -> f64 {
        let bucket = &self.buckets[node.bucket];
        plane_distance_km(node.axis, bucket.latitude(), bucket.longitude(), lat, lon)
    }

    /// All stations whose coordinate lies in the closed rectangle, sorted by name.
    ///
    /// Inverted bounds simply match nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobucket::{AxisViews, KdIndex, Station};
    ///
    /// let (views, _) = AxisViews::from_stations(vec![
    ///     Station::new("Inside", 40.5, -74.5, "US", "EST/EDT"),
    ///     Station::new("Edge", 41.0, -74.0, "US", "EST/EDT"),
    ///     Station::new("Outside", 42.0, -74.5, "US", "EST/EDT"),
    /// ]);
    /// let index = KdIndex::from_views(views);
    ///
    /// let hits = index.range_query(40.0, 41.0, -75.0, -74.0);
    /// let names: Vec<&str> = hits.iter().map(|s| s.name.as_str()).collect();
    /// assert_eq!(names, vec!["Edge", "Inside"]);
    /// ```
    pub fn range_query(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Vec<&Station> {
        let mut result: Vec<&Station> = Vec::new();
        let mut stack: SmallVec<[NodeId; STACK_INLINE]> = self.root.into_iter().collect();
        let mut visited = 0usize;

        while let Some(id) = stack.pop() {
            visited += 1;
            let node = &self.nodes[id.0];
            let bucket = &self.buckets[node.bucket];
            let (lat, lon) = (bucket.latitude(), bucket.longitude());

            if lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon {
                result.extend(bucket.stations());
            }

            let (low, high) = match node.axis {
                Axis::Latitude => (min_lat, max_lat),
                Axis::Longitude => (min_lon, max_lon),
            };
            let split = bucket.coord(node.axis);
            if let Some(right) = node.right
                && high >= split
            {
                stack.push(right);
            }
            if let Some(left) = node.left
                && low <= split
            {
                stack.push(left);
            }
        }

        log::trace!("range_query visited {} nodes", visited);
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// [`range_query`](Self::range_query) over a `geo::Rect` (x = longitude, y = latitude).
    pub fn range_query_rect(&self, rect: &Rect) -> Vec<&Station> {
        self.range_query(rect.min().y, rect.max().y, rect.min().x, rect.max().x)
    }

    /// All stations within `radius_km` (great-circle) of the center, sorted by
    /// distance and then name.
    pub fn circular_range_query(
        &self,
        center_lat: f64,
        center_lon: f64,
        radius_km: f64,
    ) -> Vec<StationDistance<'_>> {
        let mut result: Vec<StationDistance<'_>> = Vec::new();
        let mut stack: SmallVec<[NodeId; STACK_INLINE]> = self.root.into_iter().collect();
        let mut visited = 0usize;

        while let Some(id) = stack.pop() {
            visited += 1;
            let node = &self.nodes[id.0];
            let bucket = &self.buckets[node.bucket];

            let distance = haversine_km(
                center_lat,
                center_lon,
                bucket.latitude(),
                bucket.longitude(),
            );
            if distance <= radius_km {
                result.extend(
                    bucket
                        .stations()
                        .iter()
                        .map(|station| StationDistance::new(station, distance)),
                );
            }

            let (near, far) = self.near_far(node, center_lat, center_lon);
            // The circle may cross the split line: both sides can hold matches
            if self.plane_km(node, center_lat, center_lon) <= radius_km {
                stack.extend(far);
            }
            stack.extend(near);
        }

        log::trace!("circular_range_query visited {} nodes", visited);
        result.sort_by(StationDistance::cmp_by_distance);
        result
    }

    /// Closest station to the query point, `None` for an empty index.
    ///
    /// When several stations share the closest coordinate, the first by name
    /// is returned.
    pub fn nearest_neighbor(&self, lat: f64, lon: f64) -> Option<StationDistance<'_>> {
        let mut best: Option<StationDistance<'_>> = None;
        let mut stack: SmallVec<[Step; STACK_INLINE]> = match self.root {
            Some(root) => smallvec![Step::Visit(root)],
            None => return None,
        };
        let mut visited = 0usize;

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Visit(id) => id,
                Step::Far { node, plane_km } => {
                    if best.is_none_or(|b| plane_km < b.distance_km) {
                        node
                    } else {
                        continue;
                    }
                }
            };
            visited += 1;

            let node = &self.nodes[id.0];
            let bucket = &self.buckets[node.bucket];
            let distance = haversine_km(lat, lon, bucket.latitude(), bucket.longitude());

            if best.is_none_or(|b| distance < b.distance_km) {
                best = Some(StationDistance::new(bucket.first(), distance));
            }

            let (near, far) = self.near_far(node, lat, lon);
            if let Some(far) = far {
                stack.push(Step::Far {
                    node: far,
                    plane_km: self.plane_km(node, lat, lon),
                });
            }
            if let Some(near) = near {
                stack.push(Step::Visit(near));
            }
        }

        log::trace!("nearest_neighbor visited {} nodes", visited);
        best
    }

    /// The `k` closest stations, sorted by distance then name.
    ///
    /// `k == 0` or an empty index yields an empty vector; a `k` beyond the
    /// station count yields every station.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobucket::{AxisViews, KdIndex, Station};
    ///
    /// let stations = (0..5).map(|i| {
    ///     let step = i as f64 * 0.1;
    ///     Station::new(format!("S{}", i), 40.0 + step, -74.0 - step, "US", "EST/EDT")
    /// });
    /// let (views, _) = AxisViews::from_stations(stations);
    /// let index = KdIndex::from_views(views);
    ///
    /// let nearest = index.k_nearest(40.0, -74.0, 3);
    /// let names: Vec<&str> = nearest.iter().map(|n| n.station.name.as_str()).collect();
    /// assert_eq!(names, vec!["S0", "S1", "S2"]);
    /// assert_eq!(index.k_nearest(40.0, -74.0, 10).len(), 5);
    /// ```
    pub fn k_nearest(&self, lat: f64, lon: f64, k: usize) -> Vec<StationDistance<'_>> {
        self.k_nearest_by(lat, lon, k, |_| true)
    }

    /// The `k` closest stations in timezone group `group`.
    pub fn k_nearest_in_time_zone(
        &self,
        lat: f64,
        lon: f64,
        k: usize,
        group: &str,
    ) -> Vec<StationDistance<'_>> {
        self.k_nearest_by(lat, lon, k, |station| station.time_zone_group == group)
    }

    /// The `k` closest stations matching every field set in `filter`.
    pub fn k_nearest_matching(
        &self,
        lat: f64,
        lon: f64,
        k: usize,
        filter: &StationFilter,
    ) -> Vec<StationDistance<'_>> {
        self.k_nearest_by(lat, lon, k, |station| filter.matches(station))
    }

    /// Shared k-nearest search. The predicate limits which stations are
    /// admitted, not which nodes are visited.
    fn k_nearest_by<P>(
        &self,
        lat: f64,
        lon: f64,
        k: usize,
        admits: P,
    ) -> Vec<StationDistance<'_>>
    where
        P: Fn(&Station) -> bool,
    {
        let root = match self.root {
            Some(root) if k > 0 => root,
            _ => return Vec::new(),
        };

        let mut heap: BinaryHeap<KnnEntry<'_>> =
            BinaryHeap::with_capacity(k.min(self.station_count()));
        let mut stack: SmallVec<[Step; STACK_INLINE]> = smallvec![Step::Visit(root)];
        let mut visited = 0usize;

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Visit(id) => id,
                Step::Far { node, plane_km } => {
                    let worst = heap.peek().map(|e| e.0.distance_km);
                    if heap.len() < k || worst.is_some_and(|w| plane_km < w) {
                        node
                    } else {
                        continue;
                    }
                }
            };
            visited += 1;

            let node = &self.nodes[id.0];
            let bucket = &self.buckets[node.bucket];
            let distance = haversine_km(lat, lon, bucket.latitude(), bucket.longitude());

            for station in bucket.stations().iter().filter(|s| admits(s)) {
                if heap.len() < k {
                    heap.push(KnnEntry(StationDistance::new(station, distance)));
                } else if let Some(worst) = heap.peek()
                    && distance < worst.0.distance_km
                {
                    heap.pop();
                    heap.push(KnnEntry(StationDistance::new(station, distance)));
                }
            }

            let (near, far) = self.near_far(node, lat, lon);
            if let Some(far) = far {
                stack.push(Step::Far {
                    node: far,
                    plane_km: self.plane_km(node, lat, lon),
                });
            }
            if let Some(near) = near {
                stack.push(Step::Visit(near));
            }
        }

        log::trace!("k_nearest visited {} nodes, kept {}", visited, heap.len());
        heap.into_sorted_vec().into_iter().map(|e| e.0).collect()
    }
}
