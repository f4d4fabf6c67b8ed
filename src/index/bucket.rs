//! Collapses stations that share an exact coordinate into buckets.

use super::Axis;
use crate::views::AxisViews;
use geobucket_types::station::Station;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Stations sharing one exact (latitude, longitude) pair, ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateBucket {
    latitude: f64,
    longitude: f64,
    stations: SmallVec<[Station; 1]>,
}

impl CoordinateBucket {
    fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            stations: SmallVec::new(),
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Coordinate on `axis`.
    #[inline]
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.latitude,
            Axis::Longitude => self.longitude,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// First station by name. Buckets are never empty.
    #[inline]
    pub fn first(&self) -> &Station {
        &self.stations[0]
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Lexicographic order on (`axis`, other axis).
    pub(crate) fn cmp_on(&self, other: &Self, axis: Axis) -> Ordering {
        self.coord(axis)
            .total_cmp(&other.coord(axis))
            .then_with(|| self.coord(axis.other()).total_cmp(&other.coord(axis.other())))
    }
}

/// The latitude and longitude views reported different station totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewMismatch {
    pub latitude: usize,
    pub longitude: usize,
}

impl fmt::Display for ViewMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "axis views contain different numbers of stations (latitude: {}, longitude: {})",
            self.latitude, self.longitude
        )
    }
}

/// Buckets plus two orderings over them, by latitude and by longitude.
#[derive(Debug)]
pub(crate) struct Bucketized {
    pub buckets: Vec<CoordinateBucket>,
    pub by_latitude: Vec<usize>,
    pub by_longitude: Vec<usize>,
    pub mismatch: Option<ViewMismatch>,
}

#[inline]
fn normalize(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Exact-precision identity of a coordinate pair.
#[inline]
fn coordinate_key(latitude: f64, longitude: f64) -> (u64, u64) {
    (normalize(latitude).to_bits(), normalize(longitude).to_bits())
}

/// Merge the latitude view into coordinate buckets and order them on both axes.
///
/// The longitude view is only used to cross-check the station total.
pub(crate) fn bucketize(views: AxisViews) -> Bucketized {
    let AxisViews {
        latitude,
        longitude,
    } = views;

    let mut slots: FxHashMap<(u64, u64), usize> = FxHashMap::default();
    let mut buckets: Vec<CoordinateBucket> = Vec::new();

    for entry in latitude {
        for station in entry.stations {
            let key = coordinate_key(station.latitude, station.longitude);
            let slot = *slots.entry(key).or_insert_with(|| {
                buckets.push(CoordinateBucket::new(
                    normalize(station.latitude),
                    normalize(station.longitude),
                ));
                buckets.len() - 1
            });
            buckets[slot].stations.push(station);
        }
    }

    let from_latitude: usize = buckets.iter().map(CoordinateBucket::len).sum();
    let from_longitude: usize = longitude.iter().map(|e| e.stations.len()).sum();

    let mismatch = (from_latitude != from_longitude).then(|| {
        let mismatch = ViewMismatch {
            latitude: from_latitude,
            longitude: from_longitude,
        };
        log::warn!("{}; building from the latitude view", mismatch);
        mismatch
    });

    for bucket in &mut buckets {
        bucket.stations.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut by_latitude: Vec<usize> = (0..buckets.len()).collect();
    let mut by_longitude = by_latitude.clone();
    by_latitude.sort_by(|&a, &b| buckets[a].cmp_on(&buckets[b], Axis::Latitude));
    by_longitude.sort_by(|&a, &b| buckets[a].cmp_on(&buckets[b], Axis::Longitude));

    Bucketized {
        buckets,
        by_latitude,
        by_longitude,
        mismatch,
    }
}
