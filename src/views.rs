//! Per-axis sorted views of a station collection.
//!
//! The index is built from two independently sorted sequences: one grouping
//! stations by exact latitude, one by exact longitude. Any producer that
//! honours that contract can feed [`KdIndex`](crate::KdIndex);
//! [`AxisViews::from_stations`] is the in-crate producer.

use crate::compute::validation::validate_station;
use geobucket_types::station::Station;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// All stations sharing one exact coordinate value on a single axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisEntry {
    pub value: f64,
    pub stations: Vec<Station>,
}

impl AxisEntry {
    pub fn new(value: f64, stations: Vec<Station>) -> Self {
        Self { value, stations }
    }
}

/// Latitude-ordered and longitude-ordered views over the same stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisViews {
    pub latitude: Vec<AxisEntry>,
    pub longitude: Vec<AxisEntry>,
}

/// Outcome of [`AxisViews::from_stations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLoadReport {
    pub accepted: usize,
    /// One message per station that failed validation
    pub rejected: Vec<String>,
}

/// f64 wrapper with a total order; `-0.0` and `0.0` collapse to one key.
#[derive(Debug, Clone, Copy)]
struct AxisKey(f64);

impl AxisKey {
    fn new(value: f64) -> Self {
        Self(if value == 0.0 { 0.0 } else { value })
    }
}

impl PartialEq for AxisKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AxisKey {}

impl PartialOrd for AxisKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl AxisViews {
    pub fn new(latitude: Vec<AxisEntry>, longitude: Vec<AxisEntry>) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate and group stations into both axis views.
    ///
    /// Invalid stations are skipped (and logged); each entry keeps its
    /// stations ordered by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobucket::AxisViews;
    /// use geobucket::Station;
    ///
    /// let (views, report) = AxisViews::from_stations(vec![
    ///     Station::new("B", 40.0, -8.0, "PT", "WET/WEST"),
    ///     Station::new("A", 40.0, -9.0, "PT", "WET/WEST"),
    ///     Station::new("Bad", 91.0, -9.0, "PT", "WET/WEST"),
    /// ]);
    ///
    /// assert_eq!(report.accepted, 2);
    /// assert_eq!(report.rejected.len(), 1);
    /// assert_eq!(views.latitude.len(), 1);
    /// assert_eq!(views.latitude[0].stations[0].name, "A");
    /// assert_eq!(views.longitude.len(), 2);
    /// ```
    pub fn from_stations<I>(stations: I) -> (Self, ViewLoadReport)
    where
        I: IntoIterator<Item = Station>,
    {
        let mut by_latitude: BTreeMap<AxisKey, Vec<Station>> = BTreeMap::new();
        let mut by_longitude: BTreeMap<AxisKey, Vec<Station>> = BTreeMap::new();
        let mut report = ViewLoadReport::default();

        for station in stations {
            if let Err(e) = validate_station(&station) {
                log::warn!("Skipping station: {}", e);
                report.rejected.push(e.to_string());
                continue;
            }

            report.accepted += 1;
            by_longitude
                .entry(AxisKey::new(station.longitude))
                .or_default()
                .push(station.clone());
            by_latitude
                .entry(AxisKey::new(station.latitude))
                .or_default()
                .push(station);
        }

        let into_entries = |map: BTreeMap<AxisKey, Vec<Station>>| -> Vec<AxisEntry> {
            map.into_iter()
                .map(|(key, mut stations)| {
                    stations.sort_by(|a, b| a.name.cmp(&b.name));
                    AxisEntry::new(key.0, stations)
                })
                .collect()
        };

        let views = Self::new(into_entries(by_latitude), into_entries(by_longitude));
        (views, report)
    }

    /// Station totals as (latitude view, longitude view).
    pub fn station_counts(&self) -> (usize, usize) {
        let count = |entries: &[AxisEntry]| -> usize {
            entries.iter().map(|e| e.stations.len()).sum()
        };
        (count(&self.latitude), count(&self.longitude))
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty() && self.longitude.is_empty()
    }

    /// Stations with latitude in the closed range, in latitude order and by
    /// name within one latitude.
    pub fn latitude_range(&self, min_lat: f64, max_lat: f64) -> Vec<&Station> {
        stations_between(&self.latitude, min_lat, max_lat)
    }

    /// Stations with longitude in the closed range, in longitude order and by
    /// name within one longitude.
    pub fn longitude_range(&self, min_lon: f64, max_lon: f64) -> Vec<&Station> {
        stations_between(&self.longitude, min_lon, max_lon)
    }
}

/// Binary search for the first entry at or above `min`, then scan up to `max`.
/// Entries must be sorted by value.
fn stations_between(entries: &[AxisEntry], min: f64, max: f64) -> Vec<&Station> {
    let start = entries.partition_point(|entry| entry.value < min);
    entries[start..]
        .iter()
        .take_while(|entry| entry.value <= max)
        .flat_map(|entry| entry.stations.iter())
        .collect()
}
