//! Radius search with distance grouping and a density breakdown.
//!
//! A [`RadiusSearch`] wraps one circular range query. Stations are grouped by
//! their distance rounded to [`Config::distance_group_decimals`] decimals;
//! groups come out nearest first and, inside a group, names are listed in
//! descending order.
//!
//! [`Config::distance_group_decimals`]: crate::config::Config

use crate::index::{KdIndex, StationDistance};
use geobucket_types::station::Station;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Stations whose distances round to the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceGroup<'a> {
    pub distance_km: f64,
    pub stations: Vec<&'a Station>,
}

/// Counts of the stations found by a radius search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensitySummary {
    /// Station count per country code, ordered by code
    pub count_by_country: BTreeMap<String, usize>,
    pub city_stations: usize,
    pub non_city_stations: usize,
    pub total_stations: usize,
    pub radius_km: f64,
    pub center_latitude: f64,
    pub center_longitude: f64,
}

impl DensitySummary {
    pub fn new<'a, I>(stations: I, radius_km: f64, center_latitude: f64, center_longitude: f64) -> Self
    where
        I: IntoIterator<Item = &'a Station>,
    {
        let mut summary = Self {
            count_by_country: BTreeMap::new(),
            city_stations: 0,
            non_city_stations: 0,
            total_stations: 0,
            radius_km,
            center_latitude,
            center_longitude,
        };

        for station in stations {
            *summary
                .count_by_country
                .entry(station.country.clone())
                .or_insert(0) += 1;
            if station.is_city {
                summary.city_stations += 1;
            } else {
                summary.non_city_stations += 1;
            }
            summary.total_stations += 1;
        }

        summary
    }

    /// The `n` countries with the most stations; equal counts keep country order.
    pub fn top_countries(&self, n: usize) -> Vec<(&str, usize)> {
        let mut countries: Vec<(&str, usize)> = self
            .count_by_country
            .iter()
            .map(|(country, &count)| (country.as_str(), count))
            .collect();
        // Stable sort keeps the BTreeMap's country order among ties
        countries.sort_by(|a, b| b.1.cmp(&a.1));
        countries.truncate(n);
        countries
    }

    /// One-line form of the summary.
    pub fn compact(&self) -> String {
        format!(
            "Total: {} stations | City: {} | Non-city: {} | Countries: {}",
            self.total_stations,
            self.city_stations,
            self.non_city_stations,
            self.count_by_country.len()
        )
    }

    fn share(&self, count: usize) -> f64 {
        if self.total_stations == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total_stations as f64
        }
    }
}

impl fmt::Display for DensitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Density Summary ===")?;
        writeln!(
            f,
            "Search radius: {:.1} km around ({:.4}, {:.4})",
            self.radius_km, self.center_latitude, self.center_longitude
        )?;
        writeln!(f, "Total stations: {}", self.total_stations)?;
        writeln!(
            f,
            "  City stations: {} ({:.1}%)",
            self.city_stations,
            self.share(self.city_stations)
        )?;
        writeln!(
            f,
            "  Non-city stations: {} ({:.1}%)",
            self.non_city_stations,
            self.share(self.non_city_stations)
        )?;
        writeln!(f)?;
        writeln!(f, "Stations by country:")?;
        for (country, &count) in &self.count_by_country {
            writeln!(f, "  {}: {} ({:.1}%)", country, count, self.share(count))?;
        }
        Ok(())
    }
}

/// Result of [`KdIndex::radius_search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusSearch<'a> {
    groups: Vec<DistanceGroup<'a>>,
    summary: DensitySummary,
}

impl<'a> RadiusSearch<'a> {
    /// Group circular-query hits by distance rounded to `decimals` places.
    pub fn from_hits(
        hits: &[StationDistance<'a>],
        decimals: u32,
        radius_km: f64,
        center_latitude: f64,
        center_longitude: f64,
    ) -> Self {
        let scale = 10f64.powi(decimals as i32);
        let mut buckets: BTreeMap<i64, Vec<&'a Station>> = BTreeMap::new();
        for hit in hits {
            let key = (hit.distance_km * scale).round() as i64;
            buckets.entry(key).or_default().push(hit.station);
        }

        let groups = buckets
            .into_iter()
            .map(|(key, mut stations)| {
                stations.sort_by(|a, b| b.name.cmp(&a.name));
                DistanceGroup {
                    distance_km: key as f64 / scale,
                    stations,
                }
            })
            .collect();

        let summary = DensitySummary::new(
            hits.iter().map(|hit| hit.station),
            radius_km,
            center_latitude,
            center_longitude,
        );

        Self { groups, summary }
    }

    /// Distance groups, nearest first.
    pub fn groups(&self) -> &[DistanceGroup<'a>] {
        &self.groups
    }

    pub fn summary(&self) -> &DensitySummary {
        &self.summary
    }

    /// All stations in group order.
    pub fn stations_sorted(&self) -> Vec<&'a Station> {
        self.groups
            .iter()
            .flat_map(|group| group.stations.iter().copied())
            .collect()
    }

    pub fn total_stations(&self) -> usize {
        self.summary.total_stations
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for RadiusSearch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Radius Search: {:.1} km around ({:.4}, {:.4})",
            self.summary.radius_km, self.summary.center_latitude, self.summary.center_longitude
        )?;
        writeln!(f, "Stations found: {}", self.total_stations())?;
        write!(f, "Unique distance groups: {}", self.groups.len())
    }
}

impl KdIndex {
    /// Circular range query grouped by rounded distance, with a density summary.
    pub fn radius_search(&self, lat: f64, lon: f64, radius_km: f64) -> RadiusSearch<'_> {
        let hits = self.circular_range_query(lat, lon, radius_km);
        let search = RadiusSearch::from_hits(
            &hits,
            self.config().distance_group_decimals,
            radius_km,
            lat,
            lon,
        );
        log::debug!("Radius search: {}", search.summary.compact());
        search
    }
}
