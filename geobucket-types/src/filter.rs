use crate::station::Station;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute filter applied to k-nearest-neighbor searches.
///
/// Every field is optional; an absent field imposes no constraint and every
/// present field must match. The value is built once and passed by reference
/// into the query.
///
/// # Examples
///
/// ```
/// use geobucket_types::filter::StationFilter;
///
/// let airports_in_spain = StationFilter {
///     country: Some("ES".into()),
///     airport: Some(true),
///     ..Default::default()
/// };
/// assert_eq!(airports_in_spain.to_string(), "country=ES, airport=true");
/// assert_eq!(StationFilter::default().to_string(), "No filters");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationFilter {
    pub time_zone_group: Option<String>,
    pub country: Option<String>,
    pub main_station: Option<bool>,
    pub city: Option<bool>,
    pub airport: Option<bool>,
}

impl StationFilter {
    /// Filter constrained only by timezone group.
    pub fn time_zone_group(group: impl Into<String>) -> Self {
        Self {
            time_zone_group: Some(group.into()),
            ..Self::default()
        }
    }

    /// True when no field is set, so every station matches.
    pub fn is_empty(&self) -> bool {
        self.time_zone_group.is_none()
            && self.country.is_none()
            && self.main_station.is_none()
            && self.city.is_none()
            && self.airport.is_none()
    }

    pub fn matches(&self, station: &Station) -> bool {
        if let Some(group) = &self.time_zone_group
            && station.time_zone_group != *group
        {
            return false;
        }
        if let Some(country) = &self.country
            && station.country != *country
        {
            return false;
        }
        if self.main_station.is_some_and(|v| v != station.is_main_station) {
            return false;
        }
        if self.city.is_some_and(|v| v != station.is_city) {
            return false;
        }
        if self.airport.is_some_and(|v| v != station.is_airport) {
            return false;
        }
        true
    }
}

impl fmt::Display for StationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(group) = &self.time_zone_group {
            parts.push(format!("timezone={}", group));
        }
        if let Some(country) = &self.country {
            parts.push(format!("country={}", country));
        }
        if let Some(v) = self.main_station {
            parts.push(format!("mainStation={}", v));
        }
        if let Some(v) = self.city {
            parts.push(format!("city={}", v));
        }
        if let Some(v) = self.airport {
            parts.push(format!("airport={}", v));
        }

        if parts.is_empty() {
            write!(f, "No filters")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
