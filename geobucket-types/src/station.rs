use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geo-tagged station record.
///
/// Stations are immutable once indexed. The categorical attributes
/// (country, timezone group and the three flags) are what
/// [`StationFilter`](crate::filter::StationFilter) matches against.
///
/// # Examples
///
/// ```
/// use geobucket_types::station::Station;
///
/// let station = Station::new("Porto Campanha", 41.1486, -8.5855, "PT", "WET/WEST")
///     .with_city(true)
///     .with_main_station(true);
///
/// assert_eq!(station.point().x(), -8.5855);
/// assert_eq!(station.point().y(), 41.1486);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    #[serde(default)]
    pub time_zone: String,
    pub time_zone_group: String,
    #[serde(default)]
    pub is_city: bool,
    #[serde(default)]
    pub is_main_station: bool,
    #[serde(default)]
    pub is_airport: bool,
}

impl Station {
    /// Create a station with all flags cleared and an empty time zone.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: impl Into<String>,
        time_zone_group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: country.into(),
            time_zone: String::new(),
            time_zone_group: time_zone_group.into(),
            is_city: false,
            is_main_station: false,
            is_airport: false,
        }
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn with_city(mut self, is_city: bool) -> Self {
        self.is_city = is_city;
        self
    }

    pub fn with_main_station(mut self, is_main_station: bool) -> Self {
        self.is_main_station = is_main_station;
        self
    }

    pub fn with_airport(mut self, is_airport: bool) -> Self {
        self.is_airport = is_airport;
        self
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Station{{name='{}', lat={:.6}, lon={:.6}, country='{}', tz='{}', city={}, main={}, airport={}}}",
            self.name,
            self.latitude,
            self.longitude,
            self.country,
            self.time_zone_group,
            self.is_city,
            self.is_main_station,
            self.is_airport
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Station {
        Station::new("Lisboa Santa Apolonia", 38.71387, -9.122271, "PT", "WET/WEST")
    }

    #[test]
    fn test_flags_and_display() {
        let station = sample()
            .with_time_zone("Europe/Lisbon")
            .with_city(true)
            .with_main_station(true)
            .with_airport(false);

        assert_eq!(station.time_zone, "Europe/Lisbon");
        assert!(station.is_city && station.is_main_station && !station.is_airport);

        let text = station.to_string();
        assert!(text.contains("Lisboa Santa Apolonia"));
        assert!(text.contains("city=true"));
    }

    #[test]
    fn test_serde_defaults_for_flags() {
        let json = r#"{
            "name": "Faro",
            "latitude": 37.0194,
            "longitude": -7.9404,
            "country": "PT",
            "time_zone_group": "WET/WEST"
        }"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.name, "Faro");
        assert!(!station.is_airport);
        assert!(station.time_zone.is_empty());
    }
}
