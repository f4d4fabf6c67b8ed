//! Validation for stations before they reach the index.

use crate::error::{GeoBucketError, Result};
use geobucket_types::station::Station;

/// Validates a latitude/longitude pair.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use geobucket::compute::validation::validate_coordinates;
///
/// assert!(validate_coordinates(40.7128, -74.0060).is_ok());
/// assert!(validate_coordinates(95.0, -74.0).is_err());
/// assert!(validate_coordinates(40.0, 200.0).is_err());
/// ```
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() {
        return Err(GeoBucketError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !longitude.is_finite() {
        return Err(GeoBucketError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeoBucketError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoBucketError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    Ok(())
}

/// Validates a station: non-blank name, country and timezone group plus
/// in-range coordinates.
pub fn validate_station(station: &Station) -> Result<()> {
    let blank = [
        ("name", &station.name),
        ("country", &station.country),
        ("time zone group", &station.time_zone_group),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    if let Some((field, _)) = blank {
        return Err(GeoBucketError::InvalidInput(format!(
            "Station '{}' has an empty {}",
            station.name, field
        )));
    }

    validate_coordinates(station.latitude, station.longitude)
        .map_err(|e| GeoBucketError::InvalidInput(format!("Station '{}': {}", station.name, e)))
}
