//! Great-circle distance and the split-plane approximation used for pruning.

use crate::index::Axis;
use geo::{Distance, HaversineMeasure, Point};

/// Approximate kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.0;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_KM * 1000.0);

/// Haversine distance in kilometres between two (latitude, longitude) pairs.
///
/// # Examples
///
/// ```
/// use geobucket::compute::distance::haversine_km;
///
/// // Lisbon to Porto, roughly 274 km
/// let d = haversine_km(38.7223, -9.1393, 41.1579, -8.6291);
/// assert!(d > 270.0 && d < 280.0);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH.distance(Point::new(lon1, lat1), Point::new(lon2, lat2)) / 1000.0
}

/// Cheap estimate of the distance from a query point to the splitting line
/// through `(split_lat, split_lon)` on `axis`.
///
/// One degree of latitude counts as 111 km; one degree of longitude as
/// 111 km scaled by the cosine of the query latitude. Only used to decide
/// whether the far side of a split has to be visited.
#[inline]
pub fn plane_distance_km(axis: Axis, split_lat: f64, split_lon: f64, lat: f64, lon: f64) -> f64 {
    match axis {
        Axis::Latitude => (split_lat - lat).abs() * KM_PER_DEGREE,
        Axis::Longitude => (split_lon - lon).abs() * KM_PER_DEGREE * lat.to_radians().cos(),
    }
}
