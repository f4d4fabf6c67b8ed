//! Distance math, station validation, and GeoJSON conversion.

pub mod distance;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod validation;
