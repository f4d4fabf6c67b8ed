//! GeoJSON export of stations and query results.

use crate::error::Result;
use crate::index::StationDistance;
use geobucket_types::station::Station;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

fn station_properties(station: &Station) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(station.name));
    properties.insert("country".to_string(), json!(station.country));
    properties.insert("time_zone".to_string(), json!(station.time_zone));
    properties.insert("time_zone_group".to_string(), json!(station.time_zone_group));
    properties.insert("is_city".to_string(), json!(station.is_city));
    properties.insert("is_main_station".to_string(), json!(station.is_main_station));
    properties.insert("is_airport".to_string(), json!(station.is_airport));
    properties
}

/// A Point feature (longitude first) carrying the station attributes.
pub fn station_to_feature(station: &Station) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            station.longitude,
            station.latitude,
        ]))),
        id: None,
        properties: Some(station_properties(station)),
        foreign_members: None,
    }
}

fn collection_to_string(features: Vec<Feature>) -> Result<String> {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    Ok(serde_json::to_string(&collection)?)
}

/// Serialize stations as a FeatureCollection.
pub fn stations_to_geojson<'a, I>(stations: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Station>,
{
    collection_to_string(stations.into_iter().map(station_to_feature).collect())
}

/// Serialize distance-annotated results, adding a `distance_km` property.
pub fn distances_to_geojson(results: &[StationDistance<'_>]) -> Result<String> {
    let features = results
        .iter()
        .map(|result| {
            let mut feature = station_to_feature(result.station);
            if let Some(properties) = feature.properties.as_mut() {
                properties.insert("distance_km".to_string(), json!(result.distance_km));
            }
            feature
        })
        .collect();
    collection_to_string(features)
}
