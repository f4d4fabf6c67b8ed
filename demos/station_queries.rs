//! Station Query Example
//!
//! Builds an index over a handful of Iberian railway stations and runs every
//! query type against it. Run with `RUST_LOG=debug` to see construction logs.

use geobucket::{IndexBuilder, Station, StationFilter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== geobucket station queries ===\n");

    let stations = vec![
        Station::new("Lisboa Santa Apolonia", 38.71387, -9.122271, "PT", "WET/WEST")
            .with_time_zone("Europe/Lisbon")
            .with_city(true)
            .with_main_station(true),
        Station::new("Lisboa Oriente", 38.7679, -9.0990, "PT", "WET/WEST")
            .with_time_zone("Europe/Lisbon")
            .with_city(true),
        Station::new("Porto Campanha", 41.1486, -8.5855, "PT", "WET/WEST")
            .with_time_zone("Europe/Lisbon")
            .with_city(true)
            .with_main_station(true),
        Station::new("Faro", 37.0194, -7.9400, "PT", "WET/WEST")
            .with_time_zone("Europe/Lisbon")
            .with_airport(true),
        Station::new("Badajoz", 38.8794, -6.9707, "ES", "CET/CEST")
            .with_time_zone("Europe/Madrid"),
        Station::new("Madrid Atocha", 40.4066, -3.6892, "ES", "CET/CEST")
            .with_time_zone("Europe/Madrid")
            .with_city(true)
            .with_main_station(true),
        Station::new("Sevilla Santa Justa", 37.3919, -5.9756, "ES", "CET/CEST")
            .with_time_zone("Europe/Madrid")
            .with_city(true)
            .with_main_station(true),
    ];

    let index = IndexBuilder::new().build(stations)?;
    println!("{}\n", index.summary());

    // 1. Rectangle
    println!("1. Stations between 38N-42N and 10W-8W");
    for station in index.range_query(38.0, 42.0, -10.0, -8.0) {
        println!("   {}", station.name);
    }

    // 2. Circle
    println!("\n2. Stations within 300 km of Lisbon");
    for hit in index.circular_range_query(38.71387, -9.122271, 300.0) {
        println!("   {}", hit);
    }

    // 3. Nearest
    if let Some(nearest) = index.nearest_neighbor(37.5, -6.5) {
        println!("\n3. Nearest station to (37.5, -6.5): {}", nearest);
    }

    // 4. k-nearest, plain and filtered
    println!("\n4. Three nearest CET/CEST stations to Lisbon");
    for hit in index.k_nearest_in_time_zone(38.71387, -9.122271, 3, "CET/CEST") {
        println!("   {}", hit);
    }

    let filter = StationFilter {
        country: Some("ES".into()),
        main_station: Some(true),
        ..Default::default()
    };
    println!("\n   Two nearest with [{}]", filter);
    for hit in index.k_nearest_matching(39.0, -7.0, 2, &filter) {
        println!("   {}", hit);
    }

    println!("\n   Stations in the WET/WEST group:");
    for station in index.stations_in_time_zone("WET/WEST") {
        println!("   {}", station.name);
    }

    // 5. Radius search with density summary
    let search = index.radius_search(38.71387, -9.122271, 500.0);
    println!("\n5. {}", search);
    for group in search.groups() {
        let names: Vec<&str> = group.stations.iter().map(|s| s.name.as_str()).collect();
        println!("   {:>8.2} km: {}", group.distance_km, names.join(", "));
    }
    println!("\n{}", search.summary());

    #[cfg(feature = "geojson")]
    {
        let geojson = geobucket::compute::geojson::distances_to_geojson(&index.k_nearest(
            40.0, -4.0, 2,
        ))?;
        println!("GeoJSON of the two stations nearest Madrid:\n{}", geojson);
    }

    Ok(())
}
