use geobucket::compute::distance::haversine_km;
use geobucket::{AxisViews, IndexBuilder, KdIndex, Station, StationFilter};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random stations inside a small box around the equator.
fn scattered_stations(count: usize, seed: u64) -> Vec<Station> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64) / ((1u64 << 53) as f64)
    };

    let groups = ["WET/WEST", "CET/CEST", "EET/EEST"];
    let countries = ["PT", "ES", "FR", "DE"];
    (0..count)
        .map(|i| {
            let lat = next() * 4.0 - 2.0;
            let lon = next() * 4.0 - 2.0;
            Station::new(
                format!("ST{:05}", i),
                lat,
                lon,
                countries[i % countries.len()],
                groups[i % groups.len()],
            )
            .with_city(i % 2 == 0)
            .with_main_station(i % 5 == 0)
            .with_airport(i % 7 == 0)
        })
        .collect()
}

fn build(stations: Vec<Station>) -> KdIndex {
    IndexBuilder::new()
        .build(stations)
        .expect("Failed to build index")
}

fn sorted_by_distance(stations: &[Station], lat: f64, lon: f64) -> Vec<(f64, &str)> {
    let mut all: Vec<(f64, &str)> = stations
        .iter()
        .map(|s| (haversine_km(lat, lon, s.latitude, s.longitude), s.name.as_str()))
        .collect();
    all.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    all
}

/// Five stations around Lisbon, Porto, and Madrid with one shared coordinate.
fn iberia() -> Vec<Station> {
    vec![
        Station::new("Lisboa Santa Apolonia", 38.71387, -9.122271, "PT", "WET/WEST")
            .with_city(true)
            .with_main_station(true),
        Station::new("Lisboa Terminal", 38.71387, -9.122271, "PT", "WET/WEST").with_city(true),
        Station::new("Porto Campanha", 41.1486, -8.5855, "PT", "WET/WEST")
            .with_city(true)
            .with_main_station(true),
        Station::new("Madrid Atocha", 40.4066, -3.6892, "ES", "CET/CEST")
            .with_city(true)
            .with_main_station(true),
        Station::new("Badajoz", 38.8794, -6.9707, "ES", "CET/CEST"),
    ]
}

#[test]
fn test_iberia_scenario() {
    init_logging();
    let index = build(iberia());

    assert_eq!(index.size(), 4);
    assert_eq!(index.station_count(), 5);
    assert_eq!(index.height(), 3);
    assert_eq!(index.bucket_size_distribution().get(&2), Some(&1));
    assert_eq!(index.bucket_size_distribution().get(&1), Some(&3));

    let nearest = index.nearest_neighbor(38.72, -9.13).unwrap();
    assert_eq!(nearest.station.name, "Lisboa Santa Apolonia");

    let lisbon = index.circular_range_query(38.71387, -9.122271, 1.0);
    let names: Vec<&str> = lisbon.iter().map(|r| r.station.name.as_str()).collect();
    assert_eq!(names, vec!["Lisboa Santa Apolonia", "Lisboa Terminal"]);
    assert!(lisbon.iter().all(|r| r.distance_km == 0.0));

    let spanish = index.k_nearest_in_time_zone(38.71387, -9.122271, 5, "CET/CEST");
    let names: Vec<&str> = spanish.iter().map(|r| r.station.name.as_str()).collect();
    assert_eq!(names, vec!["Badajoz", "Madrid Atocha"]);
}

#[test]
fn test_range_query_matches_brute_force() {
    init_logging();
    let stations = scattered_stations(2_000, 7);
    let index = build(stations.clone());

    let boxes = [
        (-0.5, 0.5, -0.5, 0.5),
        (-2.0, 2.0, -2.0, 2.0),
        (1.0, 1.9, -1.9, -1.0),
        (0.3, 0.31, 0.0, 2.0),
    ];
    for (min_lat, max_lat, min_lon, max_lon) in boxes {
        let mut expected: Vec<&str> = stations
            .iter()
            .filter(|s| {
                s.latitude >= min_lat
                    && s.latitude <= max_lat
                    && s.longitude >= min_lon
                    && s.longitude <= max_lon
            })
            .map(|s| s.name.as_str())
            .collect();
        expected.sort();

        let actual: Vec<&str> = index
            .range_query(min_lat, max_lat, min_lon, max_lon)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_range_query_rect_matches_range_query() {
    let index = build(scattered_stations(500, 11));
    let rect = geobucket::Rect::new(
        geo::coord! { x: -1.0, y: -0.5 },
        geo::coord! { x: 0.5, y: 1.5 },
    );
    assert_eq!(
        index.range_query_rect(&rect),
        index.range_query(-0.5, 1.5, -1.0, 0.5)
    );
}

#[test]
fn test_circular_query_matches_brute_force() {
    let stations = scattered_stations(2_000, 13);
    let index = build(stations.clone());

    for (lat, lon, radius) in [(0.0, 0.0, 50.0), (1.5, -1.5, 120.0), (-1.9, 1.9, 10.0)] {
        let expected: Vec<(f64, &str)> = sorted_by_distance(&stations, lat, lon)
            .into_iter()
            .filter(|(d, _)| *d <= radius)
            .collect();
        let actual: Vec<(f64, &str)> = index
            .circular_range_query(lat, lon, radius)
            .iter()
            .map(|r| (r.distance_km, r.station.name.as_str()))
            .collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_nearest_neighbor_matches_brute_force() {
    let stations = scattered_stations(3_000, 17);
    let index = build(stations.clone());

    for (lat, lon) in [(0.0, 0.0), (1.99, 1.99), (-1.2, 0.7), (2.5, 2.5)] {
        let expected = sorted_by_distance(&stations, lat, lon)[0];
        let actual = index.nearest_neighbor(lat, lon).unwrap();
        assert_eq!(actual.distance_km, expected.0);
        assert_eq!(actual.station.name, expected.1);
    }
}

#[test]
fn test_k_nearest_matches_brute_force() {
    let stations = scattered_stations(3_000, 19);
    let index = build(stations.clone());

    for k in [1usize, 5, 32] {
        let expected: Vec<f64> = sorted_by_distance(&stations, 0.25, -0.75)
            .into_iter()
            .take(k)
            .map(|(d, _)| d)
            .collect();
        let actual: Vec<f64> = index
            .k_nearest(0.25, -0.75, k)
            .iter()
            .map(|r| r.distance_km)
            .collect();
        assert_eq!(actual, expected, "k = {}", k);
    }
}

#[test]
fn test_k_equal_one_agrees_with_nearest() {
    let index = build(scattered_stations(1_000, 23));
    for (lat, lon) in [(0.1, 0.1), (-1.0, 1.0), (1.7, -0.3)] {
        let nearest = index.nearest_neighbor(lat, lon).unwrap();
        let knn = index.k_nearest(lat, lon, 1);
        assert_eq!(knn.len(), 1);
        assert_eq!(knn[0], nearest);
    }
}

#[test]
fn test_filtered_k_nearest_matches_brute_force() {
    let stations = scattered_stations(2_000, 29);
    let index = build(stations.clone());

    let filter = StationFilter {
        country: Some("FR".into()),
        main_station: Some(true),
        ..Default::default()
    };
    let matching: Vec<Station> = stations
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect();
    let expected: Vec<f64> = sorted_by_distance(&matching, -0.4, 0.9)
        .into_iter()
        .take(10)
        .map(|(d, _)| d)
        .collect();

    let actual = index.k_nearest_matching(-0.4, 0.9, 10, &filter);
    assert!(actual.iter().all(|r| filter.matches(r.station)));
    let distances: Vec<f64> = actual.iter().map(|r| r.distance_km).collect();
    assert_eq!(distances, expected);
}

#[test]
fn test_time_zone_filter_equals_struct_filter() {
    let index = build(scattered_stations(1_000, 31));
    let by_group = index.k_nearest_in_time_zone(0.0, 0.0, 8, "EET/EEST");
    let by_filter =
        index.k_nearest_matching(0.0, 0.0, 8, &StationFilter::time_zone_group("EET/EEST"));
    assert_eq!(by_group, by_filter);
    assert!(by_group.iter().all(|r| r.station.time_zone_group == "EET/EEST"));
}

#[test]
fn test_time_zone_lookups_match_brute_force() {
    let stations = scattered_stations(1_200, 53);
    let index = build(stations.clone());

    let mut expected: Vec<&str> = stations
        .iter()
        .filter(|s| s.time_zone_group == "CET/CEST")
        .map(|s| s.name.as_str())
        .collect();
    expected.sort();
    let actual: Vec<&str> = index
        .stations_in_time_zone("CET/CEST")
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(actual, expected);

    let window = index.stations_in_time_zone_window(&["EET/EEST", "WET/WEST"]);
    assert_eq!(window.len(), 800);
    assert!(window.iter().all(|s| s.time_zone_group != "CET/CEST"));
    let keys: Vec<(&str, &str, &str)> = window
        .iter()
        .map(|s| (s.time_zone_group.as_str(), s.country.as_str(), s.name.as_str()))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_axis_ranges_match_brute_force() {
    let stations = scattered_stations(1_000, 59);
    let (views, _) = AxisViews::from_stations(stations.clone());

    let in_band = views.latitude_range(-0.25, 0.75);
    let expected = stations
        .iter()
        .filter(|s| s.latitude >= -0.25 && s.latitude <= 0.75)
        .count();
    assert_eq!(in_band.len(), expected);
    assert!(in_band.windows(2).all(|w| w[0].latitude <= w[1].latitude));

    let in_strip = views.longitude_range(1.0, 2.0);
    let expected = stations.iter().filter(|s| s.longitude >= 1.0).count();
    assert_eq!(in_strip.len(), expected);
    assert!(in_strip.windows(2).all(|w| w[0].longitude <= w[1].longitude));
}

#[test]
fn test_radius_growth_is_monotonic() {
    let index = build(scattered_stations(1_500, 37));
    let mut previous = 0;
    for radius in [0.0, 5.0, 25.0, 60.0, 150.0, 600.0] {
        let count = index.circular_range_query(0.5, 0.5, radius).len();
        assert!(count >= previous);
        previous = count;
    }
    assert_eq!(previous, 1_500);
}

#[test]
fn test_tree_is_optimally_balanced() {
    for count in [1usize, 2, 10, 127, 128, 1_000] {
        let index = build(scattered_stations(count, 41));
        let expected = ((count + 1) as f64).log2().ceil() as usize;
        assert_eq!(index.height(), expected, "count = {}", count);
    }
}

#[test]
fn test_radius_search_summary() {
    let index = build(iberia());
    let search = index.radius_search(38.71387, -9.122271, 250.0);

    assert_eq!(search.total_stations(), 3);
    let first = &search.groups()[0];
    assert_eq!(first.distance_km, 0.0);
    let names: Vec<&str> = first.stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Lisboa Terminal", "Lisboa Santa Apolonia"]);

    let summary = search.summary();
    assert_eq!(summary.count_by_country.get("PT"), Some(&2));
    assert_eq!(summary.count_by_country.get("ES"), Some(&1));
    assert_eq!(summary.top_countries(5), vec![("PT", 2), ("ES", 1)]);
}

#[test]
fn test_concurrent_queries_share_one_index() {
    init_logging();
    let stations = scattered_stations(2_000, 43);
    let index = build(stations.clone());
    let expected = index.k_nearest(0.0, 0.0, 10);

    std::thread::scope(|scope| {
        for t in 0..4 {
            let index = &index;
            let expected = &expected;
            scope.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(&index.k_nearest(0.0, 0.0, 10), expected);
                    let offset = t as f64 * 0.1;
                    assert!(index.nearest_neighbor(offset, offset).is_some());
                    assert_eq!(index.size(), 2_000);
                }
            });
        }
    });
}

#[test]
fn test_from_views_equals_builder() {
    let stations = scattered_stations(300, 47);
    let (views, report) = AxisViews::from_stations(stations.clone());
    assert_eq!(report.accepted, 300);

    let direct = KdIndex::from_views(views);
    let built = build(stations);
    assert_eq!(direct.size(), built.size());
    assert_eq!(direct.height(), built.height());
    assert_eq!(direct.k_nearest(0.0, 0.0, 20), built.k_nearest(0.0, 0.0, 20));
}

#[cfg(feature = "geojson")]
#[test]
fn test_geojson_export_of_query_results() {
    use geobucket::compute::geojson::{distances_to_geojson, stations_to_geojson};

    let index = build(iberia());
    let text = distances_to_geojson(&index.k_nearest(40.0, -4.0, 2)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["features"][0]["properties"]["name"], "Madrid Atocha");

    let text = stations_to_geojson(index.range_query(38.0, 39.0, -10.0, -6.0)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["features"].as_array().unwrap().len(), 3);
}
