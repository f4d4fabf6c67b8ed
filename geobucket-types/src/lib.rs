//! # geobucket-types
//!
//! Core data types for the geobucket spatial index.
//!
//! - **Stations**: `Station`, the immutable geo-tagged record that gets indexed
//! - **Filters**: `StationFilter`, an optional conjunction over station attributes
//! - **Statistics**: `TreeStats`, a snapshot of tree size, height and bucket density
//!
//! All types are serializable with Serde and expose their position as a
//! `geo::Point` (x = longitude, y = latitude).
//!
//! ## Examples
//!
//! ```rust
//! use geobucket_types::filter::StationFilter;
//! use geobucket_types::station::Station;
//!
//! let lisbon = Station::new("Lisboa Oriente", 38.7679, -9.0990, "PT", "WET/WEST")
//!     .with_main_station(true);
//! assert_eq!(lisbon.point().y(), 38.7679);
//!
//! let filter = StationFilter {
//!     country: Some("PT".into()),
//!     main_station: Some(true),
//!     ..Default::default()
//! };
//! assert!(filter.matches(&lisbon));
//! ```

pub mod filter;
pub mod station;
pub mod stats;
