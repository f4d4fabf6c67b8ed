//! Balanced, bucketed 2D k-d tree for proximity and range queries over geo-tagged stations.
//!
//! ```rust
//! use geobucket::{IndexBuilder, Station, StationFilter};
//!
//! let index = IndexBuilder::new().build(vec![
//!     Station::new("Lisboa Oriente", 38.7679, -9.0990, "PT", "WET/WEST").with_main_station(true),
//!     Station::new("Porto Campanha", 41.1486, -8.5855, "PT", "WET/WEST"),
//!     Station::new("Madrid Atocha", 40.4066, -3.6892, "ES", "CET/CEST"),
//! ])?;
//!
//! let in_box = index.range_query(38.0, 42.0, -10.0, -8.0);
//! assert_eq!(in_box.len(), 2);
//!
//! let closest = index.k_nearest_in_time_zone(40.0, -4.0, 1, "CET/CEST");
//! assert_eq!(closest[0].station.name, "Madrid Atocha");
//!
//! let main = StationFilter { main_station: Some(true), ..Default::default() };
//! assert_eq!(index.k_nearest_matching(41.0, -8.6, 5, &main).len(), 1);
//! # Ok::<(), geobucket::GeoBucketError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod search;
pub mod views;

pub use builder::IndexBuilder;
pub use config::{Config, ConsistencyPolicy};
pub use error::{GeoBucketError, Result};

pub use index::{Axis, CoordinateBucket, KdIndex, KdNode, NodeId, StationDistance, ViewMismatch};

pub use search::{DensitySummary, DistanceGroup, RadiusSearch};

pub use views::{AxisEntry, AxisViews, ViewLoadReport};

pub use geobucket_types::filter::StationFilter;
pub use geobucket_types::station::Station;
pub use geobucket_types::stats::TreeStats;

pub use geo::{Point, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoBucketError, IndexBuilder, KdIndex, Result};

    pub use crate::{AxisViews, Station, StationDistance, StationFilter};

    pub use crate::{Config, ConsistencyPolicy};

    pub use crate::{RadiusSearch, TreeStats};

    pub use geo::{Point, Rect};
}
