//! Index builder for configurable construction
//!
//! [`KdIndex::from_views`] always builds with the default configuration and
//! treats view mismatches as warnings. The builder lets callers pick a
//! [`Config`] and make construction strict.

use crate::config::{Config, ConsistencyPolicy};
use crate::error::{GeoBucketError, Result};
use crate::index::KdIndex;
use crate::index::bucket::bucketize;
use crate::views::AxisViews;
use geobucket_types::station::Station;

/// Builder for a [`KdIndex`] with custom settings.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: Config,
}

impl IndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Shortcut for the consistency policy alone.
    pub fn consistency(mut self, policy: ConsistencyPolicy) -> Self {
        self.config = self.config.with_consistency(policy);
        self
    }

    /// Build from prepared axis views.
    ///
    /// Fails with [`GeoBucketError::InconsistentViews`] when the views
    /// disagree and the policy is [`ConsistencyPolicy::Reject`].
    pub fn build_from_views(self, views: AxisViews) -> Result<KdIndex> {
        self.config
            .validate()
            .map_err(GeoBucketError::InvalidConfig)?;

        let bucketized = bucketize(views);
        if let Some(mismatch) = bucketized.mismatch
            && self.config.consistency == ConsistencyPolicy::Reject
        {
            return Err(GeoBucketError::InconsistentViews {
                latitude: mismatch.latitude,
                longitude: mismatch.longitude,
            });
        }

        Ok(KdIndex::assemble(bucketized, self.config))
    }

    /// Validate raw stations, derive both views and build.
    ///
    /// Invalid stations are skipped and logged rather than failing the build.
    pub fn build<I>(self, stations: I) -> Result<KdIndex>
    where
        I: IntoIterator<Item = Station>,
    {
        let (views, report) = AxisViews::from_stations(stations);
        if !report.rejected.is_empty() {
            log::info!(
                "Indexing {} stations, {} rejected",
                report.accepted,
                report.rejected.len()
            );
        }
        self.build_from_views(views)
    }
}
