//! Index configuration.
//!
//! Configuration is plain serde data with per-field defaults, so a partial
//! JSON (or TOML, with the `toml` feature) document is enough.
use crate::error::{GeoBucketError, Result};
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for `distance_group_decimals`; beyond this f64 rounding is noise.
const MAX_DISTANCE_GROUP_DECIMALS: u32 = 12;

/// What construction does when the latitude and longitude views report
/// different station totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// Log a warning, build from the latitude view and keep the diagnostic.
    #[default]
    Warn,
    /// Refuse to build.
    Reject,
}

/// Index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub consistency: ConsistencyPolicy,

    /// Decimals kept when grouping radius-search results by distance
    #[serde(default = "Config::default_distance_group_decimals")]
    pub distance_group_decimals: u32,
}

impl Config {
    const fn default_distance_group_decimals() -> u32 {
        2
    }

    pub fn with_consistency(mut self, policy: ConsistencyPolicy) -> Self {
        self.consistency = policy;
        self
    }

    pub fn with_distance_group_decimals(mut self, decimals: u32) -> Self {
        assert!(
            decimals <= MAX_DISTANCE_GROUP_DECIMALS,
            "Distance group decimals must be at most {}",
            MAX_DISTANCE_GROUP_DECIMALS
        );
        self.distance_group_decimals = decimals;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.distance_group_decimals > MAX_DISTANCE_GROUP_DECIMALS {
            return Err(format!(
                "Distance group decimals must be at most {}, got {}",
                MAX_DISTANCE_GROUP_DECIMALS, self.distance_group_decimals
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file. `.toml` files need the `toml` feature;
    /// anything else is parsed as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            #[cfg(feature = "toml")]
            {
                return Self::from_toml(&contents)
                    .map_err(|e| GeoBucketError::InvalidConfig(e.to_string()));
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(GeoBucketError::InvalidConfig(format!(
                    "{} is a TOML file but the `toml` feature is disabled",
                    path.display()
                )));
            }
        }

        let config: Config = serde_json::from_str(&contents)?;
        config.validate().map_err(GeoBucketError::InvalidConfig)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            consistency: ConsistencyPolicy::default(),
            distance_group_decimals: Self::default_distance_group_decimals(),
        }
    }
}
