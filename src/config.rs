//! Tunable constants of the decompression engine.
//!
//! Defaults reproduce the reference behaviour. A config can be loaded from a
//! TOML file; missing keys fall back to their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DecoError};

/// Number of stop-depth buckets in a schedule.
pub const STOP_COUNT: usize = 4;

/// How the remaining no-decompression time is derived from the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDecoPolicy {
    /// Last safe trial time minus the requested bottom time, never negative.
    #[default]
    Corrected,
    /// Count of safe trials past the requested time, minus the requested
    /// time again. Matches previously recorded outputs; may go negative.
    Legacy,
}

/// Search over trial bottom times. Both give identical results because the
/// schedule is monotonic in bottom time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    #[default]
    Linear,
    Bisection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecoConfig {
    pub ascent_rate_m_per_min: f64,
    pub descent_rate_m_per_min: f64,
    /// Tissue refresh interval while travelling (minutes).
    pub step_size_min: f64,
    /// Stop depths, shallowest first. The first entry carries the safety stop.
    pub stop_ladder_m: [u32; STOP_COUNT],
    pub safety_stop_min: u32,
    /// Upper bound on decompression stop minutes before giving up.
    pub max_decompression_iterations: u32,
    /// Longest bottom time tried by the no-decompression search.
    pub max_search_trial_minutes: u32,
    pub no_deco_policy: NoDecoPolicy,
    pub search_strategy: SearchStrategy,
}

impl Default for DecoConfig {
    fn default() -> Self {
        DecoConfig {
            ascent_rate_m_per_min: 10.0,
            descent_rate_m_per_min: 10.0,
            step_size_min: 0.1,
            stop_ladder_m: [3, 6, 9, 12],
            safety_stop_min: 3,
            max_decompression_iterations: 1000,
            max_search_trial_minutes: 99,
            no_deco_policy: NoDecoPolicy::Corrected,
            search_strategy: SearchStrategy::Linear,
        }
    }
}

impl DecoConfig {
    pub fn validate(&self) -> Result<(), DecoError> {
        positive("ascent_rate_m_per_min", self.ascent_rate_m_per_min)?;
        positive("descent_rate_m_per_min", self.descent_rate_m_per_min)?;
        positive("step_size_min", self.step_size_min)?;

        if self.stop_ladder_m[0] == 0 {
            return Err(DecoError::invalid_config(
                "stop_ladder_m",
                "stop depths must be greater than 0",
            ));
        }
        if self.stop_ladder_m.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DecoError::invalid_config(
                "stop_ladder_m",
                format!("must be strictly ascending, got {:?}", self.stop_ladder_m),
            ));
        }
        if self.max_decompression_iterations == 0 {
            return Err(DecoError::invalid_config(
                "max_decompression_iterations",
                "must be at least 1",
            ));
        }
        if self.max_search_trial_minutes == 0 {
            return Err(DecoError::invalid_config(
                "max_search_trial_minutes",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: DecoConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded decompression config");
        Ok(config)
    }

    /// Deepest stop on the ladder.
    pub fn deepest_stop_m(&self) -> u32 {
        self.stop_ladder_m[STOP_COUNT - 1]
    }

    /// Shallowest ladder stop at or below `depth_m`, or the deepest stop if
    /// the ladder does not reach that far.
    pub fn stop_for_depth(&self, depth_m: f64) -> u32 {
        self.stop_ladder_m
            .iter()
            .copied()
            .find(|stop| f64::from(*stop) >= depth_m)
            .unwrap_or_else(|| self.deepest_stop_m())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), DecoError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DecoError::invalid_config(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}
