//! Decompression core for a single-gas recreational dive.
//!
//! Given depth, bottom time and oxygen fraction, computes the staged stop
//! schedule and the remaining no-decompression time with a Bühlmann ZHL-16
//! tissue model. Every computation is pure: it starts from surface
//! equilibrium and keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use submerge_deco::{plan_dive, DecoConfig, DiveParameters};
//!
//! let params = DiveParameters {
//!     depth_m: 18.0,
//!     bottom_time_min: 40,
//!     oxygen_fraction: 0.21,
//!     safety_factor: 1,
//! };
//! let summary = plan_dive(&params, &DecoConfig::default()).expect("valid dive");
//! assert_eq!(summary.deco_minutes, 0);
//! assert!(summary.no_deco_minutes > 0);
//! ```

pub mod buhlmann;
pub mod config;
pub mod error;
pub mod gas;
pub mod input;
pub mod models;
pub mod ndl;
pub mod planner;
pub mod simulator;

uniffi::include_scaffolding!("submerge");

pub use config::{DecoConfig, NoDecoPolicy, SearchStrategy};
pub use error::{ConfigError, DecoError, InputError};
pub use input::parse_dive_plan;
pub use models::{DecoSchedule, DecoStop, DiveParameters, DiveSummary, SafetyFactor};
pub use planner::plan_dive;

/// Host entry point: compute with the default config.
pub fn compute_dive(params: DiveParameters) -> Result<DiveSummary, DecoError> {
    plan_dive(&params, &DecoConfig::default())
}

/// Host entry point: maximum operating depth (m) for a gas at `max_ppo2`.
pub fn maximum_operating_depth(oxygen_fraction: f64, max_ppo2: f64) -> Result<f64, DecoError> {
    gas::maximum_operating_depth(oxygen_fraction, max_ppo2)
}
