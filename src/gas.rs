//! Breathing-gas helpers for a single nitrox mix.

use crate::buhlmann::depth_for_pressure;
use crate::error::DecoError;

/// Oxygen fraction of air.
pub const AIR_OXYGEN_FRACTION: f64 = 0.21;

/// Default oxygen partial-pressure limit for the maximum operating depth (atm).
pub const DEFAULT_MAX_PPO2: f64 = 1.6;

/// Fraction of the mix that is inert.
pub fn inert_fraction(oxygen_fraction: f64) -> f64 {
    1.0 - oxygen_fraction
}

/// Deepest depth (m) at which the mix stays within `max_ppo2`.
pub fn maximum_operating_depth(oxygen_fraction: f64, max_ppo2: f64) -> Result<f64, DecoError> {
    if !(oxygen_fraction > 0.0 && oxygen_fraction <= 1.0) {
        return Err(DecoError::invalid_input(
            "oxygen_fraction",
            format!("must be in (0, 1], got {oxygen_fraction}"),
        ));
    }
    if !(max_ppo2.is_finite() && max_ppo2 > 0.0) {
        return Err(DecoError::invalid_input(
            "max_ppo2",
            format!("must be a positive pressure, got {max_ppo2}"),
        ));
    }
    Ok(depth_for_pressure(max_ppo2 / oxygen_fraction).max(0.0))
}
