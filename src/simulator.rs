//! Square-profile dive simulation.
//!
//! A run starts from surface equilibrium, descends at the configured rate,
//! spends the bottom time at depth and then works up the stop ladder one
//! minute at a time until every compartment tolerates the surface. Travel
//! is approximated as a staircase of short exposures, one per
//! `step_size_min`, each taken at the depth reached at the end of the step.
//!
//! Every phase takes [`Tissues`] by value and returns the updated state, so a
//! run owns exactly one compartment sequence and nothing outlives it.

use crate::buhlmann::{ambient_pressure, depth_for_pressure, Tissues};
use crate::config::DecoConfig;
use crate::error::DecoError;
use crate::gas::inert_fraction;
use crate::models::DecoSchedule;

/// Absorbs rounding when a travel distance is a whole number of steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Simulates dives for one breathing gas under one config.
#[derive(Debug, Clone, Copy)]
pub struct DiveSimulator<'a> {
    config: &'a DecoConfig,
    inert_fraction: f64,
}

impl<'a> DiveSimulator<'a> {
    pub fn new(config: &'a DecoConfig, oxygen_fraction: f64) -> Self {
        DiveSimulator {
            config,
            inert_fraction: inert_fraction(oxygen_fraction),
        }
    }

    pub fn config(&self) -> &'a DecoConfig {
        self.config
    }

    /// Compartments equilibrated at the surface on this gas.
    pub fn surface_tissues(&self) -> Tissues {
        Tissues::surface_equilibrium(self.inert_fraction)
    }

    /// Inspired inert-gas pressure at `depth_m`.
    pub fn inspired_pressure(&self, depth_m: f64) -> f64 {
        ambient_pressure(depth_m) * self.inert_fraction
    }

    /// Move from `from_m` to `to_m` at the ascent or descent rate.
    ///
    /// Only whole steps are simulated; a remainder shorter than one step is
    /// not.
    pub fn travel(&self, tissues: Tissues, from_m: f64, to_m: f64) -> Tissues {
        let rate = if to_m > from_m {
            self.config.descent_rate_m_per_min
        } else {
            self.config.ascent_rate_m_per_min
        };
        let step_distance = rate * self.config.step_size_min;
        let direction = if to_m > from_m { 1.0 } else { -1.0 };
        let steps = ((to_m - from_m).abs() / step_distance + STEP_TOLERANCE).floor() as u32;

        (1..=steps).fold(tissues, |tissues, step| {
            let depth_m = from_m + direction * step_distance * f64::from(step);
            tissues.expose(self.inspired_pressure(depth_m), self.config.step_size_min)
        })
    }

    /// Descend from the surface to `depth_m`.
    pub fn descend(&self, tissues: Tissues, depth_m: f64) -> Tissues {
        self.travel(tissues, 0.0, depth_m)
    }

    /// Stay at `depth_m` for `minutes`.
    pub fn hold(&self, tissues: Tissues, depth_m: f64, minutes: f64) -> Tissues {
        tissues.expose(self.inspired_pressure(depth_m), minutes)
    }

    /// Fresh surface state carried through descent and bottom time.
    pub fn load_to_bottom(&self, depth_m: f64, bottom_time_min: u32) -> Tissues {
        let tissues = self.descend(self.surface_tissues(), depth_m);
        self.hold(tissues, depth_m, f64::from(bottom_time_min))
    }

    /// Staged ascent from `from_m` until no compartment has a ceiling.
    ///
    /// Each iteration targets the ladder stop for the controlling ceiling,
    /// travels there, and spends one minute at it. Fails with
    /// [`DecoError::NonConvergence`] after `max_decompression_iterations`
    /// stop minutes.
    pub fn decompress(
        &self,
        mut tissues: Tissues,
        from_m: f64,
    ) -> Result<(Tissues, DecoSchedule), DecoError> {
        let mut schedule = DecoSchedule::safety_stop_only(self.config);
        let mut last_stop_m = from_m;
        let mut iterations = 0;

        while let Some((leading, ceiling)) = tissues.ceiling_above_surface() {
            if iterations >= self.config.max_decompression_iterations {
                tracing::warn!(
                    iterations,
                    leading,
                    ceiling,
                    "decompression schedule did not converge"
                );
                return Err(DecoError::NonConvergence { iterations });
            }

            let stop = self.config.stop_for_depth(depth_for_pressure(ceiling));
            let stop_m = f64::from(stop);
            tissues = self.travel(tissues, last_stop_m, stop_m);
            tissues = self.hold(tissues, stop_m, 1.0);
            schedule.add_minute(stop);
            tracing::trace!(stop_m = stop, leading, ceiling, "decompression stop minute");

            last_stop_m = stop_m;
            iterations += 1;
        }

        Ok((tissues, schedule))
    }

    /// Full run: descent, bottom time and staged ascent.
    pub fn run(&self, depth_m: f64, bottom_time_min: u32) -> Result<DecoSchedule, DecoError> {
        let tissues = self.load_to_bottom(depth_m, bottom_time_min);
        let (_, schedule) = self.decompress(tissues, depth_m)?;
        Ok(schedule)
    }
}
