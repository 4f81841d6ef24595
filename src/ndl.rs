//! No-decompression time search.
//!
//! Finds the longest bottom time at a depth that still needs only the safety
//! stop, by re-running descent and bottom time from a fresh surface state for
//! each trial time. A trial needs only the safety stop exactly when no
//! compartment has a ceiling on arrival at the end of the bottom phase, so
//! trials never enter the capped stop loop. The linear search costs one run
//! per minute up to `max_search_trial_minutes`; bisection gives the same answer in
//! logarithmically many runs because stop time never shrinks as bottom time
//! grows.

use crate::config::{NoDecoPolicy, SearchStrategy};
use crate::error::DecoError;
use crate::simulator::DiveSimulator;

#[derive(Debug, Clone, Copy)]
pub struct NoDecoSearch<'a> {
    sim: DiveSimulator<'a>,
    depth_m: f64,
}

impl<'a> NoDecoSearch<'a> {
    pub fn new(sim: DiveSimulator<'a>, depth_m: f64) -> Self {
        NoDecoSearch { sim, depth_m }
    }

    fn max_trial(&self) -> u32 {
        self.sim.config().max_search_trial_minutes
    }

    /// Whether `bottom_time_min` at this depth needs only the safety stop.
    pub fn is_safety_stop_only(&self, bottom_time_min: u32) -> bool {
        self.sim
            .load_to_bottom(self.depth_m, bottom_time_min)
            .ceiling_above_surface()
            .is_none()
    }

    /// Longest safety-stop-only bottom time in `from_min..=max_search_trial_minutes`.
    ///
    /// Fails with [`DecoError::SearchExhausted`] when `from_min` itself is
    /// past the trial ceiling or already needs decompression.
    pub fn last_safe_bottom_time(&self, from_min: u32) -> Result<u32, DecoError> {
        let max_trial = self.max_trial();
        if from_min > max_trial || !self.is_safety_stop_only(from_min) {
            return Err(DecoError::SearchExhausted {
                max_trial_minutes: max_trial,
            });
        }

        match self.sim.config().search_strategy {
            SearchStrategy::Linear => Ok(self.linear(from_min, max_trial)),
            SearchStrategy::Bisection => Ok(self.bisect(from_min, max_trial)),
        }
    }

    fn linear(&self, safe_min: u32, max_trial: u32) -> u32 {
        let mut last_safe = safe_min;
        for trial in safe_min + 1..=max_trial {
            if !self.is_safety_stop_only(trial) {
                break;
            }
            last_safe = trial;
        }
        last_safe
    }

    fn bisect(&self, safe_min: u32, max_trial: u32) -> u32 {
        if self.is_safety_stop_only(max_trial) {
            return max_trial;
        }
        // safe at lo, decompression at hi
        let (mut lo, mut hi) = (safe_min, max_trial);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.is_safety_stop_only(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Number of consecutive safe trials after `requested_min`, capped at
    /// `max_search_trial_minutes`. Always linear.
    fn legacy_safe_trials(&self, requested_min: u32) -> u32 {
        let max_trial = self.max_trial();
        let mut count = 0;
        while count < max_trial && self.is_safety_stop_only(requested_min + 1 + count) {
            count += 1;
        }
        count
    }

    /// Remaining no-decompression minutes after `requested_min` at depth.
    pub fn remaining(&self, requested_min: u32) -> Result<i32, DecoError> {
        match self.sim.config().no_deco_policy {
            NoDecoPolicy::Corrected => {
                let last_safe = self.last_safe_bottom_time(requested_min)?;
                Ok(saturating_i32(last_safe - requested_min))
            }
            NoDecoPolicy::Legacy => {
                if !self.is_safety_stop_only(requested_min) {
                    return Ok(0);
                }
                let count = self.legacy_safe_trials(requested_min);
                Ok(saturating_i32(count).saturating_sub(saturating_i32(requested_min)))
            }
        }
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
