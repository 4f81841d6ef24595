use crate::config::{DecoConfig, STOP_COUNT};
use crate::error::DecoError;

/// Conservatism setting chosen by the diver.
///
/// Accepted and validated but does not change the computation yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SafetyFactor {
    None,
    #[default]
    Moderate,
    High,
}

impl SafetyFactor {
    pub fn from_level(level: u8) -> Result<Self, DecoError> {
        match level {
            0 => Ok(SafetyFactor::None),
            1 => Ok(SafetyFactor::Moderate),
            2 => Ok(SafetyFactor::High),
            other => Err(DecoError::invalid_input(
                "safety_factor",
                format!("must be 0, 1 or 2, got {other}"),
            )),
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            SafetyFactor::None => 0,
            SafetyFactor::Moderate => 1,
            SafetyFactor::High => 2,
        }
    }

    /// Next setting in the 0 → 1 → 2 → 0 toggle order.
    pub fn cycle(&self) -> Self {
        match self {
            SafetyFactor::None => SafetyFactor::Moderate,
            SafetyFactor::Moderate => SafetyFactor::High,
            SafetyFactor::High => SafetyFactor::None,
        }
    }
}

/// Dive inputs as the host supplies them.
#[derive(Clone, Debug, PartialEq)]
pub struct DiveParameters {
    pub depth_m: f64,
    pub bottom_time_min: i32,
    pub oxygen_fraction: f64,
    /// 0, 1 or 2. See [`SafetyFactor`].
    pub safety_factor: u8,
}

/// Inputs that passed validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidatedDive {
    pub depth_m: f64,
    pub bottom_time_min: u32,
    pub oxygen_fraction: f64,
    pub safety_factor: SafetyFactor,
}

impl DiveParameters {
    pub fn validate(&self) -> Result<ValidatedDive, DecoError> {
        let bottom_time_min = u32::try_from(self.bottom_time_min).map_err(|_| {
            DecoError::invalid_input(
                "bottom_time_min",
                format!("must be >= 0, got {}", self.bottom_time_min),
            )
        })?;
        Ok(ValidatedDive {
            depth_m: validate_depth(self.depth_m)?,
            bottom_time_min,
            oxygen_fraction: validate_oxygen_fraction(self.oxygen_fraction)?,
            safety_factor: SafetyFactor::from_level(self.safety_factor)?,
        })
    }
}

/// Finite depth at or below the surface.
///
/// There is no upper bound. Travel to depth takes one tissue update per
/// `step_size_min`, so the cost of a computation grows linearly with depth
/// and the host is expected to bound its own input range.
pub fn validate_depth(depth_m: f64) -> Result<f64, DecoError> {
    if depth_m.is_finite() && depth_m >= 0.0 {
        Ok(depth_m)
    } else {
        Err(DecoError::invalid_input(
            "depth_m",
            format!("must be a finite depth >= 0, got {depth_m}"),
        ))
    }
}

/// Oxygen fraction strictly between 0 and 1, so some inert gas remains.
pub fn validate_oxygen_fraction(oxygen_fraction: f64) -> Result<f64, DecoError> {
    if oxygen_fraction > 0.0 && oxygen_fraction < 1.0 {
        Ok(oxygen_fraction)
    } else {
        Err(DecoError::invalid_input(
            "oxygen_fraction",
            format!("must be in (0, 1), got {oxygen_fraction}"),
        ))
    }
}

/// Minutes at one stop depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoStop {
    pub depth_m: u32,
    pub minutes: u32,
}

/// Accumulated stop minutes per ladder depth, shallowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoSchedule {
    stops: [DecoStop; STOP_COUNT],
    safety_stop_min: u32,
}

impl DecoSchedule {
    /// Schedule holding only the mandatory safety stop at the shallowest depth.
    pub fn safety_stop_only(config: &DecoConfig) -> Self {
        let mut stops = config.stop_ladder_m.map(|depth_m| DecoStop {
            depth_m,
            minutes: 0,
        });
        stops[0].minutes = config.safety_stop_min;
        DecoSchedule {
            stops,
            safety_stop_min: config.safety_stop_min,
        }
    }

    /// Add one minute at the ladder stop `depth_m`. Depths off the ladder are ignored.
    pub fn add_minute(&mut self, depth_m: u32) {
        if let Some(stop) = self.stops.iter_mut().find(|s| s.depth_m == depth_m) {
            stop.minutes += 1;
        }
    }

    pub fn stops(&self) -> &[DecoStop; STOP_COUNT] {
        &self.stops
    }

    pub fn minutes_at(&self, depth_m: u32) -> Option<u32> {
        self.stops
            .iter()
            .find(|s| s.depth_m == depth_m)
            .map(|s| s.minutes)
    }

    pub fn total_minutes(&self) -> u32 {
        self.stops.iter().map(|s| s.minutes).sum()
    }

    /// Stop minutes beyond the mandatory safety stop.
    pub fn deco_minutes(&self) -> u32 {
        self.total_minutes().saturating_sub(self.safety_stop_min)
    }

    pub fn requires_decompression(&self) -> bool {
        self.deco_minutes() > 0
    }
}

/// Values the host renders after a computation.
#[derive(Clone, Debug, PartialEq)]
pub struct DiveSummary {
    pub deco_minutes: u32,
    /// Remaining no-decompression minutes. Only the legacy policy goes negative.
    pub no_deco_minutes: i32,
    /// Not computed; always 0.
    pub no_fly_hours: u32,
    pub stops: Vec<DecoStop>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(depth_m: f64, bottom_time_min: i32, oxygen_fraction: f64) -> DiveParameters {
        DiveParameters {
            depth_m,
            bottom_time_min,
            oxygen_fraction,
            safety_factor: 1,
        }
    }

    #[test]
    fn test_validate_accepts_recreational_dive() {
        let dive = params(18.0, 40, 0.21).validate().unwrap();
        assert_eq!(dive.depth_m, 18.0);
        assert_eq!(dive.bottom_time_min, 40);
        assert_eq!(dive.safety_factor, SafetyFactor::Moderate);
    }

    #[test]
    fn test_validate_rejects_invalid_input() {
        let cases = [
            (params(-1.0, 10, 0.21), "depth_m"),
            (params(f64::INFINITY, 10, 0.21), "depth_m"),
            (params(18.0, -5, 0.21), "bottom_time_min"),
            (params(18.0, 10, 0.0), "oxygen_fraction"),
            (params(18.0, 10, 1.0), "oxygen_fraction"),
            (params(18.0, 10, f64::NAN), "oxygen_fraction"),
        ];
        for (p, expected) in cases {
            match p.validate() {
                Err(DecoError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidInput for {expected}, got {other:?}"),
            }
        }

        let p = DiveParameters {
            safety_factor: 3,
            ..params(18.0, 10, 0.21)
        };
        assert!(matches!(
            p.validate(),
            Err(DecoError::InvalidInput {
                field: "safety_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_depth_has_no_upper_bound() {
        assert_eq!(validate_depth(0.0), Ok(0.0));
        assert_eq!(validate_depth(1e9), Ok(1e9));
        assert!(validate_depth(-0.1).is_err());
        assert!(validate_depth(f64::NAN).is_err());
    }

    #[test]
    fn test_safety_factor_cycle() {
        let mut factor = SafetyFactor::None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(factor.level());
            factor = factor.cycle();
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
        assert_eq!(SafetyFactor::from_level(2).unwrap(), SafetyFactor::High);
    }

    #[test]
    fn test_schedule_buckets() {
        let config = DecoConfig::default();
        let mut schedule = DecoSchedule::safety_stop_only(&config);
        assert_eq!(schedule.minutes_at(3), Some(3));
        assert_eq!(schedule.total_minutes(), 3);
        assert!(!schedule.requires_decompression());

        schedule.add_minute(9);
        schedule.add_minute(9);
        schedule.add_minute(3);
        schedule.add_minute(5);
        assert_eq!(schedule.minutes_at(9), Some(2));
        assert_eq!(schedule.minutes_at(3), Some(4));
        assert_eq!(schedule.minutes_at(5), None);
        assert_eq!(schedule.deco_minutes(), 3);
        assert!(schedule.requires_decompression());

        let depths: Vec<u32> = schedule.stops().iter().map(|s| s.depth_m).collect();
        assert_eq!(depths, vec![3, 6, 9, 12]);
    }
}
