//! Top-level computation: dive parameters in, display values out.

use crate::config::DecoConfig;
use crate::error::DecoError;
use crate::models::{DiveParameters, DiveSummary};
use crate::ndl::NoDecoSearch;
use crate::simulator::DiveSimulator;

/// Compute the decompression obligation and remaining no-decompression time.
///
/// Every call starts from fresh surface-equilibrium tissues; nothing is
/// retained between calls. An exhausted no-decompression search is reported
/// as 0 remaining minutes.
pub fn plan_dive(params: &DiveParameters, config: &DecoConfig) -> Result<DiveSummary, DecoError> {
    config.validate()?;
    let dive = params.validate()?;

    let sim = DiveSimulator::new(config, dive.oxygen_fraction);
    let schedule = sim.run(dive.depth_m, dive.bottom_time_min)?;

    let no_deco_minutes = if schedule.requires_decompression() {
        0
    } else {
        let search = NoDecoSearch::new(sim, dive.depth_m);
        match search.remaining(dive.bottom_time_min) {
            Ok(minutes) => minutes,
            Err(DecoError::SearchExhausted { max_trial_minutes }) => {
                tracing::warn!(
                    max_trial_minutes,
                    bottom_time_min = dive.bottom_time_min,
                    "no-decompression search exhausted, reporting 0"
                );
                0
            }
            Err(e) => return Err(e),
        }
    };

    let summary = DiveSummary {
        deco_minutes: schedule.deco_minutes(),
        no_deco_minutes,
        no_fly_hours: 0,
        stops: schedule.stops().to_vec(),
    };
    tracing::debug!(
        depth_m = dive.depth_m,
        bottom_time_min = dive.bottom_time_min,
        oxygen_fraction = dive.oxygen_fraction,
        safety_factor = dive.safety_factor.level(),
        stops = ?summary.stops,
        deco_minutes = summary.deco_minutes,
        no_deco_minutes = summary.no_deco_minutes,
        "dive plan computed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NoDecoPolicy, SearchStrategy};
    use crate::gas::AIR_OXYGEN_FRACTION;

    fn air_dive(depth_m: f64, bottom_time_min: i32) -> DiveParameters {
        DiveParameters {
            depth_m,
            bottom_time_min,
            oxygen_fraction: AIR_OXYGEN_FRACTION,
            safety_factor: 1,
        }
    }

    #[test]
    fn test_recreational_dive_summary() {
        let summary = plan_dive(&air_dive(18.0, 40), &DecoConfig::default()).unwrap();
        assert_eq!(summary.deco_minutes, 0);
        assert!(
            summary.no_deco_minutes > 0 && summary.no_deco_minutes < 20,
            "18m/40min should leave a few no-deco minutes, got {}",
            summary.no_deco_minutes
        );
        assert_eq!(summary.no_fly_hours, 0);
        assert_eq!(summary.stops[0].depth_m, 3);
        assert_eq!(summary.stops[0].minutes, 3);
        assert!(summary.stops[1..].iter().all(|s| s.minutes == 0));
    }

    #[test]
    fn test_deco_dive_summary() {
        let summary = plan_dive(&air_dive(40.0, 30), &DecoConfig::default()).unwrap();
        assert!(summary.deco_minutes > 0);
        assert_eq!(summary.no_deco_minutes, 0);
        let total: u32 = summary.stops.iter().map(|s| s.minutes).sum();
        assert_eq!(total, summary.deco_minutes + 3);
        assert!(summary.stops[1..].iter().any(|s| s.minutes > 0));
    }

    #[test]
    fn test_surface_dive_summary() {
        let config = DecoConfig::default();
        for minutes in [0, 30, 99] {
            let summary = plan_dive(&air_dive(0.0, minutes), &config).unwrap();
            assert_eq!(summary.deco_minutes, 0);
            assert_eq!(summary.no_deco_minutes, 99 - minutes);
        }
        // Past the trial ceiling the search is exhausted.
        let summary = plan_dive(&air_dive(0.0, 120), &config).unwrap();
        assert_eq!(summary.no_deco_minutes, 0);
    }

    #[test]
    fn test_shallower_never_has_less_no_deco_time() {
        let config = DecoConfig::default();
        let mut prev = i32::MAX;
        for depth in [0.0, 6.0, 12.0, 15.0, 18.0, 21.0, 24.0, 30.0, 40.0] {
            let summary = plan_dive(&air_dive(depth, 10), &config).unwrap();
            assert!(
                summary.no_deco_minutes <= prev,
                "{depth}m: {} > {prev}",
                summary.no_deco_minutes
            );
            prev = summary.no_deco_minutes;
        }
    }

    #[test]
    fn test_no_deco_non_increasing_with_bottom_time() {
        let config = DecoConfig::default();
        let mut prev = i32::MAX;
        for minutes in 0..=40 {
            let summary = plan_dive(&air_dive(24.0, minutes), &config).unwrap();
            assert!(summary.no_deco_minutes <= prev);
            assert!(summary.no_deco_minutes >= 0);
            prev = summary.no_deco_minutes;
        }
        assert_eq!(prev, 0);
    }

    #[test]
    fn test_plans_are_idempotent() {
        let config = DecoConfig::default();
        for params in [air_dive(18.0, 40), air_dive(40.0, 30), air_dive(27.5, 22)] {
            let first = plan_dive(&params, &config).unwrap();
            let second = plan_dive(&params, &config).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_safety_factor_does_not_change_result() {
        let config = DecoConfig::default();
        let base = plan_dive(&air_dive(30.0, 20), &config).unwrap();
        for level in [0, 2] {
            let params = DiveParameters {
                safety_factor: level,
                ..air_dive(30.0, 20)
            };
            assert_eq!(plan_dive(&params, &config).unwrap(), base);
        }
    }

    #[test]
    fn test_nitrox_extends_no_deco_time() {
        let config = DecoConfig::default();
        let air = plan_dive(&air_dive(24.0, 10), &config).unwrap();
        let ean32 = plan_dive(
            &DiveParameters {
                oxygen_fraction: 0.32,
                ..air_dive(24.0, 10)
            },
            &config,
        )
        .unwrap();
        assert!(ean32.no_deco_minutes > air.no_deco_minutes);
    }

    #[test]
    fn test_legacy_policy_through_planner() {
        let config = DecoConfig {
            no_deco_policy: NoDecoPolicy::Legacy,
            ..DecoConfig::default()
        };
        let corrected = plan_dive(&air_dive(18.0, 40), &DecoConfig::default()).unwrap();
        let legacy = plan_dive(&air_dive(18.0, 40), &config).unwrap();
        assert_eq!(legacy.no_deco_minutes, corrected.no_deco_minutes - 40);
        assert_eq!(legacy.deco_minutes, corrected.deco_minutes);
    }

    #[test]
    fn test_iteration_cap_does_not_affect_no_deco_dives() {
        let expected = plan_dive(&air_dive(18.0, 40), &DecoConfig::default()).unwrap();
        for strategy in [SearchStrategy::Linear, SearchStrategy::Bisection] {
            let capped = DecoConfig {
                max_decompression_iterations: 2,
                search_strategy: strategy,
                ..DecoConfig::default()
            };
            assert_eq!(plan_dive(&air_dive(18.0, 40), &capped), Ok(expected.clone()));
        }
    }

    #[test]
    fn test_errors_are_typed() {
        let config = DecoConfig::default();
        let bad_gas = DiveParameters {
            oxygen_fraction: 1.5,
            ..air_dive(18.0, 40)
        };
        assert!(matches!(
            plan_dive(&bad_gas, &config),
            Err(DecoError::InvalidInput {
                field: "oxygen_fraction",
                ..
            })
        ));
        assert!(matches!(
            plan_dive(&air_dive(18.0, -1), &config),
            Err(DecoError::InvalidInput { .. })
        ));

        let capped = DecoConfig {
            max_decompression_iterations: 2,
            ..DecoConfig::default()
        };
        assert_eq!(
            plan_dive(&air_dive(40.0, 30), &capped),
            Err(DecoError::NonConvergence { iterations: 2 })
        );

        let broken = DecoConfig {
            descent_rate_m_per_min: -10.0,
            ..DecoConfig::default()
        };
        assert!(matches!(
            plan_dive(&air_dive(18.0, 40), &broken),
            Err(DecoError::InvalidConfig { .. })
        ));
    }
}
