//! Bühlmann ZHL-16 compartment model.
//!
//! Pure tissue math for a single inert gas: the Haldane loading equation,
//! the per-compartment ceiling (tolerated ambient pressure), and the 16
//! tabulated half-times and coefficients. [`Tissues`] holds the inert-gas
//! pressure of every compartment and is passed by value through the
//! simulation phases.
//!
//! Pressures are in atmospheres absolute; depth converts at 10 m per atm.

// ============================================================================
// Physical Constants
// ============================================================================

/// Ambient pressure at the surface (atm).
pub const SURFACE_PRESSURE: f64 = 1.0;

/// Metres of seawater per atmosphere.
pub const METERS_PER_ATM: f64 = 10.0;

/// Number of tissue compartments.
pub const COMPARTMENT_COUNT: usize = 16;

// ============================================================================
// ZHL-16 Compartment Constants
// ============================================================================

/// Tabulated constants for one tissue compartment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compartment {
    /// Inert-gas half-time (minutes).
    pub half_time: f64,
    /// Coefficient `a` (atm).
    pub a: f64,
    /// Coefficient `b` (dimensionless).
    pub b: f64,
}

const fn compartment(half_time: f64, a: f64, b: f64) -> Compartment {
    Compartment { half_time, a, b }
}

/// N2 compartments 1–16, fastest first. Empirical values, not derived at runtime.
pub const COMPARTMENTS: [Compartment; COMPARTMENT_COUNT] = [
    compartment(5.0, 1.1696, 0.5578),
    compartment(8.0, 1.0000, 0.6514),
    compartment(12.5, 0.8618, 0.7222),
    compartment(18.5, 0.7562, 0.7825),
    compartment(27.0, 0.6200, 0.8126),
    compartment(38.3, 0.5043, 0.8434),
    compartment(54.3, 0.4410, 0.8693),
    compartment(77.0, 0.4000, 0.8910),
    compartment(109.0, 0.3750, 0.9092),
    compartment(146.0, 0.3500, 0.9222),
    compartment(187.0, 0.3295, 0.9319),
    compartment(239.0, 0.3065, 0.9403),
    compartment(305.0, 0.2835, 0.9477),
    compartment(390.0, 0.2610, 0.9544),
    compartment(498.0, 0.2480, 0.9602),
    compartment(635.0, 0.2327, 0.9653),
];

// ============================================================================
// Equations
// ============================================================================

/// Compartment pressure after `exposure_minutes` breathing inert gas at `p_gas`.
///
/// Haldane equation: `p_begin + (p_gas - p_begin) * (1 - 2^(-t / half_time))`.
pub fn loading(p_begin: f64, p_gas: f64, exposure_minutes: f64, half_time: f64) -> f64 {
    p_begin + (p_gas - p_begin) * (1.0 - 2.0_f64.powf(-exposure_minutes / half_time))
}

/// Minimum tolerated ambient pressure for a compartment at `p_comp`.
///
/// Values at or below [`SURFACE_PRESSURE`] allow a direct ascent.
pub fn ceiling(p_comp: f64, a: f64, b: f64) -> f64 {
    (p_comp - a) * b
}

/// Ambient pressure (atm) at `depth_m` metres.
pub fn ambient_pressure(depth_m: f64) -> f64 {
    SURFACE_PRESSURE + depth_m / METERS_PER_ATM
}

/// Depth (m) at which the ambient pressure equals `pressure`.
pub fn depth_for_pressure(pressure: f64) -> f64 {
    (pressure - SURFACE_PRESSURE) * METERS_PER_ATM
}

// ============================================================================
// Tissue State
// ============================================================================

/// Inert-gas pressure of all 16 compartments, index-aligned with [`COMPARTMENTS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tissues([f64; COMPARTMENT_COUNT]);

impl Tissues {
    /// Every compartment equilibrated with the inert fraction of one atmosphere.
    pub fn surface_equilibrium(inert_fraction: f64) -> Self {
        let p_surface = SURFACE_PRESSURE * inert_fraction;
        Tissues([p_surface; COMPARTMENT_COUNT])
    }

    /// Load every compartment for `minutes` at inspired inert pressure `p_gas`.
    pub fn expose(self, p_gas: f64, minutes: f64) -> Self {
        let mut pressures = self.0;
        for (p, c) in pressures.iter_mut().zip(COMPARTMENTS.iter()) {
            *p = loading(*p, p_gas, minutes, c.half_time);
        }
        Tissues(pressures)
    }

    pub fn pressures(&self) -> &[f64; COMPARTMENT_COUNT] {
        &self.0
    }

    /// Ceiling pressure of every compartment.
    pub fn ceilings(&self) -> [f64; COMPARTMENT_COUNT] {
        let mut out = [0.0; COMPARTMENT_COUNT];
        for (i, c) in COMPARTMENTS.iter().enumerate() {
            out[i] = ceiling(self.0[i], c.a, c.b);
        }
        out
    }

    /// Index and ceiling of the controlling (highest-ceiling) compartment.
    pub fn leading_ceiling(&self) -> (usize, f64) {
        let ceilings = self.ceilings();
        let mut leading = 0;
        for (i, c) in ceilings.iter().enumerate() {
            if *c > ceilings[leading] {
                leading = i;
            }
        }
        (leading, ceilings[leading])
    }

    /// Controlling ceiling if any compartment forbids a direct ascent.
    pub fn ceiling_above_surface(&self) -> Option<(usize, f64)> {
        let (leading, pressure) = self.leading_ceiling();
        (pressure > SURFACE_PRESSURE).then_some((leading, pressure))
    }
}

// ============================================================================
// Tests
// ============================================================================
