//! # Na/K Exchange Pump
//!
//! ATP-driven electrogenic pump, modeled as a sigmoidal function of the
//! intracellular sodium concentration:
//!
//! ```text
//! I_pump(Nai) = Imax / (1 + exp((naih - Nai) / nais))
//! ```
//!
//! Strictly increasing in `Nai`, saturating at `Imax` for high sodium
//! and near zero for low sodium. The pump is the feedback element that
//! links sodium accumulated during firing back into the membrane
//! equation; it is what produces the slow afterhyperpolarization and
//! the firing-rate adaptation this model exists to study.

use serde::{Deserialize, Serialize};

/// Sigmoidal Na/K pump current model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SodiumPump {
    /// Saturating pump current (pA)
    pub i_max: f64,
    /// Half-activation sodium concentration (M)
    pub na_half: f64,
    /// Sigmoid slope (M); must be positive
    pub na_slope: f64,
}

impl SodiumPump {
    /// Pump current (pA, outward positive) at sodium concentration `nai`
    pub fn current(&self, nai: f64) -> f64 {
        self.i_max / (1.0 + ((self.na_half - nai) / self.na_slope).exp())
    }
}

// ============================================================================
// Tests
// ============================================================================
