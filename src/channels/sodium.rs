//! Sodium conductances and the sodium reversal potential.
//!
//! Two populations: a transient (spike-generating) channel gated m^3*h
//! and a persistent channel gated by a single activation variable. Both
//! drive the intracellular sodium pool, so both appear in the sodium
//! balance as well as the membrane equation.

use serde::{Deserialize, Serialize};

/// Lower clamp for the Nernst logarithm argument (M). A mid-step
/// excursion of `Nai` below this would otherwise produce a NaN before
/// the divergence scan can report the sample; the scan still fails the
/// run on any sampled `Nai <= 0`.
pub const NAI_FLOOR: f64 = 1e-12;

/// Nernst sodium reversal potential (mV) from the concentration ratio.
///
/// `rt_over_f` is RT/F in mV (26.64 mV at body temperature).
pub fn sodium_reversal(nai: f64, na_out: f64, rt_over_f: f64) -> f64 {
    rt_over_f * (na_out / nai.max(NAI_FLOOR)).ln()
}

/// Transient sodium channel, open probability m^3 * h
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientSodium {
    /// Maximal conductance (nS)
    pub g_max: f64,
}

impl TransientSodium {
    pub fn current(&self, v: f64, m: f64, h: f64, e_na: f64) -> f64 {
        self.g_max * m * m * m * h * (v - e_na)
    }
}

/// Persistent sodium channel, open probability m
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistentSodium {
    /// Maximal conductance (nS)
    pub g_max: f64,
}

impl PersistentSodium {
    pub fn current(&self, v: f64, m: f64, e_na: f64) -> f64 {
        self.g_max * m * (v - e_na)
    }
}

// ============================================================================
// Tests
// ============================================================================
