//! Potassium conductances.
//!
//! A slow delayed-rectifier channel gated n^4 and a fast channel gated
//! m^4 with a two-component inactivation (a fast and a slow h variable
//! sharing one steady-state curve, mixed by a fixed weight).

use serde::{Deserialize, Serialize};

/// Slow potassium channel, open probability n^4
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowPotassium {
    /// Maximal conductance (nS)
    pub g_max: f64,
}

impl SlowPotassium {
    pub fn current(&self, v: f64, n: f64, e_k: f64) -> f64 {
        let n2 = n * n;
        self.g_max * n2 * n2 * (v - e_k)
    }
}

/// Fast potassium channel, open probability m^4 * (w*h1 + (1-w)*h2)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastPotassium {
    /// Maximal conductance (nS)
    pub g_max: f64,
    /// Weight of the fast inactivation component, in [0, 1]
    pub w_fast: f64,
}

impl FastPotassium {
    pub fn current(&self, v: f64, m: f64, h1: f64, h2: f64, e_k: f64) -> f64 {
        let m2 = m * m;
        let h = self.w_fast * h1 + (1.0 - self.w_fast) * h2;
        self.g_max * m2 * m2 * h * (v - e_k)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_current_outward_above_reversal() {
        let ks = SlowPotassium { g_max: 5.8 };
        assert!(ks.current(-60.0, 0.5, -85.0) > 0.0);
        assert!(ks.current(-90.0, 0.5, -85.0) < 0.0);
    }

    #[test]
    fn test_slow_gating_fourth_power() {
        let ks = SlowPotassium { g_max: 10.0 };
        let base = ks.current(-60.0, 0.2, -85.0);
        assert!((ks.current(-60.0, 0.4, -85.0) / base - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_fast_inactivation_mixing() {
        let kf = FastPotassium { g_max: 120.0, w_fast: 0.7 };
        // with h1 = 1, h2 = 0 only the weighted fast component conducts
        let fast_only = kf.current(-40.0, 0.5, 1.0, 0.0, -85.0);
        let slow_only = kf.current(-40.0, 0.5, 0.0, 1.0, -85.0);
        let both = kf.current(-40.0, 0.5, 1.0, 1.0, -85.0);
        assert!((fast_only / both - 0.7).abs() < 1e-12);
        assert!((slow_only / both - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_fully_inactivated_fast_channel_is_silent() {
        let kf = FastPotassium { g_max: 120.0, w_fast: 0.7 };
        assert_eq!(kf.current(-40.0, 0.9, 0.0, 0.0, -85.0), 0.0);
    }
}
