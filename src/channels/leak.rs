//! Passive leak conductance.
//!
//! Ungated mixed-cation leak. It anchors the membrane when the gated
//! channels are closed: a strongly engaged pump would otherwise
//! hyperpolarize the cell without bound, since every gated conductance
//! shuts below about -80 mV. The leak carries no sodium and therefore
//! does not enter the sodium balance.

use serde::{Deserialize, Serialize};

/// Passive leak channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leak {
    /// Conductance (nS)
    pub g: f64,
    /// Reversal potential (mV)
    pub e_rev: f64,
}

impl Leak {
    pub fn current(&self, v: f64) -> f64 {
        self.g * (v - self.e_rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leak_sign_follows_driving_force() {
        let leak = Leak { g: 2.0, e_rev: -55.0 };
        assert!(leak.current(-50.0) > 0.0);
        assert!(leak.current(-60.0) < 0.0);
        assert_eq!(leak.current(-55.0), 0.0);
    }

    #[test]
    fn test_leak_linear_in_conductance() {
        let a = Leak { g: 1.0, e_rev: -55.0 };
        let b = Leak { g: 3.0, e_rev: -55.0 };
        assert!((b.current(-70.0) / a.current(-70.0) - 3.0).abs() < 1e-12);
    }
}
