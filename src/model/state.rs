//! # State Vector
//!
//! The nine continuously evolving quantities: membrane voltage, six
//! gating variables, and the intracellular sodium concentration. The
//! named struct and the `Array1<f64>` layout used by the solvers are
//! interconvertible; the array order is fixed and matches the gate
//! descriptor table in [`crate::channels::GATE_SPECS`].

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::params::{NAI_REST, V_REST};
use crate::channels::GATE_SPECS;

/// Index of the membrane potential in the state array
pub(crate) const IDX_V: usize = 0;
/// Index of the intracellular sodium concentration in the state array
pub(crate) const IDX_NAI: usize = 8;
/// Index of the first gating variable; gates occupy 1..=7
pub(crate) const IDX_GATE0: usize = 1;

/// Full model state at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Membrane potential (mV)
    pub v: f64,
    /// Transient sodium activation
    pub m_nat: f64,
    /// Transient sodium inactivation
    pub h_nat: f64,
    /// Persistent sodium activation
    pub m_nap: f64,
    /// Slow potassium activation
    pub n: f64,
    /// Fast potassium activation
    pub m_kf: f64,
    /// Fast potassium inactivation, fast component
    pub h_kf1: f64,
    /// Fast potassium inactivation, slow component
    pub h_kf2: f64,
    /// Intracellular sodium concentration (M)
    pub nai: f64,
}

impl State {
    /// Dimension of the state vector
    pub const DIM: usize = 9;

    /// State with all gates at their steady-state value for voltage `v`
    pub fn steady_at(v: f64, nai: f64) -> Self {
        let g: Vec<f64> = GATE_SPECS.iter().map(|s| s.steady_state(v)).collect();
        Self {
            v,
            m_nat: g[0],
            h_nat: g[1],
            m_nap: g[2],
            n: g[3],
            m_kf: g[4],
            h_kf1: g[5],
            h_kf2: g[6],
            nai,
        }
    }

    /// The documented resting state of the default configuration
    pub fn resting() -> Self {
        Self::steady_at(V_REST, NAI_REST)
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(vec![
            self.v, self.m_nat, self.h_nat, self.m_nap, self.n, self.m_kf, self.h_kf1,
            self.h_kf2, self.nai,
        ])
    }

    /// Rebuild the named state from the solver layout.
    ///
    /// Panics if the array is not 9-dimensional; solver and model agree
    /// on the dimension by construction.
    pub fn from_array(z: &Array1<f64>) -> Self {
        assert_eq!(z.len(), Self::DIM, "state vector must have 9 components");
        Self {
            v: z[0],
            m_nat: z[1],
            h_nat: z[2],
            m_nap: z[3],
            n: z[4],
            m_kf: z[5],
            h_kf1: z[6],
            h_kf2: z[7],
            nai: z[8],
        }
    }

    /// Gating variables in state order
    pub fn gates(&self) -> [f64; 7] {
        [self.m_nat, self.h_nat, self.m_nap, self.n, self.m_kf, self.h_kf1, self.h_kf2]
    }
}

// ============================================================================
// Tests
// ============================================================================
