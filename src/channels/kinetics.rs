//! # Gate Kinetics
//!
//! Voltage-dependent steady states and time constants for every gating
//! variable in the model. All gates share one functional form:
//!
//! ```text
//! x_inf(V) = 1 / (1 + exp((vhalf - V) / slope))
//! tau_x(V) = floor + amp / cosh((V - vpeak) / width)
//! ```
//!
//! A positive `slope` gives an activation curve, a negative one an
//! inactivation curve. Each gate is described by a [`GateSpec`] and the
//! model's seven gates live in [`GATE_SPECS`], indexed in state-vector
//! order. The functions are pure and finite for any voltage a sane
//! simulation can reach: extreme arguments saturate the exponentials to
//! 0 or 1 and the time constant to its floor.

use serde::{Deserialize, Serialize};

/// Boltzmann sigmoid for gate steady states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boltzmann {
    /// Half-activation voltage (mV)
    pub vhalf: f64,
    /// Slope factor (mV); negative for inactivation gates
    pub slope: f64,
}

impl Boltzmann {
    pub fn eval(&self, v: f64) -> f64 {
        1.0 / (1.0 + ((self.vhalf - v) / self.slope).exp())
    }
}

/// Bell-shaped voltage dependence for gate time constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TauBell {
    /// Baseline time constant (ms), the value far from `vpeak`
    pub floor: f64,
    /// Peak height above the floor (ms)
    pub amp: f64,
    /// Voltage of the peak (mV)
    pub vpeak: f64,
    /// Width of the bell (mV)
    pub width: f64,
}

impl TauBell {
    pub fn eval(&self, v: f64) -> f64 {
        self.floor + self.amp / ((v - self.vpeak) / self.width).cosh()
    }
}

/// Full kinetic description of one gating variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub steady: Boltzmann,
    pub tau: TauBell,
}

impl GateSpec {
    /// Steady-state value at voltage `v`
    pub fn steady_state(&self, v: f64) -> f64 {
        self.steady.eval(v)
    }

    /// Time constant at voltage `v`, in ms
    pub fn time_constant(&self, v: f64) -> f64 {
        self.tau.eval(v)
    }

    /// First-order relaxation rate `dx/dt = (x_inf(v) - x) / tau(v)`
    pub fn relax(&self, x: f64, v: f64) -> f64 {
        (self.steady_state(v) - x) / self.time_constant(v)
    }
}

/// Transient sodium activation (m, cubed in the current)
pub const M_NAT: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -36.0, slope: 8.5 },
    tau: TauBell { floor: 0.1, amp: 0.5, vpeak: -36.0, width: 17.0 },
};

/// Transient sodium inactivation (h)
pub const H_NAT: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -49.0, slope: -7.0 },
    tau: TauBell { floor: 0.5, amp: 7.5, vpeak: -49.0, width: 14.0 },
};

/// Persistent sodium activation
pub const M_NAP: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -47.0, slope: 10.0 },
    tau: TauBell { floor: 1.0, amp: 3.0, vpeak: -47.0, width: 12.0 },
};

/// Slow potassium activation (n, to the fourth power)
pub const N_KS: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -64.0, slope: 12.0 },
    tau: TauBell { floor: 4.0, amp: 16.0, vpeak: -50.0, width: 22.0 },
};

/// Fast potassium activation (to the fourth power)
pub const M_KF: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -35.0, slope: 7.5 },
    tau: TauBell { floor: 0.3, amp: 1.7, vpeak: -35.0, width: 15.0 },
};

/// Fast potassium inactivation, fast component
pub const H_KF1: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -55.0, slope: -6.5 },
    tau: TauBell { floor: 2.0, amp: 18.0, vpeak: -55.0, width: 13.0 },
};

/// Fast potassium inactivation, slow component (same curve as the fast
/// component, an order of magnitude slower)
pub const H_KF2: GateSpec = GateSpec {
    steady: Boltzmann { vhalf: -55.0, slope: -6.5 },
    tau: TauBell { floor: 30.0, amp: 270.0, vpeak: -55.0, width: 13.0 },
};

/// Number of gating variables in the state vector
pub const NUM_GATES: usize = 7;

/// All gate descriptors in state-vector order (indices 1..=7)
pub const GATE_SPECS: [GateSpec; NUM_GATES] = [M_NAT, H_NAT, M_NAP, N_KS, M_KF, H_KF1, H_KF2];

// ============================================================================
// Tests
// ============================================================================
