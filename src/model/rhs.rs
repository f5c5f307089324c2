//! # Right-Hand Side
//!
//! Assembles the nine instantaneous derivatives from the parameter set
//! and a stimulus:
//!
//! ```text
//! dV/dt   = -(I_NaT + I_NaP + I_Ks + I_Kf + I_leak + I_pump - I_inj(t)) / C_m
//! dx/dt   = (x_inf(V) - x) / tau_x(V)          for each gate x
//! dNai/dt = -(I_NaT + I_NaP + 3*I_pump) * 1e-12 / (F * vol) * 1e-3
//! ```
//!
//! Only the two sodium channels and the pump move sodium; the leak and
//! the potassium channels do not appear in the sodium balance. With the
//! sodium switch off the last derivative is exactly zero.

use ndarray::Array1;

use super::params::Parameters;
use super::state::{State, IDX_GATE0, IDX_NAI, IDX_V};
use crate::channels::GATE_SPECS;
use crate::ode::ODEFunc;
use crate::stimulus::Stimulus;

/// Sodium ions translocated outward per pump cycle (3Na:2K)
pub const PUMP_NA_STOICHIOMETRY: f64 = 3.0;

/// Per-channel membrane currents at one instant (pA, outward positive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currents {
    pub nat: f64,
    pub nap: f64,
    pub ks: f64,
    pub kf: f64,
    pub leak: f64,
    pub pump: f64,
}

impl Currents {
    /// Total membrane current (pA), the quantity balanced against the
    /// injected current in the voltage equation
    pub fn total(&self) -> f64 {
        self.nat + self.nap + self.ks + self.kf + self.leak + self.pump
    }

    /// Net sodium-carrying current (pA) entering the sodium balance
    pub fn sodium_flux(&self) -> f64 {
        self.nat + self.nap + PUMP_NA_STOICHIOMETRY * self.pump
    }
}

/// The model ODE: parameters plus a borrowed stimulus
#[derive(Debug)]
pub struct MotoneuronRhs<'a, S: Stimulus + ?Sized> {
    params: Parameters,
    stimulus: &'a S,
}

impl<'a, S: Stimulus + ?Sized> MotoneuronRhs<'a, S> {
    pub fn new(params: Parameters, stimulus: &'a S) -> Self {
        Self { params, stimulus }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Evaluate all membrane currents for a named state
    pub fn currents(&self, state: &State) -> Currents {
        let p = &self.params;
        let e_na = p.sodium_reversal(state.nai);
        Currents {
            nat: p.nat.current(state.v, state.m_nat, state.h_nat, e_na),
            nap: p.nap.current(state.v, state.m_nap, e_na),
            ks: p.ks.current(state.v, state.n, p.e_k),
            kf: p.kf.current(state.v, state.m_kf, state.h_kf1, state.h_kf2, p.e_k),
            leak: p.leak.current(state.v),
            pump: p.pump_current(state.nai),
        }
    }
}

impl<S: Stimulus + ?Sized> ODEFunc for MotoneuronRhs<'_, S> {
    fn evaluate(&self, z: &Array1<f64>, t: f64) -> Array1<f64> {
        let p = &self.params;
        let v = z[IDX_V];
        let nai = z[IDX_NAI];

        let e_na = p.sodium_reversal(nai);
        let i_nat = p.nat.current(v, z[1], z[2], e_na);
        let i_nap = p.nap.current(v, z[3], e_na);
        let i_ks = p.ks.current(v, z[4], p.e_k);
        let i_kf = p.kf.current(v, z[5], z[6], z[7], p.e_k);
        let i_leak = p.leak.current(v);
        let i_pump = p.pump_current(nai);
        let i_inj = self.stimulus.current(t);

        let mut dz = Array1::zeros(State::DIM);
        dz[IDX_V] = -(i_nat + i_nap + i_ks + i_kf + i_leak + i_pump - i_inj) / p.c_m;

        for (i, spec) in GATE_SPECS.iter().enumerate() {
            dz[IDX_GATE0 + i] = spec.relax(z[IDX_GATE0 + i], v);
        }

        dz[IDX_NAI] = if p.dynamic_sodium {
            let i_na = i_nat + i_nap + PUMP_NA_STOICHIOMETRY * i_pump;
            // pA -> A, then mol/(L*s) -> mol/(L*ms)
            -i_na * 1e-12 / (p.faraday * p.cell_volume) * 1e-3
        } else {
            0.0
        };

        dz
    }

    fn dim(&self) -> usize {
        State::DIM
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::params::{NAI_REST, V_REST};

    #[test]
    fn test_rest_sodium_balance() {
        let rhs = MotoneuronRhs::new(Parameters::default(), &0.0);
        let c = rhs.currents(&State::resting());
        assert!(
            c.sodium_flux().abs() < 1e-9,
            "sodium balance at rest should close, residual {}",
            c.sodium_flux()
        );
    }

    #[test]
    fn test_rest_voltage_balance() {
        let rhs = MotoneuronRhs::new(Parameters::default(), &0.0);
        let c = rhs.currents(&State::resting());
        let k_side = c.ks + c.kf + c.leak;
        assert!(
            (k_side - 2.0 * c.pump).abs() < 1e-9,
            "outward side at rest should equal 2*I_pump, got {} vs {}",
            k_side,
            2.0 * c.pump
        );
        assert!(c.total().abs() < 1e-9);
    }

    #[test]
    fn test_rest_derivatives_vanish() {
        let rhs = MotoneuronRhs::new(Parameters::default(), &0.0);
        let dz = rhs.evaluate(&State::resting().to_array(), 0.0);
        for (i, d) in dz.iter().enumerate() {
            assert!(d.abs() < 1e-10, "d[{}] = {} at rest", i, d);
        }
    }

    #[test]
    fn test_injection_depolarizes() {
        let rhs = MotoneuronRhs::new(Parameters::default(), &50.0);
        let dz = rhs.evaluate(&State::resting().to_array(), 0.0);
        // 50 pA over 30 pF
        assert!((dz[0] - 50.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_sodium_switch_freezes_concentration() {
        let rhs = MotoneuronRhs::new(Parameters::fixed_sodium(), &100.0);
        let mut z = State::resting().to_array();
        z[0] = -20.0; // strongly depolarized, large sodium influx
        let dz = rhs.evaluate(&z, 0.0);
        assert_eq!(dz[8], 0.0);
    }

    #[test]
    fn test_pump_off_accumulates_sodium_at_rest() {
        // without extrusion the resting window influx drives Nai upward
        let rhs = MotoneuronRhs::new(Parameters::pump_free(), &0.0);
        let dz = rhs.evaluate(&State::resting().to_array(), 0.0);
        assert!(dz[8] > 0.0);
    }

    #[test]
    fn test_rest_pump_magnitude() {
        let p = Parameters::default();
        let i = p.pump_current(NAI_REST);
        assert!((i - 3.5845).abs() < 1e-3, "rest pump current {} pA", i);
    }

    #[test]
    fn test_rest_reversal_magnitude() {
        let p = Parameters::default();
        let e = p.sodium_reversal(NAI_REST);
        assert!((e - 28.0793).abs() < 1e-3, "rest E_Na {} mV", e);
        assert!(V_REST < e);
    }
}
