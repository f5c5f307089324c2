//! # Model Parameters
//!
//! The full static parameter set for one simulation run: maximal
//! conductances, membrane and cell constants, pump parameters, and the
//! three mode switches (pump present, sodium pool dynamic, sodium
//! reversal dynamic). The set is an immutable value object; a run never
//! mutates it, and parallel sweeps clone it per grid point.
//!
//! ## Defaults
//!
//! The defaults are the DynDyn configuration: dynamic sodium, dynamic
//! reversal, pump on. `g_nap` and `g_ks` are solved in closed form so
//! that the documented resting state (V = -59.93 mV, Nai = 0.0400811 M)
//! is an exact equilibrium: the sodium balance
//! `I_NaT + I_NaP = -3 * I_pump` fixes `g_nap`, then the voltage
//! balance `I_Ks + I_Kf + I_leak = 2 * I_pump` fixes `g_ks`.

use serde::{Deserialize, Serialize};

use crate::channels::{
    FastPotassium, Leak, PersistentSodium, SlowPotassium, SodiumPump, TransientSodium,
};
use crate::{Error, Result};

/// Documented resting membrane potential for the default configuration (mV)
pub const V_REST: f64 = -59.93;

/// Documented resting intracellular sodium for the default configuration (M)
pub const NAI_REST: f64 = 0.0400811;

/// Static parameter set for a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Transient sodium channel
    pub nat: TransientSodium,
    /// Persistent sodium channel
    pub nap: PersistentSodium,
    /// Slow potassium channel
    pub ks: SlowPotassium,
    /// Fast potassium channel
    pub kf: FastPotassium,
    /// Passive leak
    pub leak: Leak,
    /// Na/K exchange pump
    pub pump: SodiumPump,
    /// Membrane capacitance (pF)
    pub c_m: f64,
    /// Potassium reversal potential (mV)
    pub e_k: f64,
    /// Extracellular sodium concentration (M)
    pub na_out: f64,
    /// Sodium reversal potential in fixed-reversal mode (mV)
    pub e_na_fixed: f64,
    /// RT/F at body temperature (mV)
    pub rt_over_f: f64,
    /// Faraday constant (C/mol)
    pub faraday: f64,
    /// Cell volume (L)
    pub cell_volume: f64,
    /// Pump present
    pub pump_on: bool,
    /// Intracellular sodium evolves (otherwise held at its initial value)
    pub dynamic_sodium: bool,
    /// Sodium reversal follows the Nernst potential (otherwise `e_na_fixed`)
    pub dynamic_reversal: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            nat: TransientSodium { g_max: 450.0 },
            nap: PersistentSodium { g_max: 0.2558170985629449 },
            ks: SlowPotassium { g_max: 5.839069557765601 },
            kf: FastPotassium { g_max: 120.0, w_fast: 0.7 },
            leak: Leak { g: 2.0, e_rev: -55.0 },
            pump: SodiumPump { i_max: 75.0, na_half: 0.070, na_slope: 0.010 },
            c_m: 30.0,
            e_k: -85.0,
            na_out: 0.115,
            e_na_fixed: 28.0,
            rt_over_f: 26.64,
            faraday: 96485.3321,
            cell_volume: 6.0e-13,
            pump_on: true,
            dynamic_sodium: true,
            dynamic_reversal: true,
        }
    }
}

impl Parameters {
    /// Default DynDyn configuration: dynamic sodium, dynamic reversal
    pub fn dyn_dyn() -> Self {
        Self::default()
    }

    /// Sodium pool frozen at its initial value; reversal still dynamic
    pub fn fixed_sodium() -> Self {
        Self { dynamic_sodium: false, ..Self::default() }
    }

    /// Nernst feedback disabled: sodium reversal held at `e_na_fixed`
    pub fn fixed_reversal() -> Self {
        Self { dynamic_reversal: false, ..Self::default() }
    }

    /// Pump removed from both the membrane and the sodium balance
    pub fn pump_free() -> Self {
        Self { pump_on: false, ..Self::default() }
    }

    /// Sodium reversal potential (mV) for concentration `nai`, honoring
    /// the reversal mode switch
    pub fn sodium_reversal(&self, nai: f64) -> f64 {
        if self.dynamic_reversal {
            crate::channels::sodium_reversal(nai, self.na_out, self.rt_over_f)
        } else {
            self.e_na_fixed
        }
    }

    /// Pump current (pA) at concentration `nai`, honoring the pump switch
    pub fn pump_current(&self, nai: f64) -> f64 {
        if self.pump_on {
            self.pump.current(nai)
        } else {
            0.0
        }
    }

    /// Reject invalid parameter combinations before integration begins
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        }
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be non-negative, got {}", name, value)))
            }
        }

        positive("membrane capacitance c_m", self.c_m)?;
        positive("cell volume", self.cell_volume)?;
        positive("extracellular sodium na_out", self.na_out)?;
        positive("Faraday constant", self.faraday)?;
        positive("RT/F", self.rt_over_f)?;
        non_negative("g_nat", self.nat.g_max)?;
        non_negative("g_nap", self.nap.g_max)?;
        non_negative("g_ks", self.ks.g_max)?;
        non_negative("g_kf", self.kf.g_max)?;
        non_negative("g_leak", self.leak.g)?;
        non_negative("pump Imax", self.pump.i_max)?;
        positive("pump half-activation naih", self.pump.na_half)?;
        positive("pump slope nais", self.pump.na_slope)?;
        if !(0.0..=1.0).contains(&self.kf.w_fast) {
            return Err(Error::Config(format!(
                "fast potassium inactivation weight must be in [0, 1], got {}",
                self.kf.w_fast
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn test_named_configurations() {
        assert!(Parameters::dyn_dyn().dynamic_sodium);
        assert!(!Parameters::fixed_sodium().dynamic_sodium);
        assert!(!Parameters::fixed_reversal().dynamic_reversal);
        assert!(!Parameters::pump_free().pump_on);
    }

    #[test]
    fn test_zero_pump_slope_rejected() {
        let mut p = Parameters::default();
        p.pump.na_slope = 0.0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("nais")));
    }

    #[test]
    fn test_negative_concentration_rejected() {
        let mut p = Parameters::default();
        p.na_out = -0.1;
        assert!(matches!(p.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_conductance_rejected() {
        let mut p = Parameters::default();
        p.ks.g_max = -1.0;
        assert!(matches!(p.validate(), Err(Error::Config(ref m)) if m.contains("g_ks")));
    }

    #[test]
    fn test_bad_inactivation_weight_rejected() {
        let mut p = Parameters::default();
        p.kf.w_fast = 1.5;
        assert!(matches!(p.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_reversal_mode_switch() {
        let p = Parameters::fixed_reversal();
        assert_eq!(p.sodium_reversal(0.01), p.e_na_fixed);
        assert_eq!(p.sodium_reversal(0.10), p.e_na_fixed);

        let d = Parameters::default();
        assert!(d.sodium_reversal(0.01) > d.sodium_reversal(0.10));
    }

    #[test]
    fn test_pump_switch_silences_current() {
        let p = Parameters::pump_free();
        assert_eq!(p.pump_current(0.2), 0.0);
        assert!(Parameters::default().pump_current(0.2) > 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let p = Parameters::default();
        let json = serde_json::to_string(&p).unwrap();
        let back: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
