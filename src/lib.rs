//! # Motor Neuron Simulation
//!
//! Conductance-based simulation of a motor neuron whose membrane carries
//! four voltage-gated channel populations, a passive leak, and an
//! ATP-driven Na/K exchange pump, with a dynamic intracellular sodium
//! pool feeding back through the Nernst sodium reversal potential and
//! the pump current. Includes spike/AHP feature extraction from the
//! simulated voltage trace.
//!
//! ## Features
//!
//! - **Channel kinetics**: one parametrized gate abstraction (Boltzmann
//!   steady state, bell-shaped time constant) shared by all seven gates
//! - **ODE Solvers**: adaptive Dormand-Prince 5(4) and fixed-step RK4
//! - **Sodium dynamics**: intracellular sodium pool with 3Na:2K pump
//!   stoichiometry and dynamic reversal potential
//! - **Feature extraction**: firing rates, delay, adaptation, AHP
//!   amplitude and recovery latencies
//! - **Parameter sweeps**: embarrassingly parallel grid sweeps via rayon
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use motoneuron_sim::prelude::*;
//!
//! fn main() -> motoneuron_sim::Result<()> {
//!     let params = Parameters::default();
//!     let sim = Simulation::new(params, SimulationConfig::new(8000.0))?;
//!
//!     let pulse = StepPulse::new(50.0, 1000.0, 5000.0);
//!     let trajectory = sim.run(&pulse)?;
//!
//!     let window = StimulusWindow::from(&pulse);
//!     let features = FeatureExtractor::default()
//!         .extract(trajectory.times(), &trajectory.voltage(), window);
//!     println!("spikes: {}", features.spike_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`channels`]: gate kinetics, ionic currents, pump current
//! - [`model`]: parameter set, state vector, right-hand side
//! - [`stimulus`]: injected-current waveforms
//! - [`ode`]: ODE solvers (RK4, Dopri5)
//! - [`simulation`]: run driver, trajectory, divergence policy
//! - [`analysis`]: spike/AHP feature extraction
//! - [`sweep`]: parallel parameter sweeps

pub mod analysis;
pub mod channels;
pub mod model;
pub mod ode;
pub mod simulation;
pub mod stimulus;
pub mod sweep;

pub use analysis::{FeatureExtractor, FeatureSummary, StimulusWindow};
pub use model::{Parameters, State};
pub use ode::{Dopri5Solver, ODEConfig, ODESolver, RK4Solver};
pub use simulation::{Simulation, SimulationConfig, SolverKind, Trajectory};
pub use stimulus::{StepPulse, Stimulus, Waveform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default output grid step in milliseconds
pub const DEFAULT_DT: f64 = 0.05;

/// Result type for this library
pub type Result<T> = std::result::Result<T, Error>;

/// Library error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error(
        "Simulation diverged at t = {time:.3} ms (V = {voltage:.3} mV, Nai = {sodium:.6e} M)"
    )]
    Diverged {
        /// Time of the first invalid sample (ms)
        time: f64,
        /// Membrane potential at that sample (mV)
        voltage: f64,
        /// Intracellular sodium at that sample (M)
        sodium: f64,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{FeatureConfig, FeatureExtractor, FeatureSummary, StimulusWindow};
    pub use crate::model::{Parameters, State};
    pub use crate::ode::{Dopri5Solver, ODEConfig, ODEFunc, ODESolver, RK4Solver};
    pub use crate::simulation::{Simulation, SimulationConfig, SolverKind, Trajectory};
    pub use crate::stimulus::{
        Composite, OscillatorySweep, Ramp, StepPulse, Stimulus, TestPulse, Waveform,
    };
    pub use crate::sweep::{Sweep, SweepParameter, SweepPoint};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_display_carries_divergence_context() {
        let err = Error::Diverged {
            time: 1234.5,
            voltage: -612.3,
            sodium: 0.04,
        };
        let msg = err.to_string();
        assert!(msg.contains("1234.5"));
        assert!(msg.contains("-612.3"));
    }
}
