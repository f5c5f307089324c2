//! # Model
//!
//! The nine-state motor neuron model: parameter set with the calibrated
//! resting equilibrium, the named state vector, and the ODE right-hand
//! side that couples membrane voltage, channel gating, and intracellular
//! sodium.

pub mod params;
pub mod rhs;
pub mod state;

pub use params::{Parameters, NAI_REST, V_REST};
pub use rhs::{Currents, MotoneuronRhs, PUMP_NA_STOICHIOMETRY};
pub use state::State;
