//! # Membrane Channels
//!
//! Everything that produces a membrane current: the shared gate-kinetics
//! abstraction, the four voltage-gated channel populations, the passive
//! leak, and the Na/K pump.
//!
//! All gates run through one parametrized code path ([`GateSpec`]): a
//! channel type differs only in its descriptors and in how its open
//! probability combines the gating variables.

mod kinetics;
mod leak;
mod potassium;
mod pump;
mod sodium;

pub use kinetics::{
    Boltzmann, GateSpec, TauBell, GATE_SPECS, H_KF1, H_KF2, H_NAT, M_KF, M_NAP, M_NAT, NUM_GATES,
    N_KS,
};
pub use leak::Leak;
pub use potassium::{FastPotassium, SlowPotassium};
pub use pump::SodiumPump;
pub use sodium::{sodium_reversal, PersistentSodium, TransientSodium, NAI_FLOOR};
