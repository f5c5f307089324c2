//! # Simulation
//!
//! The run driver: owns the parameter set and the run configuration,
//! integrates the model from a given (or the documented resting) initial
//! state under a stimulus, and returns the sampled [`Trajectory`].
//!
//! Physiological bounds are enforced on the sampled states after the
//! integration: a run whose voltage leaves ±500 mV or whose sodium pool
//! reaches zero fails with [`Error::Diverged`] instead of producing a
//! clamped trace.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::model::state::{IDX_NAI, IDX_V};
use crate::model::{MotoneuronRhs, Parameters, State};
use crate::ode::{Dopri5Solver, ODEConfig, ODESolver, RK4Solver};
use crate::stimulus::Stimulus;
use crate::{Error, Result, DEFAULT_DT};

/// Hard voltage bound (mV); beyond it the run is declared divergent
const V_BOUND: f64 = 500.0;

/// Fixed step for the RK4 reference, well under the fastest gate time
/// constant (0.1 ms floor)
const RK4_REFERENCE_STEP: f64 = 0.002;

/// Which integrator drives the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Adaptive Dormand-Prince 5(4), the production choice
    Dopri5,
    /// Fixed-step RK4 reference
    Rk4,
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::Dopri5
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dopri5" => Ok(SolverKind::Dopri5),
            "rk4" => Ok(SolverKind::Rk4),
            _ => Err(Error::Config(format!(
                "unknown solver '{}', expected dopri5 or rk4",
                s
            ))),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Dopri5 => write!(f, "dopri5"),
            SolverKind::Rk4 => write!(f, "rk4"),
        }
    }
}

/// Horizon, output grid, and solver selection for one run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Run horizon (ms), starting at t = 0
    pub t_end: f64,
    /// Output sampling step (ms)
    pub dt: f64,
    /// Integrator selection
    pub solver: SolverKind,
    /// Tolerances and step bounds for the adaptive solver
    pub ode: ODEConfig,
}

impl SimulationConfig {
    pub fn new(t_end: f64) -> Self {
        Self {
            t_end,
            dt: DEFAULT_DT,
            solver: SolverKind::default(),
            ode: ODEConfig::default(),
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.t_end > 0.0 && self.t_end.is_finite()) {
            return Err(Error::Config(format!(
                "t_end must be positive, got {}",
                self.t_end
            )));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(Error::Config(format!("dt must be positive, got {}", self.dt)));
        }
        if self.dt > self.t_end {
            return Err(Error::Config(format!(
                "dt ({} ms) exceeds t_end ({} ms)",
                self.dt, self.t_end
            )));
        }
        self.ode.validate()
    }

    /// Number of output samples, endpoints included
    pub fn n_samples(&self) -> usize {
        (self.t_end / self.dt).round() as usize + 1
    }
}

/// Sampled run output: times plus the full 9-state vector at each time
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<Array1<f64>>,
}

impl Trajectory {
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[Array1<f64>] {
        &self.states
    }

    /// Membrane voltage column (mV)
    pub fn voltage(&self) -> Vec<f64> {
        self.states.iter().map(|z| z[IDX_V]).collect()
    }

    /// Intracellular sodium column (mol/L)
    pub fn sodium(&self) -> Vec<f64> {
        self.states.iter().map(|z| z[IDX_NAI]).collect()
    }

    /// Named view of sample `i`
    pub fn state(&self, i: usize) -> State {
        State::from_array(&self.states[i])
    }

    pub fn last_state(&self) -> Option<State> {
        self.states.last().map(State::from_array)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A configured, validated simulation ready to run stimuli
#[derive(Debug, Clone)]
pub struct Simulation {
    params: Parameters,
    config: SimulationConfig,
}

impl Simulation {
    /// Validate and freeze a parameter set plus run configuration
    pub fn new(params: Parameters, config: SimulationConfig) -> Result<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Integrate from the documented resting state
    pub fn run<S: Stimulus + ?Sized>(&self, stimulus: &S) -> Result<Trajectory> {
        self.run_from(&State::resting(), stimulus)
    }

    /// Integrate from an explicit initial state
    pub fn run_from<S: Stimulus + ?Sized>(&self, initial: &State, stimulus: &S) -> Result<Trajectory> {
        let z0 = initial.to_array();
        if !z0.iter().all(|x| x.is_finite()) {
            return Err(Error::Config(
                "initial state contains a non-finite component".to_string(),
            ));
        }
        if initial.nai <= 0.0 {
            return Err(Error::Config(format!(
                "initial Nai must be positive, got {}",
                initial.nai
            )));
        }

        let n_steps = self.config.n_samples();
        let rhs = MotoneuronRhs::new(self.params.clone(), stimulus);

        info!(
            "integrating {} ms at dt = {} ms with {} ({} samples)",
            self.config.t_end, self.config.dt, self.config.solver, n_steps
        );

        let span = (0.0, self.config.t_end);
        let solved = match self.config.solver {
            SolverKind::Dopri5 => {
                Dopri5Solver::new(self.config.ode.clone()).solve(&rhs, z0, span, n_steps)
            }
            SolverKind::Rk4 => RK4Solver::new(RK4_REFERENCE_STEP).solve(&rhs, z0, span, n_steps),
        };

        let (times, states) = match solved {
            Ok(out) => out,
            Err(e) => {
                error!("integration failed: {}; params: {:?}", e, self.params);
                return Err(e);
            }
        };

        self.check_bounds(&times, &states)?;

        if let Some(last) = states.last() {
            debug!(
                "run complete: {} samples, final V = {:.3} mV, final Nai = {:.6e} M",
                times.len(),
                last[IDX_V],
                last[IDX_NAI]
            );
        }

        Ok(Trajectory { times, states })
    }

    /// Physiological bounds on the sampled states; first violation fails
    /// the run
    fn check_bounds(&self, times: &[f64], states: &[Array1<f64>]) -> Result<()> {
        for (t, z) in times.iter().zip(states) {
            let v = z[IDX_V];
            let nai = z[IDX_NAI];
            if !z.iter().all(|x| x.is_finite()) || nai <= 0.0 || v.abs() > V_BOUND {
                error!(
                    "simulation diverged at t = {:.3} ms (V = {:.3} mV, Nai = {:.6e} M); params: {:?}",
                    t, v, nai, self.params
                );
                return Err(Error::Diverged {
                    time: *t,
                    voltage: v,
                    sodium: nai,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
