//! # Sweep
//!
//! Embarrassingly parallel parameter sweeps: one full simulation plus
//! feature extraction per grid value, fanned out with `rayon`. A point
//! that fails (invalid derived configuration, divergent run) is reported
//! in its row instead of aborting the sweep.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{FeatureExtractor, FeatureSummary, StimulusWindow};
use crate::model::Parameters;
use crate::simulation::{Simulation, SimulationConfig};
use crate::stimulus::StepPulse;
use crate::{Error, Result};

/// Which scalar the sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    /// Pump half-activation concentration `naih` (M)
    PumpHalfActivation,
    /// Step stimulus amplitude (pA)
    StimulusAmplitude,
}

impl FromStr for SweepParameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "naih" | "pump_half_activation" => Ok(SweepParameter::PumpHalfActivation),
            "amplitude" | "inj" => Ok(SweepParameter::StimulusAmplitude),
            _ => Err(Error::Config(format!(
                "unknown sweep parameter '{}', expected naih or amplitude",
                s
            ))),
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepParameter::PumpHalfActivation => write!(f, "naih"),
            SweepParameter::StimulusAmplitude => write!(f, "amplitude"),
        }
    }
}

/// One sweep row: the grid value plus either a feature summary or the
/// failure that replaced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub features: Option<FeatureSummary>,
    pub error: Option<String>,
}

/// An evenly spaced grid over one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub parameter: SweepParameter,
    pub start: f64,
    pub stop: f64,
    pub points: usize,
}

impl Sweep {
    pub fn new(parameter: SweepParameter, start: f64, stop: f64, points: usize) -> Self {
        Self {
            parameter,
            start,
            stop,
            points,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(Error::Config("sweep needs at least 1 point".to_string()));
        }
        if !(self.start.is_finite() && self.stop.is_finite()) {
            return Err(Error::Config(format!(
                "sweep range [{}, {}] must be finite",
                self.start, self.stop
            )));
        }
        Ok(())
    }

    /// The grid values, endpoints included
    pub fn values(&self) -> Vec<f64> {
        if self.points == 1 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / (self.points - 1) as f64;
        (0..self.points)
            .map(|i| self.start + i as f64 * step)
            .collect()
    }

    /// Run the whole grid in parallel against a base configuration
    pub fn run(
        &self,
        base_params: &Parameters,
        config: &SimulationConfig,
        pulse: &StepPulse,
    ) -> Result<Vec<SweepPoint>> {
        self.validate()?;

        let values = self.values();
        info!(
            "sweeping {} over [{}, {}] in {} points",
            self.parameter, self.start, self.stop, self.points
        );

        let points = values
            .into_par_iter()
            .map(|value| self.run_point(value, base_params, config, pulse))
            .collect();
        Ok(points)
    }

    fn run_point(
        &self,
        value: f64,
        base_params: &Parameters,
        config: &SimulationConfig,
        pulse: &StepPulse,
    ) -> SweepPoint {
        let mut params = base_params.clone();
        let mut pulse = *pulse;
        match self.parameter {
            SweepParameter::PumpHalfActivation => params.pump.na_half = value,
            SweepParameter::StimulusAmplitude => pulse.amplitude = value,
        }

        let outcome = Simulation::new(params, config.clone())
            .and_then(|sim| sim.run(&pulse))
            .map(|trajectory| {
                FeatureExtractor::default().extract(
                    trajectory.times(),
                    &trajectory.voltage(),
                    StimulusWindow::from(&pulse),
                )
            });

        match outcome {
            Ok(features) => SweepPoint {
                value,
                features: Some(features),
                error: None,
            },
            Err(e) => SweepPoint {
                value,
                features: None,
                error: Some(e.to_string()),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_parsing() {
        assert_eq!(
            "naih".parse::<SweepParameter>().unwrap(),
            SweepParameter::PumpHalfActivation
        );
        assert_eq!(
            "amplitude".parse::<SweepParameter>().unwrap(),
            SweepParameter::StimulusAmplitude
        );
        assert!("conductance".parse::<SweepParameter>().is_err());
    }

    #[test]
    fn test_linspace_values() {
        let sweep = Sweep::new(SweepParameter::StimulusAmplitude, 0.0, 100.0, 5);
        assert_eq!(sweep.values(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);

        let single = Sweep::new(SweepParameter::PumpHalfActivation, 0.04, 0.07, 1);
        assert_eq!(single.values(), vec![0.04]);
    }

    #[test]
    fn test_zero_points_rejected() {
        let sweep = Sweep::new(SweepParameter::StimulusAmplitude, 0.0, 1.0, 0);
        let result = sweep.run(
            &Parameters::default(),
            &SimulationConfig::new(10.0),
            &StepPulse::new(0.0, 2.0, 5.0),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_quiet_amplitude_sweep() {
        // tiny amplitudes stay subthreshold, so every point completes
        // with zero spikes
        let sweep = Sweep::new(SweepParameter::StimulusAmplitude, 0.0, 2.0, 3);
        let points = sweep
            .run(
                &Parameters::default(),
                &SimulationConfig::new(50.0),
                &StepPulse::new(0.0, 10.0, 20.0),
            )
            .unwrap();

        assert_eq!(points.len(), 3);
        for point in &points {
            assert!(point.error.is_none(), "point {} failed", point.value);
            assert_eq!(point.features.as_ref().unwrap().spike_count, 0);
        }
    }

    #[test]
    fn test_failed_point_is_reported_in_row() {
        let mut base = Parameters::default();
        base.pump.i_max = -1.0; // rejected by validation at every point
        let sweep = Sweep::new(SweepParameter::StimulusAmplitude, 0.0, 1.0, 2);
        let points = sweep
            .run(
                &base,
                &SimulationConfig::new(10.0),
                &StepPulse::new(0.0, 2.0, 5.0),
            )
            .unwrap();

        assert_eq!(points.len(), 2);
        for point in &points {
            assert!(point.features.is_none());
            assert!(point.error.as_ref().unwrap().contains("Imax"));
        }
    }
}
