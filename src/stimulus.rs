//! # Stimulus
//!
//! Injected-current generators. The core only sees the [`Stimulus`]
//! capability (current in pA at a time in ms); the generators here cover
//! the waveforms used throughout the protocols: step pulses, ramps,
//! oscillatory sweeps, brief test pulses, and additive composites.
//!
//! Every generator is serializable so a full protocol can live in JSON.

use serde::{Deserialize, Serialize};

/// Injected current (pA) as a function of time (ms)
pub trait Stimulus: Send + Sync {
    fn current(&self, t: f64) -> f64;
}

/// A constant holding current
impl Stimulus for f64 {
    fn current(&self, _t: f64) -> f64 {
        *self
    }
}

/// Rectangular current step: `amplitude` on `[onset, onset + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPulse {
    /// Step amplitude (pA)
    pub amplitude: f64,
    /// Step onset (ms)
    pub onset: f64,
    /// Step duration (ms)
    pub duration: f64,
}

impl StepPulse {
    pub fn new(amplitude: f64, onset: f64, duration: f64) -> Self {
        Self {
            amplitude,
            onset,
            duration,
        }
    }

    /// End of the step (ms)
    pub fn offset(&self) -> f64 {
        self.onset + self.duration
    }
}

impl Stimulus for StepPulse {
    fn current(&self, t: f64) -> f64 {
        if t >= self.onset && t < self.onset + self.duration {
            self.amplitude
        } else {
            0.0
        }
    }
}

/// Linear current ramp: 0 before `onset`, then `slope * (t - onset)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Ramp slope (pA/ms)
    pub slope: f64,
    /// Ramp onset (ms)
    pub onset: f64,
}

impl Ramp {
    pub fn new(slope: f64, onset: f64) -> Self {
        Self { slope, onset }
    }
}

impl Stimulus for Ramp {
    fn current(&self, t: f64) -> f64 {
        if t >= self.onset {
            self.slope * (t - self.onset)
        } else {
            0.0
        }
    }
}

/// Sinusoidal injection whose frequency sweeps linearly from `f0_hz` to
/// `f1_hz` across the window; zero outside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorySweep {
    /// Peak amplitude (pA)
    pub amplitude: f64,
    /// Frequency at the start of the window (Hz)
    pub f0_hz: f64,
    /// Frequency at the end of the window (Hz)
    pub f1_hz: f64,
    /// Window onset (ms)
    pub onset: f64,
    /// Window duration (ms)
    pub duration: f64,
}

impl OscillatorySweep {
    pub fn new(amplitude: f64, f0_hz: f64, f1_hz: f64, onset: f64, duration: f64) -> Self {
        Self {
            amplitude,
            f0_hz,
            f1_hz,
            onset,
            duration,
        }
    }
}

impl Stimulus for OscillatorySweep {
    fn current(&self, t: f64) -> f64 {
        if t < self.onset || t >= self.onset + self.duration {
            return 0.0;
        }
        let tau = t - self.onset;
        let f = self.f0_hz + (self.f1_hz - self.f0_hz) * tau / self.duration;
        // tau is in ms, f in Hz
        self.amplitude * (2.0 * std::f64::consts::PI * f * tau * 1e-3).sin()
    }
}

/// Brief rectangular pulse for excitability probes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestPulse {
    /// Pulse amplitude (pA)
    pub amplitude: f64,
    /// Pulse onset (ms)
    pub onset: f64,
    /// Pulse width (ms)
    pub width: f64,
}

impl TestPulse {
    pub fn new(amplitude: f64, onset: f64, width: f64) -> Self {
        Self {
            amplitude,
            onset,
            width,
        }
    }
}

impl Stimulus for TestPulse {
    fn current(&self, t: f64) -> f64 {
        if t >= self.onset && t < self.onset + self.width {
            self.amplitude
        } else {
            0.0
        }
    }
}

/// Additive combination of waveform components
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Composite(pub Vec<Waveform>);

impl Composite {
    pub fn new(components: Vec<Waveform>) -> Self {
        Self(components)
    }
}

impl Stimulus for Composite {
    fn current(&self, t: f64) -> f64 {
        self.0.iter().map(|w| w.current(t)).sum()
    }
}

/// A serializable stimulus description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Waveform {
    Step(StepPulse),
    Ramp(Ramp),
    Sweep(OscillatorySweep),
    Test(TestPulse),
    Composite(Composite),
    /// No injection
    Off,
}

impl Stimulus for Waveform {
    fn current(&self, t: f64) -> f64 {
        match self {
            Waveform::Step(w) => w.current(t),
            Waveform::Ramp(w) => w.current(t),
            Waveform::Sweep(w) => w.current(t),
            Waveform::Test(w) => w.current(t),
            Waveform::Composite(w) => w.current(t),
            Waveform::Off => 0.0,
        }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Off
    }
}

// ============================================================================
// Tests
// ============================================================================
