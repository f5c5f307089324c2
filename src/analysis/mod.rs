//! # Analysis
//!
//! Post-hoc feature extraction: turns a sampled voltage trajectory plus
//! the stimulus window into an immutable [`FeatureSummary`] of spike,
//! firing-rate, adaptation, and afterhyperpolarization metrics.
//!
//! Degenerate inputs are legitimate outcomes here: a zero-spike trial
//! produces sentinel values (`None` where "never happened" must not be
//! confused with "at zero"), never an error.

mod ahp;
mod spikes;

use serde::Serialize;
use tracing::debug;

use crate::stimulus::StepPulse;

/// Onset and duration of the injection epoch the metrics are measured
/// against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StimulusWindow {
    /// Injection onset (ms)
    pub onset: f64,
    /// Injection duration (ms)
    pub duration: f64,
}

impl StimulusWindow {
    pub fn new(onset: f64, duration: f64) -> Self {
        Self { onset, duration }
    }

    /// End of the injection epoch (ms)
    pub fn offset(&self) -> f64 {
        self.onset + self.duration
    }
}

impl From<&StepPulse> for StimulusWindow {
    fn from(pulse: &StepPulse) -> Self {
        Self::new(pulse.onset, pulse.duration)
    }
}

/// Extraction thresholds
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Voltage a local maximum must exceed to count as a spike (mV)
    pub spike_threshold: f64,
    /// How far before onset the baseline sample is taken (ms)
    pub baseline_lead: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            spike_threshold: -25.0,
            baseline_lead: 50.0,
        }
    }
}

/// Derived scalars for one trajectory; immutable once produced
///
/// `None` marks a metric whose defining event never occurred (no spike,
/// recovery level not reached, too few intervals). The firing-rate
/// summaries keep the historical 0.0 convention for trains with fewer
/// than two spikes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    /// Number of detected spikes at or after onset
    pub spike_count: usize,
    /// First spike time minus onset (ms)
    pub delay_to_first_spike: Option<f64>,
    /// Mean of the per-interval instantaneous rates (Hz)
    pub mean_firing_rate: f64,
    /// First instantaneous rate (Hz)
    pub initial_firing_rate: f64,
    /// Last instantaneous rate (Hz)
    pub final_firing_rate: f64,
    /// Early-minus-late rate change (Hz/ms)
    pub adaptation_slope: Option<f64>,
    /// Post-stimulus trough depth below baseline (mV)
    pub ahp_amplitude: Option<f64>,
    /// Latency to 25% recovery from the trough (ms)
    pub ahp_recovery_25: Option<f64>,
    /// Latency to 50% recovery from the trough (ms)
    pub ahp_recovery_50: Option<f64>,
    /// Latency to 75% recovery from the trough (ms)
    pub ahp_recovery_75: Option<f64>,
    /// Span from onset to the last spike, as a percentage of the
    /// stimulus duration
    pub spiking_integrity: Option<f64>,
    /// Mean voltage of the post-stimulus local minima (mV)
    pub mean_trough_voltage: Option<f64>,
}

/// Computes a [`FeatureSummary`] from a sampled trace
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract all metrics for one voltage trace
    ///
    /// `times` and `voltage` are parallel arrays on the output grid of a
    /// run; `window` is the injection epoch the metrics are referenced
    /// to.
    pub fn extract(&self, times: &[f64], voltage: &[f64], window: StimulusWindow) -> FeatureSummary {
        assert_eq!(times.len(), voltage.len(), "times/voltage length mismatch");

        let spike_times =
            spikes::detect_spikes(times, voltage, self.config.spike_threshold, window.onset);
        let rates = spikes::instantaneous_rates(&spike_times);

        let (mean_rate, initial_rate, final_rate) = if rates.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (spikes::mean(&rates), rates[0], rates[rates.len() - 1])
        };

        let delay_to_first_spike = spike_times.first().map(|t| t - window.onset);
        let spiking_integrity = spike_times.last().and_then(|t| {
            if window.duration > 0.0 {
                Some((t - window.onset) / window.duration * 100.0)
            } else {
                None
            }
        });

        let ahp = match ahp::baseline_voltage(times, voltage, window.onset, self.config.baseline_lead)
        {
            Some(baseline) => ahp::measure(times, voltage, window.offset(), baseline),
            None => ahp::AhpMetrics::default(),
        };

        let troughs = spikes::detect_troughs(times, voltage, window.offset());
        let mean_trough_voltage = if troughs.is_empty() {
            None
        } else {
            Some(spikes::mean(&troughs))
        };

        debug!(
            "extracted {} spikes, {} post-stimulus troughs",
            spike_times.len(),
            troughs.len()
        );

        FeatureSummary {
            spike_count: spike_times.len(),
            delay_to_first_spike,
            mean_firing_rate: mean_rate,
            initial_firing_rate: initial_rate,
            final_firing_rate: final_rate,
            adaptation_slope: spikes::adaptation_slope(&spike_times),
            ahp_amplitude: ahp.amplitude,
            ahp_recovery_25: ahp.recovery_25,
            ahp_recovery_50: ahp.recovery_50,
            ahp_recovery_75: ahp.recovery_75,
            spiking_integrity,
            mean_trough_voltage,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
