//! Afterhyperpolarization metrics.
//!
//! The AHP is measured against a pre-stimulus baseline: amplitude is the
//! depth of the post-stimulus voltage minimum below that baseline, and
//! the recovery latencies report how long the membrane takes to climb
//! back through 25/50/75% of the excursion.

/// Voltage at the last sample taken `lead` ms or more before `onset`;
/// falls back to the first sample of a short trace
pub fn baseline_voltage(times: &[f64], voltage: &[f64], onset: f64, lead: f64) -> Option<f64> {
    if voltage.is_empty() {
        return None;
    }
    let cutoff = onset - lead;
    let mut baseline = voltage[0];
    for (t, v) in times.iter().zip(voltage) {
        if *t > cutoff {
            break;
        }
        baseline = *v;
    }
    Some(baseline)
}

/// AHP amplitude and recovery latencies for one trace
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AhpMetrics {
    /// Trough voltage minus baseline (mV); negative for a genuine AHP
    pub amplitude: Option<f64>,
    /// Latency (ms) from the trough to 25% recovery toward baseline
    pub recovery_25: Option<f64>,
    /// Latency (ms) from the trough to 50% recovery toward baseline
    pub recovery_50: Option<f64>,
    /// Latency (ms) from the trough to 75% recovery toward baseline
    pub recovery_75: Option<f64>,
}

/// Measure the AHP on the samples strictly after `offset_time`
pub fn measure(times: &[f64], voltage: &[f64], offset_time: f64, baseline: f64) -> AhpMetrics {
    // index of the first post-stimulus sample
    let start = times.partition_point(|&t| t <= offset_time);
    if start >= voltage.len() {
        return AhpMetrics::default();
    }

    let mut trough_idx = start;
    for i in start..voltage.len() {
        if voltage[i] < voltage[trough_idx] {
            trough_idx = i;
        }
    }
    let trough_v = voltage[trough_idx];
    let trough_t = times[trough_idx];

    AhpMetrics {
        amplitude: Some(trough_v - baseline),
        recovery_25: recovery_latency(times, voltage, trough_idx, trough_t, trough_v, baseline, 0.25),
        recovery_50: recovery_latency(times, voltage, trough_idx, trough_t, trough_v, baseline, 0.50),
        recovery_75: recovery_latency(times, voltage, trough_idx, trough_t, trough_v, baseline, 0.75),
    }
}

/// First post-trough sample at or above the recovery level, as a latency
/// from the trough
fn recovery_latency(
    times: &[f64],
    voltage: &[f64],
    trough_idx: usize,
    trough_t: f64,
    trough_v: f64,
    baseline: f64,
    fraction: f64,
) -> Option<f64> {
    let target = trough_v + fraction * (baseline - trough_v);
    for i in trough_idx + 1..voltage.len() {
        if voltage[i] >= target {
            return Some(times[i] - trough_t);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
