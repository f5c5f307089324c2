//! Spike and trough detection plus firing-rate summaries.
//!
//! Detection works on the sampled grid: a spike is a local maximum above
//! the threshold (`v[i] > v[i-1]` and `v[i] >= v[i+1]`, so a flat-topped
//! peak counts once), a trough the mirror image. Peaks before the
//! stimulus onset are discarded.

/// Times of local maxima above `threshold` at or after `onset`
pub fn detect_spikes(times: &[f64], voltage: &[f64], threshold: f64, onset: f64) -> Vec<f64> {
    let n = voltage.len();
    let mut spikes = Vec::new();
    for i in 1..n.saturating_sub(1) {
        if voltage[i] > voltage[i - 1]
            && voltage[i] >= voltage[i + 1]
            && voltage[i] > threshold
            && times[i] >= onset
        {
            spikes.push(times[i]);
        }
    }
    spikes
}

/// Voltages of interior local minima strictly after `after`
pub fn detect_troughs(times: &[f64], voltage: &[f64], after: f64) -> Vec<f64> {
    let n = voltage.len();
    let mut troughs = Vec::new();
    for i in 1..n.saturating_sub(1) {
        if voltage[i] < voltage[i - 1] && voltage[i] <= voltage[i + 1] && times[i] > after {
            troughs.push(voltage[i]);
        }
    }
    troughs
}

/// Instantaneous firing rates (Hz) from consecutive spike times (ms)
pub fn instantaneous_rates(spike_times: &[f64]) -> Vec<f64> {
    spike_times
        .windows(2)
        .map(|pair| 1000.0 / (pair[1] - pair[0]))
        .collect()
}

/// Midpoints (ms) of consecutive spike intervals, aligned with
/// [`instantaneous_rates`]
pub fn interval_midpoints(spike_times: &[f64]) -> Vec<f64> {
    spike_times
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]))
        .collect()
}

/// Early-versus-late firing-rate slope (Hz/ms)
///
/// The early window is IFR elements 15 through 7 from the end, the late
/// window the last 10 elements; the windows overlap. `None` when the
/// train has fewer than 15 intervals.
pub fn adaptation_slope(spike_times: &[f64]) -> Option<f64> {
    let rates = instantaneous_rates(spike_times);
    let mids = interval_midpoints(spike_times);
    let m = rates.len();
    if m < 15 {
        return None;
    }

    let early_rate = mean(&rates[m - 15..m - 6]);
    let late_rate = mean(&rates[m - 10..]);
    let t_early = mean(&mids[m - 15..m - 6]);
    let t_late = mean(&mids[m - 10..]);

    Some((early_rate - late_rate) / (t_late - t_early))
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ============================================================================
// Tests
// ============================================================================
