//! Pulse-wave systolic peak and foot (onset) detection.

use super::{find_peaks, percentile};
use crate::signal::{Events, TimeSeries};

/// Minimum spacing between pulse events, roughly one pulse period.
const MIN_SPACING_S: f64 = 0.35;
const PEAK_HEIGHT_PERCENTILE: f64 = 70.0;

/// Locate systolic peaks in a conditioned pulse channel.
pub fn detect_pulse_peaks(ts: &TimeSeries) -> Events {
    if ts.is_empty() {
        return Events::from_indices(Vec::new());
    }
    let distance = (MIN_SPACING_S * ts.fs) as usize;
    let height = percentile(&ts.data, PEAK_HEIGHT_PERCENTILE);
    Events::from_indices(find_peaks(&ts.data, distance, height))
}

/// Approximate pulse feet (waveform onsets).
///
/// A sample is a candidate when the first derivative is positive and the
/// sample sits less than one standard deviation above the running-minimum
/// baseline. Candidates are accepted left to right; once a foot is taken,
/// every later candidate inside the 0.35 s window is discarded rather than
/// re-evaluated.
pub fn detect_pulse_feet(ts: &TimeSeries) -> Events {
    let data = &ts.data;
    if data.len() < 2 {
        return Events::from_indices(Vec::new());
    }
    let d1 = central_gradient(data);
    let std = population_std(data);

    let mut running_min = f64::INFINITY;
    let min_distance = ((MIN_SPACING_S * ts.fs) as usize).max(1);
    let mut feet = Vec::new();
    let mut last: Option<usize> = None;
    for (i, &x) in data.iter().enumerate() {
        running_min = running_min.min(x);
        if d1[i] <= 0.0 || x - running_min >= std {
            continue;
        }
        if last.map_or(true, |l| i - l >= min_distance) {
            feet.push(i);
            last = Some(i);
        }
    }
    Events::from_indices(feet)
}

/// Central-difference derivative with one-sided differences at the edges.
fn central_gradient(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut out = vec![0.0; n];
    if n < 2 {
        return out;
    }
    out[0] = data[1] - data[0];
    out[n - 1] = data[n - 1] - data[n - 2];
    for i in 1..n - 1 {
        out[i] = (data[i + 1] - data[i - 1]) / 2.0;
    }
    out
}

fn population_std(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    (data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}
