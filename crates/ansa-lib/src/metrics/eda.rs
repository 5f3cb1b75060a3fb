//! Electrodermal (tonic/phasic) metrics.

use crate::signal::TimeSeries;

/// Fixed offset above the tonic mean that counts as a phasic event.
const SCR_THRESHOLD_OFFSET: f64 = 0.02;

/// Skin conductance level: mean of the conditioned electrodermal signal.
pub fn scl_level(ts: &TimeSeries) -> Option<f64> {
    if ts.is_empty() {
        return None;
    }
    Some(ts.data.iter().sum::<f64>() / ts.len() as f64)
}

/// Skin conductance response frequency in Hz.
///
/// Counts upward crossings of (mean + 0.02) and divides by the window
/// duration. `None` with fewer than two samples.
pub fn scr_frequency(ts: &TimeSeries) -> Option<f64> {
    if ts.len() < 2 {
        return None;
    }
    let mean = ts.data.iter().sum::<f64>() / ts.len() as f64;
    let thr = mean + SCR_THRESHOLD_OFFSET;
    let crossings = ts
        .data
        .windows(2)
        .filter(|w| w[0] < thr && w[1] >= thr)
        .count();
    Some(crossings as f64 / ts.duration())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scl_is_the_mean() {
        let ts = TimeSeries {
            fs: 32.0,
            data: vec![0.4, 0.6, 0.5],
        };
        assert!((scl_level(&ts).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn scl_unavailable_on_empty_signal() {
        let ts = TimeSeries {
            fs: 32.0,
            data: Vec::new(),
        };
        assert!(scl_level(&ts).is_none());
        assert!(scr_frequency(&ts).is_none());
    }

    #[test]
    fn counts_upward_threshold_crossings() {
        // mean 0.5, threshold 0.52; two excursions above it
        let mut data = vec![0.5; 64];
        data[10] = 0.6;
        data[11] = 0.6;
        data[40] = 0.6;
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        assert!(mean + 0.02 < 0.6);
        let ts = TimeSeries { fs: 32.0, data };
        let freq = scr_frequency(&ts).unwrap();
        assert!((freq - 2.0 / (n / 32.0)).abs() < 1e-12);
    }

    #[test]
    fn quiet_signal_has_zero_event_rate() {
        let ts = TimeSeries {
            fs: 32.0,
            data: vec![0.5; 128],
        };
        assert!((scr_frequency(&ts).unwrap()).abs() < 1e-12);
    }
}
