//! Cardiac R-peak detection on the band-passed signal.

use super::{find_peaks, percentile};
use crate::signal::{Events, TimeSeries};

/// Minimum physiological spacing between beats (refractory period).
const MIN_SPACING_S: f64 = 0.25;
/// Amplitude gate as a percentile of the conditioned signal.
const HEIGHT_PERCENTILE: f64 = 75.0;

/// Locate cardiac peaks in a conditioned cardiac channel.
///
/// Peaks below the 75th amplitude percentile are ignored; peaks closer
/// than 0.25 s resolve to the higher one. May return no events.
pub fn detect_cardiac_peaks(ts: &TimeSeries) -> Events {
    if ts.is_empty() {
        return Events::from_indices(Vec::new());
    }
    let distance = (MIN_SPACING_S * ts.fs) as usize;
    let height = percentile(&ts.data, HEIGHT_PERCENTILE);
    Events::from_indices(find_peaks(&ts.data, distance, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump_train(fs: f64, beat_times: &[f64], secs: f64) -> TimeSeries {
        let n = (fs * secs) as usize;
        let mut data = vec![0.0; n];
        for (i, v) in data.iter_mut().enumerate() {
            let t = i as f64 / fs;
            for &bt in beat_times {
                *v += (-0.5 * ((t - bt) / 0.01).powi(2)).exp();
            }
        }
        TimeSeries { fs, data }
    }

    #[test]
    fn finds_each_beat_of_a_regular_train() {
        let fs = 128.0;
        let beats: Vec<f64> = (0..10).map(|k| 0.5 + 0.8 * k as f64).collect();
        let ts = bump_train(fs, &beats, 9.0);
        let events = detect_cardiac_peaks(&ts);
        assert_eq!(events.len(), beats.len());
        for (idx, bt) in events.indices.iter().zip(&beats) {
            let err = (*idx as f64 / fs - bt).abs();
            assert!(err < 0.02, "peak off by {err} s");
        }
    }

    #[test]
    fn indices_are_strictly_ascending() {
        let fs = 128.0;
        let beats: Vec<f64> = (0..8).map(|k| 0.4 + 0.7 * k as f64).collect();
        let events = detect_cardiac_peaks(&bump_train(fs, &beats, 6.5));
        for w in events.indices.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn empty_signal_gives_empty_events() {
        let ts = TimeSeries {
            fs: 128.0,
            data: Vec::new(),
        };
        assert!(detect_cardiac_peaks(&ts).is_empty());
    }
}
