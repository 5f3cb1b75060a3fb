pub mod ecg;
pub mod ppg;

pub use ecg::detect_cardiac_peaks;
pub use ppg::{detect_pulse_feet, detect_pulse_peaks};

/// Linearly interpolated percentile over a copy of the data (numpy
/// convention: rank = p/100 * (n-1)).
pub(crate) fn percentile(data: &[f64], p: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Amplitude-thresholded local maxima with minimum spacing. Candidates are
/// ranked by height; within a spacing window the higher peak survives.
pub(crate) fn find_peaks(data: &[f64], min_distance: usize, min_height: f64) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }
    let mut candidates: Vec<usize> = (1..data.len() - 1)
        .filter(|&i| data[i] > data[i - 1] && data[i] > data[i + 1] && data[i] >= min_height)
        .collect();
    candidates.sort_by(|&a, &b| {
        data[b]
            .partial_cmp(&data[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let min_distance = min_distance.max(1);
    let mut kept: Vec<usize> = Vec::new();
    for &idx in &candidates {
        if kept
            .iter()
            .all(|&k| idx.abs_diff(k) >= min_distance)
        {
            kept.push(idx);
        }
    }
    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_linear_interpolation() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&data, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&data, 75.0) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn close_peaks_resolve_to_the_higher_one() {
        let mut data = vec![0.0; 40];
        data[10] = 1.0;
        data[14] = 2.0; // taller neighbour within the spacing window
        data[30] = 1.5;
        let peaks = find_peaks(&data, 10, 0.5);
        assert_eq!(peaks, vec![14, 30]);
    }

    #[test]
    fn flat_signal_yields_no_peaks() {
        let data = vec![1.0; 100];
        assert!(find_peaks(&data, 5, 0.0).is_empty());
    }
}
