//! Pulse transit time from cardiac peaks and pulse feet.

use crate::signal::Events;

/// Mean delay between each cardiac peak and the next strictly later pulse
/// foot, in seconds.
///
/// Both sequences must be ascending. The pairing is a forward two-pointer
/// walk: feet at or before the current peak are skipped, the next foot is
/// taken, then both pointers advance. Unmatched trailing peaks or feet are
/// dropped. `None` when either sequence is empty or no pair forms.
pub fn ptt_from_pairs(peaks: &Events, feet: &Events, fs: f64) -> Option<f64> {
    if peaks.is_empty() || feet.is_empty() {
        return None;
    }
    let mut i = 0;
    let mut j = 0;
    let mut diffs = Vec::new();
    while i < peaks.indices.len() && j < feet.indices.len() {
        if feet.indices[j] <= peaks.indices[i] {
            j += 1;
            continue;
        }
        diffs.push((feet.indices[j] - peaks.indices[i]) as f64 / fs);
        i += 1;
        j += 1;
    }
    if diffs.is_empty() {
        None
    } else {
        Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(indices: &[usize]) -> Events {
        Events::from_indices(indices.to_vec())
    }

    #[test]
    fn pairs_each_peak_with_the_next_foot() {
        let peaks = events(&[0, 100, 200]);
        let feet = events(&[50, 150, 260]);
        // pairs (0,50), (100,150), (200,260) -> deltas 50, 50, 60 samples
        let ptt = ptt_from_pairs(&peaks, &feet, 128.0).unwrap();
        let expected = (50.0 + 50.0 + 60.0) / 3.0 / 128.0;
        assert!((ptt - expected).abs() < 1e-12);
    }

    #[test]
    fn skips_feet_at_or_before_the_peak() {
        let peaks = events(&[100]);
        let feet = events(&[40, 100, 130]);
        let ptt = ptt_from_pairs(&peaks, &feet, 100.0).unwrap();
        assert!((ptt - 0.30).abs() < 1e-12);
    }

    #[test]
    fn trailing_unmatched_events_are_dropped() {
        let peaks = events(&[0, 100, 200, 300]);
        let feet = events(&[50, 150]);
        let ptt = ptt_from_pairs(&peaks, &feet, 100.0).unwrap();
        assert!((ptt - 0.50).abs() < 1e-12);
    }

    #[test]
    fn unavailable_when_no_pair_forms() {
        assert!(ptt_from_pairs(&events(&[]), &events(&[10]), 100.0).is_none());
        assert!(ptt_from_pairs(&events(&[10]), &events(&[]), 100.0).is_none());
        // only feet before the sole peak
        assert!(ptt_from_pairs(&events(&[50]), &events(&[10, 20]), 100.0).is_none());
    }
}
