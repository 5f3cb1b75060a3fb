//! Heart-rate and heart-rate-variability metrics over an IBI series.
//!
//! Every metric returns `Option<f64>`: `None` means "value unavailable"
//! (too few beats, degenerate spectrum), never an error and never NaN.

use crate::signal::IbiSeries;
use realfft::RealFftPlanner;
use std::f64::consts::PI;

/// Rate the IBI series is treated as being sampled at for spectral
/// analysis, in Hz.
const IBI_RESAMPLE_HZ: f64 = 4.0;
const LF_BAND: (f64, f64) = (0.04, 0.15);
const HF_BAND: (f64, f64) = (0.15, 0.40);
/// Minimum IBI count for a meaningful LF/HF estimate.
const MIN_IBI_FOR_SPECTRUM: usize = 8;

/// Mean heart rate in beats per minute: 60 / mean(IBI).
pub fn heart_rate(ibi: &IbiSeries) -> Option<f64> {
    if ibi.is_empty() {
        return None;
    }
    let mean = ibi.ibi.iter().sum::<f64>() / ibi.len() as f64;
    Some(60.0 / mean)
}

/// Population standard deviation of the IBI series, in seconds.
pub fn sdnn(ibi: &IbiSeries) -> Option<f64> {
    if ibi.is_empty() {
        return None;
    }
    let n = ibi.len() as f64;
    let mean = ibi.ibi.iter().sum::<f64>() / n;
    Some((ibi.ibi.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt())
}

/// Root-mean-square of successive IBI differences. Needs at least two
/// intervals (three beats).
pub fn rmssd(ibi: &IbiSeries) -> Option<f64> {
    if ibi.len() < 2 {
        return None;
    }
    let sq_sum: f64 = ibi.ibi.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    Some((sq_sum / (ibi.len() - 1) as f64).sqrt())
}

/// LF/HF spectral power ratio of the mean-centered IBI series.
///
/// The series is treated as uniformly sampled at 4 Hz and fed through a
/// Welch estimate (Hann window, segment = min(256, len), 50 % overlap).
/// Band powers come from trapezoidal integration over 0.04-0.15 Hz (LF)
/// and 0.15-0.40 Hz (HF).
///
/// `None` when fewer than 8 intervals exist, when the series is
/// numerically constant, or when the HF integral is not positive.
pub fn lf_hf_ratio(ibi: &IbiSeries) -> Option<f64> {
    if ibi.len() < MIN_IBI_FOR_SPECTRUM {
        return None;
    }
    let mean = ibi.ibi.iter().sum::<f64>() / ibi.len() as f64;
    let centered: Vec<f64> = ibi.ibi.iter().map(|x| x - mean).collect();
    if centered.iter().all(|x| x.abs() <= 1e-8) {
        return None;
    }

    let (freqs, powers) = welch_psd(&centered, IBI_RESAMPLE_HZ);
    let lf = integrate_band(&freqs, &powers, LF_BAND);
    let hf = integrate_band(&freqs, &powers, HF_BAND);
    if hf <= 0.0 {
        return None;
    }
    Some(lf / hf)
}

/// Trapezoidal integral of the spectrum over the points falling inside the
/// band (both edges inclusive). Fewer than two in-band points integrate
/// to zero.
fn integrate_band(freqs: &[f64], powers: &[f64], band: (f64, f64)) -> f64 {
    let pts: Vec<(f64, f64)> = freqs
        .iter()
        .zip(powers)
        .filter(|(f, _)| **f >= band.0 && **f <= band.1)
        .map(|(f, p)| (*f, *p))
        .collect();
    let mut area = 0.0;
    for w in pts.windows(2) {
        area += 0.5 * (w[1].1 + w[0].1) * (w[1].0 - w[0].0);
    }
    area
}

/// Welch PSD with one-sided density scaling: overlapping Hann-windowed
/// segments, periodograms averaged bin-wise.
fn welch_psd(signal: &[f64], fs: f64) -> (Vec<f64>, Vec<f64>) {
    let n = signal.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let nperseg = n.min(256);
    let step = (nperseg / 2).max(1);
    let window = hann(nperseg);
    let win_power: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (fs * win_power);

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(nperseg);
    let mut freqs = Vec::new();
    let mut powers = Vec::new();
    let mut segments = 0usize;
    let mut pos = 0usize;
    while pos + nperseg <= n {
        let mut frame: Vec<f64> = signal[pos..pos + nperseg]
            .iter()
            .zip(window.iter())
            .map(|(x, w)| x * w)
            .collect();
        let mut spectrum = r2c.make_output_vec();
        if r2c.process(&mut frame, &mut spectrum).is_err() {
            break;
        }
        for (k, val) in spectrum.iter().enumerate() {
            if segments == 0 {
                freqs.push(k as f64 * fs / nperseg as f64);
                powers.push(0.0);
            }
            let one_sided = if k == 0 || (nperseg % 2 == 0 && k == nperseg / 2) {
                1.0
            } else {
                2.0
            };
            powers[k] += one_sided * val.norm_sqr() * scale;
        }
        segments += 1;
        pos += step;
    }
    if segments > 0 {
        for p in powers.iter_mut() {
            *p /= segments as f64;
        }
    }
    (freqs, powers)
}

fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> IbiSeries {
        IbiSeries {
            ibi: values.to_vec(),
        }
    }

    #[test]
    fn constant_train_gives_exact_hr_and_zero_sdnn() {
        let ibi = series(&[0.8; 12]);
        let hr = heart_rate(&ibi).unwrap();
        assert!((hr - 75.0).abs() < 1e-12);
        assert!(sdnn(&ibi).unwrap().abs() < 1e-12);
    }

    #[test]
    fn hr_unavailable_without_intervals() {
        let ibi = series(&[]);
        assert!(heart_rate(&ibi).is_none());
        assert!(sdnn(&ibi).is_none());
    }

    #[test]
    fn rmssd_needs_two_intervals() {
        assert!(rmssd(&series(&[0.8])).is_none());
        let val = rmssd(&series(&[0.8, 0.9, 0.8])).unwrap();
        assert!((val - 0.1).abs() < 1e-12);
    }

    #[test]
    fn lfhf_unavailable_below_eight_intervals() {
        let ibi = series(&[0.8, 0.82, 0.78, 0.81, 0.79, 0.8, 0.83]);
        assert_eq!(ibi.len(), 7);
        assert!(lf_hf_ratio(&ibi).is_none());
    }

    #[test]
    fn lfhf_unavailable_for_constant_series() {
        assert!(lf_hf_ratio(&series(&[0.8; 32])).is_none());
    }

    #[test]
    fn lf_dominant_modulation_raises_the_ratio() {
        // 0.10 Hz tone at the assumed 4 Hz sampling sits in the LF band
        let lf_tone: Vec<f64> = (0..64)
            .map(|k| 0.8 + 0.05 * (2.0 * PI * 0.10 * k as f64 / 4.0).sin())
            .collect();
        // 0.30 Hz tone sits in the HF band
        let hf_tone: Vec<f64> = (0..64)
            .map(|k| 0.8 + 0.05 * (2.0 * PI * 0.30 * k as f64 / 4.0).sin())
            .collect();
        let lf_ratio = lf_hf_ratio(&series(&lf_tone)).unwrap();
        let hf_ratio = lf_hf_ratio(&series(&hf_tone)).unwrap();
        assert!(lf_ratio > 1.0, "LF-dominant ratio too low: {lf_ratio}");
        assert!(hf_ratio < 1.0, "HF-dominant ratio too high: {hf_ratio}");
        assert!(lf_ratio.is_finite() && hf_ratio.is_finite());
    }

    #[test]
    fn welch_freq_axis_starts_at_dc() {
        let signal: Vec<f64> = (0..32).map(|k| (k as f64 * 0.3).sin()).collect();
        let (freqs, powers) = welch_psd(&signal, 4.0);
        assert_eq!(freqs.len(), powers.len());
        assert!((freqs[0]).abs() < 1e-12);
        assert!(powers.iter().all(|p| p.is_finite() && *p >= 0.0));
    }
}
