//! Seeded synthetic physiology generator.
//!
//! Produces a raw cardiac/pulse/electrodermal window together with its
//! ground truth: the cardiac-peak and pulse-foot indices the signals were
//! built from, plus the underlying IBI series. Identical seed and
//! configuration always reproduce the same window.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Target physiological state of a synthetic window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Normal,
    Stress,
    Fatigue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Cardiac and pulse sampling rate, Hz.
    pub fs: f64,
    /// Electrodermal sampling rate, Hz.
    pub fs_eda: f64,
    pub window_secs: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            fs: 128.0,
            fs_eda: 32.0,
            window_secs: 60.0,
            seed: 42,
        }
    }
}

/// A raw window plus the ground truth it was generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticWindow {
    pub cardiac: Vec<f64>,
    pub pulse: Vec<f64>,
    pub eda: Vec<f64>,
    /// Authoritative cardiac-peak sample indices, strictly ascending.
    pub cardiac_peaks: Vec<usize>,
    /// Authoritative pulse-foot indices: each peak delayed by the mode's
    /// transit time.
    pub pulse_feet: Vec<usize>,
    /// The IBI series the peak train was integrated from, in seconds.
    pub ibi: Vec<f64>,
}

/// Per-mode signal design. Chosen so the default rule table classifies
/// each mode as itself when the ground-truth entry path is used.
struct ModeParams {
    hr_bpm: f64,
    ptt_s: f64,
    /// Gaussian beat-to-beat jitter, seconds.
    ibi_jitter: f64,
    /// Low/high-frequency IBI modulation amplitudes, seconds.
    lf_amp: f64,
    hf_amp: f64,
    scr_events: usize,
    scr_amp: f64,
    eda_drift_amp: f64,
    eda_noise: f64,
}

impl ModeParams {
    fn for_mode(mode: Mode) -> Self {
        match mode {
            // elevated rate, suppressed variability, short transit, busy EDA
            Mode::Stress => Self {
                hr_bpm: 92.0,
                ptt_s: 0.20,
                ibi_jitter: 0.003,
                lf_amp: 0.04,
                hf_amp: 0.001,
                scr_events: 8,
                scr_amp: 0.08,
                eda_drift_amp: 0.01,
                eda_noise: 0.002,
            },
            // slow rate, high variability, long transit, quiet EDA
            Mode::Fatigue => Self {
                hr_bpm: 60.0,
                ptt_s: 0.28,
                ibi_jitter: 0.04,
                lf_amp: 0.06,
                hf_amp: 0.07,
                scr_events: 1,
                scr_amp: 0.015,
                eda_drift_amp: 0.004,
                eda_noise: 0.002,
            },
            // mid-range everywhere; fails both rule sets on heart rate
            Mode::Normal => Self {
                hr_bpm: 75.0,
                ptt_s: 0.24,
                ibi_jitter: 0.02,
                lf_amp: 0.02,
                hf_amp: 0.015,
                scr_events: 3,
                scr_amp: 0.04,
                eda_drift_amp: 0.01,
                eda_noise: 0.003,
            },
        }
    }
}

const LF_MOD_HZ: f64 = 0.08;
const HF_MOD_HZ: f64 = 0.25;

/// Generate one synthetic window for the given mode.
pub fn synthesize(mode: Mode, config: &SynthConfig) -> SyntheticWindow {
    let params = ModeParams::for_mode(mode);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let ibi = synth_ibi_series(&params, config.window_secs, &mut rng);
    let cardiac_peaks = ibi_to_peaks(&ibi, config.fs);
    let delay = (params.ptt_s * config.fs).round() as usize;
    let pulse_feet: Vec<usize> = cardiac_peaks.iter().map(|p| p + delay).collect();

    let n = (config.fs * config.window_secs) as usize;
    let cardiac = synth_cardiac(&cardiac_peaks, n, config.fs, &mut rng);
    let pulse = synth_pulse(&pulse_feet, n, config.fs, &mut rng);
    let eda = synth_eda(&params, config, &mut rng);

    SyntheticWindow {
        cardiac,
        pulse,
        eda,
        cardiac_peaks,
        pulse_feet,
        ibi,
    }
}

/// Base interval plus LF/HF sinusoidal modulation plus Gaussian jitter,
/// clipped to a physiological 0.3-2.0 s range.
fn synth_ibi_series(params: &ModeParams, window_secs: f64, rng: &mut StdRng) -> Vec<f64> {
    let n_beats = (params.hr_bpm / 60.0 * window_secs).round() as usize;
    let base = 60.0 / params.hr_bpm;
    let mut ibi = Vec::with_capacity(n_beats);
    for k in 0..n_beats {
        let t = k as f64 * window_secs / n_beats as f64;
        let value = base
            + params.lf_amp * (2.0 * PI * LF_MOD_HZ * t).sin()
            + params.hf_amp * (2.0 * PI * HF_MOD_HZ * t).sin()
            + params.ibi_jitter * gauss(rng);
        ibi.push(value.clamp(0.3, 2.0));
    }
    ibi
}

/// Cumulative beat times to sample indices, starting at zero.
fn ibi_to_peaks(ibi: &[f64], fs: f64) -> Vec<usize> {
    let mut peaks = Vec::with_capacity(ibi.len());
    let mut t = 0.0;
    for (k, interval) in ibi.iter().enumerate() {
        if k > 0 {
            t += interval;
        }
        let idx = (t * fs).round() as usize;
        if peaks.last().map_or(true, |&last| idx > last) {
            peaks.push(idx);
        }
    }
    peaks
}

/// Gaussian bump at every peak plus broadband noise.
fn synth_cardiac(peaks: &[usize], n: usize, fs: f64, rng: &mut StdRng) -> Vec<f64> {
    let mut out = vec![0.0; n];
    let width = (0.02 * fs) as i64;
    let sigma = 0.007 * fs;
    for &peak in peaks {
        for k in -width..=width {
            let i = peak as i64 + k;
            if i < 0 || i >= n as i64 {
                continue;
            }
            out[i as usize] += (-0.5 * (k as f64 / sigma).powi(2)).exp();
        }
    }
    for v in out.iter_mut() {
        *v += 0.005 * gauss(rng);
    }
    out
}

/// Exponential-decay wave launched at each foot, z-scored, plus noise.
fn synth_pulse(feet: &[usize], n: usize, fs: f64, rng: &mut StdRng) -> Vec<f64> {
    let mut out = vec![0.0; n];
    let tail = (0.30 * fs) as usize;
    let tau = 0.08 * fs;
    for &foot in feet {
        if foot >= n {
            continue;
        }
        let end = (foot + tail).min(n);
        for (k, v) in out[foot..end].iter_mut().enumerate() {
            *v += (-(k as f64) / tau).exp();
        }
    }
    let mean = out.iter().sum::<f64>() / n as f64;
    let std = (out.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64).sqrt() + 1e-8;
    for v in out.iter_mut() {
        *v = (*v - mean) / std + 0.01 * gauss(rng);
    }
    out
}

/// Slow tonic drift plus evenly spread phasic events plus noise.
fn synth_eda(params: &ModeParams, config: &SynthConfig, rng: &mut StdRng) -> Vec<f64> {
    let n = (config.fs_eda * config.window_secs) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / config.fs_eda;
            0.5 + params.eda_drift_amp * (2.0 * PI * 0.01 * t).sin() + params.eda_noise * gauss(rng)
        })
        .collect();

    let event_len = (0.8 * config.fs_eda) as usize;
    let rise = 0.15 * config.fs_eda;
    let decay = 0.7 * config.fs_eda;
    for e in 0..params.scr_events {
        // even spread with a little jitter keeps events from merging
        let slot = config.window_secs / params.scr_events as f64;
        let onset_s = (e as f64 + 0.3) * slot + 0.4 * slot * rng.gen::<f64>();
        let onset = (onset_s * config.fs_eda) as usize;
        for k in 0..event_len {
            let i = onset + k;
            if i >= n {
                break;
            }
            let wave = (1.0 - (-(k as f64) / rise).exp()) * (-(k as f64) / decay).exp();
            out[i] += params.scr_amp * wave;
        }
    }
    out
}

/// Standard normal deviate via Box-Muller.
fn gauss(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
