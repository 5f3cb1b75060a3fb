//! Per-channel zero-phase conditioning filters.
//!
//! Cardiac and pulse channels get order-3 Butterworth band-passes, the
//! electrodermal channel an order-3 low-pass that isolates the tonic
//! component. Filters run forward and backward so no phase lag is
//! introduced, and cutoffs are clamped against Nyquist before design.

use crate::signal::TimeSeries;
use std::f64::consts::PI;
use thiserror::Error;

/// Which physiological channel a raw series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Cardiac,
    Pulse,
    Electrodermal,
}

#[derive(Debug, Error)]
pub enum FilterError {
    /// Nyquist clamping collapsed the requested passband. Happens at very
    /// low sampling rates; surfaced instead of silently narrowing the band.
    #[error("filter band {low}-{high} Hz is degenerate at fs {fs} Hz")]
    DegenerateBand { low: f64, high: f64, fs: f64 },
}

/// Margin kept between a clamped cutoff and 0 Hz / Nyquist.
const EDGE_EPS_HZ: f64 = 1e-3;

/// Condition one raw channel according to its kind.
///
/// Output has the same length and sampling rate as the input.
pub fn condition(ts: &TimeSeries, kind: ChannelKind) -> Result<TimeSeries, FilterError> {
    match kind {
        ChannelKind::Cardiac => bandpass_zero_phase(ts, 5.0, 30.0),
        ChannelKind::Pulse => bandpass_zero_phase(ts, 0.5, 8.0),
        ChannelKind::Electrodermal => lowpass_zero_phase(ts, 2.0),
    }
}

/// Zero-phase order-3 Butterworth band-pass, realized as a high-pass /
/// low-pass cascade.
pub fn bandpass_zero_phase(ts: &TimeSeries, low: f64, high: f64) -> Result<TimeSeries, FilterError> {
    let nyquist = ts.fs / 2.0;
    let low = low.max(EDGE_EPS_HZ);
    let high = high.min(nyquist - EDGE_EPS_HZ);
    if low >= high || high <= 0.0 {
        return Err(FilterError::DegenerateBand {
            low,
            high,
            fs: ts.fs,
        });
    }
    let mut sections = butterworth_highpass_sections(ts.fs, low).to_vec();
    sections.extend_from_slice(&butterworth_lowpass_sections(ts.fs, high));
    // Edge transients settle over roughly fs/low samples.
    let pad = (3.0 * ts.fs / low).round() as usize;
    Ok(TimeSeries {
        fs: ts.fs,
        data: filtfilt(&sections, &ts.data, pad),
    })
}

/// Zero-phase order-3 Butterworth low-pass.
pub fn lowpass_zero_phase(ts: &TimeSeries, cutoff: f64) -> Result<TimeSeries, FilterError> {
    let nyquist = ts.fs / 2.0;
    let cutoff = cutoff.min(nyquist - EDGE_EPS_HZ);
    if cutoff <= 0.0 {
        return Err(FilterError::DegenerateBand {
            low: 0.0,
            high: cutoff,
            fs: ts.fs,
        });
    }
    let sections = butterworth_lowpass_sections(ts.fs, cutoff);
    let pad = (3.0 * ts.fs / cutoff).round() as usize;
    Ok(TimeSeries {
        fs: ts.fs,
        data: filtfilt(&sections, &ts.data, pad),
    })
}

/// Normalized second-order section (a0 = 1). First-order sections are
/// carried with b2 = a2 = 0.
#[derive(Debug, Clone, Copy)]
struct Section {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Section {
    fn process(&self, data: &mut [f64]) {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);
        for v in data.iter_mut() {
            let x0 = *v;
            let y0 = self.b0 * x0 + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            *v = y0;
        }
    }
}

/// Order-3 Butterworth low-pass: a bilinear first-order pole plus a Q = 1
/// biquad (the complex pole pair of the analog prototype).
fn butterworth_lowpass_sections(fs: f64, cutoff: f64) -> [Section; 2] {
    [first_order_lowpass(fs, cutoff), biquad_lowpass(fs, cutoff, 1.0)]
}

fn butterworth_highpass_sections(fs: f64, cutoff: f64) -> [Section; 2] {
    [first_order_highpass(fs, cutoff), biquad_highpass(fs, cutoff, 1.0)]
}

fn first_order_lowpass(fs: f64, cutoff: f64) -> Section {
    let k = (PI * cutoff / fs).tan();
    let norm = 1.0 / (k + 1.0);
    Section {
        b0: k * norm,
        b1: k * norm,
        b2: 0.0,
        a1: (k - 1.0) * norm,
        a2: 0.0,
    }
}

fn first_order_highpass(fs: f64, cutoff: f64) -> Section {
    let k = (PI * cutoff / fs).tan();
    let norm = 1.0 / (k + 1.0);
    Section {
        b0: norm,
        b1: -norm,
        b2: 0.0,
        a1: (k - 1.0) * norm,
        a2: 0.0,
    }
}

fn biquad_lowpass(fs: f64, cutoff: f64, q: f64) -> Section {
    let omega = 2.0 * PI * cutoff / fs;
    let (sin_w, cos_w) = omega.sin_cos();
    let alpha = sin_w / (2.0 * q);
    let a0 = 1.0 + alpha;
    Section {
        b0: (1.0 - cos_w) / 2.0 / a0,
        b1: (1.0 - cos_w) / a0,
        b2: (1.0 - cos_w) / 2.0 / a0,
        a1: -2.0 * cos_w / a0,
        a2: (1.0 - alpha) / a0,
    }
}

fn biquad_highpass(fs: f64, cutoff: f64, q: f64) -> Section {
    let omega = 2.0 * PI * cutoff / fs;
    let (sin_w, cos_w) = omega.sin_cos();
    let alpha = sin_w / (2.0 * q);
    let a0 = 1.0 + alpha;
    Section {
        b0: (1.0 + cos_w) / 2.0 / a0,
        b1: -(1.0 + cos_w) / a0,
        b2: (1.0 + cos_w) / 2.0 / a0,
        a1: -2.0 * cos_w / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Forward-backward filtering over an odd-reflection extension of the
/// input, so startup transients decay inside the padding.
fn filtfilt(sections: &[Section], x: &[f64], pad: usize) -> Vec<f64> {
    if x.is_empty() {
        return Vec::new();
    }
    let pad = pad.min(x.len() - 1);
    let mut y = odd_extend(x, pad);
    run_cascade(sections, &mut y);
    y.reverse();
    run_cascade(sections, &mut y);
    y.reverse();
    y[pad..pad + x.len()].to_vec()
}

fn run_cascade(sections: &[Section], data: &mut [f64]) {
    for section in sections {
        section.process(data);
    }
}

fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        out.push(2.0 * x[0] - x[i]);
    }
    out.extend_from_slice(x);
    for i in 1..=pad {
        out.push(2.0 * x[n - 1] - x[n - 1 - i]);
    }
    out
}
