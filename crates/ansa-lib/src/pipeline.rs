//! Window-level orchestration: conditioning, detection, feature
//! extraction, classification.

use crate::classify::{classify, FeatureVector, Label, RuleTable};
use crate::conditioning::{condition, ChannelKind, FilterError};
use crate::detectors::{detect_cardiac_peaks, detect_pulse_feet, detect_pulse_peaks};
use crate::metrics::{
    heart_rate, lf_hf_ratio, ptt_from_pairs, rmssd, scl_level, scr_frequency, sdnn,
};
use crate::signal::{Events, IbiSeries, TimeSeries};
use serde::{Deserialize, Serialize};

/// Sampling configuration, fixed at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fs_cardiac: f64,
    pub fs_pulse: f64,
    pub fs_eda: f64,
    pub window_secs: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fs_cardiac: 128.0,
            fs_pulse: 128.0,
            fs_eda: 32.0,
            window_secs: 60.0,
        }
    }
}

/// Everything the driver needs to display: label, justification, the
/// feature vector, and the event sequences that produced it. Immutable
/// once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub reason: String,
    pub features: FeatureVector,
    pub cardiac_peaks: Events,
    /// Absent on the ground-truth entry path, which never detects them.
    pub pulse_peaks: Option<Events>,
    pub pulse_feet: Events,
}

/// One-window stress/fatigue pipeline. Stateless across calls: the only
/// fields are the immutable configuration and rule table, so independent
/// windows may be processed concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    rules: RuleTable,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            rules: RuleTable::default(),
        }
    }

    pub fn with_rules(config: PipelineConfig, rules: RuleTable) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fully autonomous path: condition all channels, detect events,
    /// extract features, classify.
    ///
    /// Array lengths matching `fs × window_secs` is a caller precondition.
    pub fn process_window(
        &self,
        cardiac: &[f64],
        pulse: &[f64],
        eda: &[f64],
    ) -> Result<ClassificationResult, FilterError> {
        let cardiac_f = condition(
            &TimeSeries {
                fs: self.config.fs_cardiac,
                data: cardiac.to_vec(),
            },
            ChannelKind::Cardiac,
        )?;
        let pulse_f = condition(
            &TimeSeries {
                fs: self.config.fs_pulse,
                data: pulse.to_vec(),
            },
            ChannelKind::Pulse,
        )?;
        let eda_f = condition(
            &TimeSeries {
                fs: self.config.fs_eda,
                data: eda.to_vec(),
            },
            ChannelKind::Electrodermal,
        )?;

        let cardiac_peaks = detect_cardiac_peaks(&cardiac_f);
        let pulse_peaks = detect_pulse_peaks(&pulse_f);
        let pulse_feet = detect_pulse_feet(&pulse_f);
        log::debug!(
            "detected {} cardiac peaks, {} pulse peaks, {} pulse feet",
            cardiac_peaks.len(),
            pulse_peaks.len(),
            pulse_feet.len()
        );

        Ok(self.finish(&eda_f, cardiac_peaks, Some(pulse_peaks), pulse_feet))
    }

    /// Ground-truth path: externally supplied ascending cardiac-peak and
    /// pulse-foot indices bypass the cardiac/pulse detectors. The
    /// electrodermal channel is still conditioned.
    pub fn process_window_with_peaks(
        &self,
        _cardiac: &[f64],
        _pulse: &[f64],
        eda: &[f64],
        cardiac_peaks: &[usize],
        pulse_feet: &[usize],
    ) -> Result<ClassificationResult, FilterError> {
        let eda_f = condition(
            &TimeSeries {
                fs: self.config.fs_eda,
                data: eda.to_vec(),
            },
            ChannelKind::Electrodermal,
        )?;
        Ok(self.finish(
            &eda_f,
            Events::from_indices(cardiac_peaks.to_vec()),
            None,
            Events::from_indices(pulse_feet.to_vec()),
        ))
    }

    fn finish(
        &self,
        eda_f: &TimeSeries,
        cardiac_peaks: Events,
        pulse_peaks: Option<Events>,
        pulse_feet: Events,
    ) -> ClassificationResult {
        let ibi = IbiSeries::from_events(&cardiac_peaks, self.config.fs_cardiac);

        let features = FeatureVector {
            hr: ibi.as_ref().and_then(heart_rate),
            sdnn: ibi.as_ref().and_then(sdnn),
            rmssd: ibi.as_ref().and_then(rmssd),
            lf_hf: ibi.as_ref().and_then(lf_hf_ratio),
            ptt: ptt_from_pairs(&cardiac_peaks, &pulse_feet, self.config.fs_pulse),
            scl: scl_level(eda_f),
            scr: scr_frequency(eda_f),
        };
        log::debug!(
            "features hr={:?} sdnn={:?} rmssd={:?} lf_hf={:?} ptt={:?} scl={:?} scr={:?}",
            features.hr,
            features.sdnn,
            features.rmssd,
            features.lf_hf,
            features.ptt,
            features.scl,
            features.scr
        );

        let (label, reason) = classify(&features, &self.rules);
        ClassificationResult {
            label,
            reason,
            features,
            cardiac_peaks,
            pulse_peaks,
            pulse_feet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default())
    }

    /// Peak train with constant 0.8 s spacing at 128 Hz: 102.4-sample
    /// stride rounded per beat so quantization never accumulates.
    fn regular_peaks(count: usize) -> Vec<usize> {
        (0..count).map(|k| (k as f64 * 102.4).round() as usize).collect()
    }

    #[test]
    fn ground_truth_path_computes_hr_from_supplied_peaks() {
        let p = pipeline();
        let peaks = regular_peaks(75);
        let feet: Vec<usize> = peaks.iter().map(|i| i + 26).collect();
        let eda = vec![0.5; 32 * 60];
        let res = p
            .process_window_with_peaks(&[], &[], &eda, &peaks, &feet)
            .unwrap();
        let hr = res.features.hr.unwrap();
        assert!((hr - 75.0).abs() < 0.5, "hr {hr}");
        assert!(res.features.sdnn.unwrap() < 0.005);
        assert!(res.pulse_peaks.is_none());
        assert_eq!(res.cardiac_peaks.indices, peaks);
    }

    #[test]
    fn present_features_are_always_finite() {
        let p = pipeline();
        let peaks = regular_peaks(20);
        let feet: Vec<usize> = peaks.iter().map(|i| i + 30).collect();
        let eda = vec![0.5; 32 * 60];
        let res = p
            .process_window_with_peaks(&[], &[], &eda, &peaks, &feet)
            .unwrap();
        for value in [
            res.features.hr,
            res.features.sdnn,
            res.features.rmssd,
            res.features.lf_hf,
            res.features.ptt,
            res.features.scl,
            res.features.scr,
        ]
        .into_iter()
        .flatten()
        {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn empty_peak_sequences_degrade_to_normal() {
        let p = pipeline();
        let eda = vec![0.5; 32 * 60];
        let res = p.process_window_with_peaks(&[], &[], &eda, &[], &[]).unwrap();
        assert_eq!(res.label, Label::Normal);
        assert!(res.features.hr.is_none());
        assert!(res.features.ptt.is_none());
        // SCL is still reported from the conditioned EDA channel
        assert!(res.features.scl.is_some());
    }

    #[test]
    fn autonomous_path_runs_end_to_end() {
        let p = pipeline();
        let fs = 128.0;
        let n = (fs * 60.0) as usize;
        let mut cardiac = vec![0.0; n];
        let mut pulse = vec![0.0; n];
        for (i, (c, pl)) in cardiac.iter_mut().zip(pulse.iter_mut()).enumerate() {
            let t = i as f64 / fs;
            let phase = t % 0.8;
            *c = (-0.5 * ((phase - 0.1) / 0.01).powi(2)).exp();
            *pl = (-0.5 * ((phase - 0.35) / 0.05).powi(2)).exp();
        }
        let eda = vec![0.5; 32 * 60];
        let res = p.process_window(&cardiac, &pulse, &eda).unwrap();
        // heuristic detectors may over-trigger on the conditioned floor,
        // so only structural properties are pinned down here
        assert!(res.cardiac_peaks.len() >= 60);
        assert!(res.pulse_peaks.as_ref().is_some_and(|e| !e.is_empty()));
        assert!(res.features.hr.is_some());
        assert!(res.features.scl.is_some());
        for w in res.cardiac_peaks.indices.windows(2) {
            assert!(w[0] < w[1]);
        }
    }
}
