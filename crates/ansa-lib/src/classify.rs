//! Threshold-rule classifier over the extracted feature vector.
//!
//! The rule table is data, not code: an ordered list of labelled
//! conjunctions, each a set of comparisons against named features. The
//! default table carries the stress and fatigue rules; callers may
//! deserialize their own thresholds from TOML/JSON.

use serde::{Deserialize, Serialize};

/// Discrete state emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Stress,
    Fatigue,
    Normal,
}

/// The seven named scalar metrics. Absence is a first-class outcome, not
/// an error: a missing value fails any comparison made against it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub hr: Option<f64>,
    pub sdnn: Option<f64>,
    pub rmssd: Option<f64>,
    pub lf_hf: Option<f64>,
    pub ptt: Option<f64>,
    pub scl: Option<f64>,
    pub scr: Option<f64>,
}

impl FeatureVector {
    pub fn get(&self, feature: FeatureId) -> Option<f64> {
        match feature {
            FeatureId::Hr => self.hr,
            FeatureId::Sdnn => self.sdnn,
            FeatureId::Rmssd => self.rmssd,
            FeatureId::LfHf => self.lf_hf,
            FeatureId::Ptt => self.ptt,
            FeatureId::Scl => self.scl,
            FeatureId::Scr => self.scr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    Hr,
    Sdnn,
    Rmssd,
    LfHf,
    Ptt,
    Scl,
    Scr,
}

impl FeatureId {
    fn display_name(self) -> &'static str {
        match self {
            FeatureId::Hr => "HR",
            FeatureId::Sdnn => "SDNN",
            FeatureId::Rmssd => "RMSSD",
            FeatureId::LfHf => "LF/HF",
            FeatureId::Ptt => "PTT",
            FeatureId::Scl => "SCL",
            FeatureId::Scr => "SCR",
        }
    }

    /// Decimal places used when a value appears in a Reason string.
    fn precision(self) -> usize {
        match self {
            FeatureId::Hr => 1,
            FeatureId::LfHf => 2,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Ge,
    Gt,
    Le,
    Lt,
}

impl CmpOp {
    fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            CmpOp::Ge => value >= threshold,
            CmpOp::Gt => value > threshold,
            CmpOp::Le => value <= threshold,
            CmpOp::Lt => value < threshold,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Ge => "≥",
            CmpOp::Gt => ">",
            CmpOp::Le => "≤",
            CmpOp::Lt => "<",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Comparison {
    pub feature: FeatureId,
    pub op: CmpOp,
    pub threshold: f64,
}

/// A labelled conjunction: every comparison must hold for the rule to fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub label: Label,
    pub comparisons: Vec<Comparison>,
}

/// Ordered rule list; the first rule whose comparisons all hold wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    pub rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        let cmp = |feature, op, threshold| Comparison {
            feature,
            op,
            threshold,
        };
        Self {
            rules: vec![
                Rule {
                    label: Label::Stress,
                    comparisons: vec![
                        cmp(FeatureId::Hr, CmpOp::Ge, 85.0),
                        cmp(FeatureId::Sdnn, CmpOp::Lt, 0.05),
                        cmp(FeatureId::LfHf, CmpOp::Gt, 0.0),
                        cmp(FeatureId::Ptt, CmpOp::Lt, 0.22),
                        cmp(FeatureId::Scr, CmpOp::Gt, 0.05),
                    ],
                },
                Rule {
                    label: Label::Fatigue,
                    comparisons: vec![
                        cmp(FeatureId::Hr, CmpOp::Le, 65.0),
                        cmp(FeatureId::Sdnn, CmpOp::Gt, 0.05),
                        cmp(FeatureId::LfHf, CmpOp::Lt, 1.5),
                        cmp(FeatureId::Ptt, CmpOp::Gt, 0.25),
                        cmp(FeatureId::Scr, CmpOp::Lt, 0.03),
                    ],
                },
            ],
        }
    }
}

const NORMAL_REASON: &str = "conditions unmet → classified as normal range";

/// Evaluate the rule table against a feature vector.
///
/// Every comparison of a rule is evaluated (no short-circuit) so the
/// Reason text lists each satisfied comparison with its observed value.
pub fn classify(features: &FeatureVector, table: &RuleTable) -> (Label, String) {
    for rule in &table.rules {
        let mut all_hold = true;
        let mut satisfied = Vec::with_capacity(rule.comparisons.len());
        for cmp in &rule.comparisons {
            match features.get(cmp.feature) {
                Some(value) if cmp.op.holds(value, cmp.threshold) => {
                    satisfied.push(format!(
                        "{}={:.prec$}{}{}",
                        cmp.feature.display_name(),
                        value,
                        cmp.op.symbol(),
                        cmp.threshold,
                        prec = cmp.feature.precision(),
                    ));
                }
                _ => all_hold = false,
            }
        }
        if all_hold {
            return (rule.label, satisfied.join(" & "));
        }
    }
    (Label::Normal, NORMAL_REASON.to_string())
}
