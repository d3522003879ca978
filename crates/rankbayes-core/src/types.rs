//! Input shapes, test families and test direction.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RankTestError, Result};

/// Which rank-based test is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestFamily {
    /// Spearman's rank correlation; parameter rho ∈ [-1, 1].
    Spearman,
    /// Wilcoxon signed-rank test; parameter delta is a standardized location.
    SignedRank,
    /// Wilcoxon rank-sum (Mann–Whitney) test; parameter delta is a
    /// standardized difference between two groups.
    RankSum,
}

impl TestFamily {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            TestFamily::Spearman => "Spearman's rho",
            TestFamily::SignedRank => "Wilcoxon signed-rank",
            TestFamily::RankSum => "Wilcoxon rank-sum",
        }
    }

    /// Symbol of the sampled parameter.
    pub fn parameter_symbol(&self) -> &'static str {
        match self {
            TestFamily::Spearman => "rho",
            TestFamily::SignedRank | TestFamily::RankSum => "delta",
        }
    }

    /// Support of the sampled parameter, used for boundary correction.
    pub fn parameter_bounds(&self) -> Option<(f64, f64)> {
        match self {
            TestFamily::Spearman => Some((-1.0, 1.0)),
            TestFamily::SignedRank | TestFamily::RankSum => None,
        }
    }
}

impl fmt::Display for TestFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// H1: parameter ≠ 0.
    #[default]
    TwoSided,
    /// H1: parameter < 0 (the "left" one-sided test).
    Less,
    /// H1: parameter > 0 (the "right" one-sided test).
    Greater,
}

impl Alternative {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        }
    }

    /// Whether this is a one-sided alternative.
    pub fn is_one_sided(&self) -> bool {
        !matches!(self, Alternative::TwoSided)
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Alternative {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "two-sided" | "two_sided" | "twosided" | "both" => Ok(Alternative::TwoSided),
            "less" | "left" => Ok(Alternative::Less),
            "greater" | "right" => Ok(Alternative::Greater),
            other => Err(format!(
                "unknown alternative '{other}'; expected two-sided, less (left) or greater (right)"
            )),
        }
    }
}

fn check_finite(sample: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(RankTestError::NonFiniteValue {
            sample,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

/// Two equal-length sequences, one observation pair per subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedSample {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PairedSample {
    /// Build a paired sample.
    ///
    /// # Errors
    ///
    /// `InputLengthMismatch` if the lengths differ, `NonFiniteValue` for
    /// NaN/infinite entries, `InsufficientData` for fewer than 2 pairs.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(RankTestError::InputLengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        check_finite("x", &x)?;
        check_finite("y", &y)?;
        if x.len() < 2 {
            return Err(RankTestError::InsufficientData {
                test: "paired sample",
                got: x.len(),
                min: 2,
            });
        }
        Ok(Self { x, y })
    }

    /// First sequence.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Second sequence.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false for a constructed sample; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Element-wise `x - y - shift`.
    pub fn differences(&self, shift: f64) -> Vec<f64> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(a, b)| a - b - shift)
            .collect()
    }
}

/// A single sequence tested against a location value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneSample {
    values: Vec<f64>,
}

impl OneSample {
    /// Build a one-sample input (at least 2 finite values).
    pub fn new(values: Vec<f64>) -> Result<Self> {
        check_finite("x", &values)?;
        if values.len() < 2 {
            return Err(RankTestError::InsufficientData {
                test: "one-sample input",
                got: values.len(),
                min: 2,
            });
        }
        Ok(Self { values })
    }

    /// The observations.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed sample.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `x - shift` for every observation.
    pub fn differences(&self, shift: f64) -> Vec<f64> {
        self.values.iter().map(|v| v - shift).collect()
    }
}

/// Two independent groups, lengths may differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndependentSamples {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl IndependentSamples {
    /// Build two independent groups (each non-empty, at least 3 in total).
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        check_finite("x", &x)?;
        check_finite("y", &y)?;
        if x.is_empty() || y.is_empty() {
            return Err(RankTestError::InsufficientData {
                test: "each independent group",
                got: x.len().min(y.len()),
                min: 1,
            });
        }
        if x.len() + y.len() < 3 {
            return Err(RankTestError::InsufficientData {
                test: "independent samples",
                got: x.len() + y.len(),
                min: 3,
            });
        }
        Ok(Self { x, y })
    }

    /// First group.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Second group.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Group sizes `(n1, n2)`.
    pub fn sizes(&self) -> (usize, usize) {
        (self.x.len(), self.y.len())
    }
}

/// Any input the pipeline accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SampleInput {
    /// Paired observations.
    Paired(PairedSample),
    /// One group against a location value.
    OneSample(OneSample),
    /// Two independent groups.
    Independent(IndependentSamples),
}

impl SampleInput {
    /// Short name of the input kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SampleInput::Paired(_) => "paired",
            SampleInput::OneSample(_) => "one-sample",
            SampleInput::Independent(_) => "independent two-sample",
        }
    }

    /// Sample size as reported to the user: pairs, observations, or n1 + n2.
    pub fn sample_size(&self) -> usize {
        match self {
            SampleInput::Paired(p) => p.len(),
            SampleInput::OneSample(s) => s.len(),
            SampleInput::Independent(s) => s.x.len() + s.y.len(),
        }
    }
}

impl From<PairedSample> for SampleInput {
    fn from(p: PairedSample) -> Self {
        SampleInput::Paired(p)
    }
}

impl From<OneSample> for SampleInput {
    fn from(s: OneSample) -> Self {
        SampleInput::OneSample(s)
    }
}

impl From<IndependentSamples> for SampleInput {
    fn from(s: IndependentSamples) -> Self {
        SampleInput::Independent(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paired_length_mismatch() {
        let err = PairedSample::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, RankTestError::InputLengthMismatch { x_len: 3, y_len: 2 });
    }

    #[test]
    fn test_paired_rejects_nan() {
        let err = PairedSample::new(vec![1.0, f64::NAN], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            RankTestError::NonFiniteValue { sample: "x", index: 1, .. }
        ));
    }

    #[test]
    fn test_differences_with_shift() {
        let p = PairedSample::new(vec![5.0, 3.0], vec![1.0, 4.0]).unwrap();
        assert_eq!(p.differences(0.0), vec![4.0, -1.0]);
        assert_eq!(p.differences(1.0), vec![3.0, -2.0]);
    }

    #[test]
    fn test_independent_needs_both_groups() {
        assert!(IndependentSamples::new(vec![1.0, 2.0, 3.0], vec![]).is_err());
        assert!(IndependentSamples::new(vec![1.0], vec![2.0]).is_err());
        assert!(IndependentSamples::new(vec![1.0, 2.0], vec![3.0]).is_ok());
    }

    #[test]
    fn test_alternative_aliases() {
        assert_eq!("left".parse::<Alternative>().unwrap(), Alternative::Less);
        assert_eq!("RIGHT".parse::<Alternative>().unwrap(), Alternative::Greater);
        assert_eq!(
            "two-sided".parse::<Alternative>().unwrap(),
            Alternative::TwoSided
        );
        assert!("sideways".parse::<Alternative>().is_err());
    }
}
