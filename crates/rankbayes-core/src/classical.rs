//! Frequentist counterparts of the three rank tests.
//!
//! These are reported next to the Bayes factors so an analysis can show
//! both. Conventions follow the usual statistical-package defaults:
//!
//! - Wilcoxon signed-rank: zero differences dropped; exact null
//!   distribution for n ≤ 50 without ties, otherwise the tie-corrected
//!   normal approximation.
//! - Spearman: p-value from Student's t with n − 2 degrees of freedom.
//! - Mann–Whitney: tie-corrected normal approximation with continuity
//!   correction.

use core::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::constants::EXACT_SIGNED_RANK_MAX_N;
use crate::error::{RankTestError, Result};
use crate::ranks::{average_ranks, has_ties, signed_ranks, tie_counts};
use crate::types::{Alternative, IndependentSamples, PairedSample};

/// Which classical test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassicalTest {
    /// Wilcoxon signed-rank test.
    WilcoxonSignedRank,
    /// Spearman rank correlation test.
    Spearman,
    /// Mann–Whitney U test.
    MannWhitneyU,
}

impl fmt::Display for ClassicalTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassicalTest::WilcoxonSignedRank => write!(f, "Wilcoxon signed-rank test"),
            ClassicalTest::Spearman => write!(f, "Spearman correlation test"),
            ClassicalTest::MannWhitneyU => write!(f, "Mann-Whitney U test"),
        }
    }
}

/// How the p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PValueMethod {
    /// Enumerated null distribution.
    Exact,
    /// Normal approximation.
    Normal,
    /// Student's t approximation.
    StudentT,
}

/// Result of a classical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalResult {
    /// Test that was run.
    pub test: ClassicalTest,
    /// Test statistic (W, rho or U).
    pub statistic: f64,
    /// p-value under H0.
    pub p_value: f64,
    /// Observations used (after dropping zero differences).
    pub n: usize,
    /// Direction of H1.
    pub alternative: Alternative,
    /// How `p_value` was computed.
    pub method: PValueMethod,
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| RankTestError::Numerical(e.to_string()))
}

/// p-value of a statistic that is approximately N(0, 1) under H0.
fn normal_p_value(z: f64, alternative: Alternative) -> Result<f64> {
    let normal = standard_normal()?;
    let p = match alternative {
        Alternative::TwoSided => 2.0 * normal.sf(z.abs()),
        Alternative::Greater => normal.sf(z),
        Alternative::Less => normal.cdf(z),
    };
    Ok(p.clamp(0.0, 1.0))
}

// =============================================================================
// Wilcoxon signed-rank
// =============================================================================

/// Wilcoxon signed-rank test on paired differences (or one sample already
/// shifted by its test value).
///
/// The statistic is `min(W+, W−)` for two-sided tests and `W+` otherwise.
pub fn wilcoxon_signed_rank(differences: &[f64], alternative: Alternative) -> Result<ClassicalResult> {
    let nonzero: Vec<f64> = differences.iter().copied().filter(|&d| d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return Err(RankTestError::InsufficientData {
            test: "Wilcoxon signed-rank test (non-zero differences)",
            got: 0,
            min: 1,
        });
    }

    let w_plus: f64 = signed_ranks(&nonzero).iter().filter(|&&r| r > 0.0).sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let w_minus = total - w_plus;
    let statistic = match alternative {
        Alternative::TwoSided => w_plus.min(w_minus),
        _ => w_plus,
    };

    let abs: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let exact = n <= EXACT_SIGNED_RANK_MAX_N && !has_ties(&abs);

    let (p_value, method) = if exact {
        let dist = SignedRankNull::new(n);
        // Without ties W+ is an integer
        let w = w_plus.round() as usize;
        let p = match alternative {
            Alternative::TwoSided => 2.0 * dist.cdf(w.min(n * (n + 1) / 2 - w)),
            Alternative::Greater => dist.sf(w),
            Alternative::Less => dist.cdf(w),
        };
        (p.min(1.0), PValueMethod::Exact)
    } else {
        let mean = total / 2.0;
        let tie_term: f64 = tie_counts(&abs)
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum();
        let nf = n as f64;
        let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
        let p = if var > 0.0 {
            normal_p_value((w_plus - mean) / var.sqrt(), alternative)?
        } else {
            1.0
        };
        (p, PValueMethod::Normal)
    };

    Ok(ClassicalResult {
        test: ClassicalTest::WilcoxonSignedRank,
        statistic,
        p_value,
        n,
        alternative,
        method,
    })
}

/// Exact null distribution of W+ for n untied observations.
struct SignedRankNull {
    /// P(W+ ≤ w) for w = 0..=n(n+1)/2.
    cumulative: Vec<f64>,
}

impl SignedRankNull {
    fn new(n: usize) -> Self {
        let max = n * (n + 1) / 2;
        // counts[s] = number of subsets of {1..n} summing to s
        let mut counts = vec![0.0f64; max + 1];
        counts[0] = 1.0;
        for k in 1..=n {
            for s in (k..=max).rev() {
                counts[s] += counts[s - k];
            }
        }
        let total = 2f64.powi(n as i32);
        let mut acc = 0.0;
        let cumulative = counts
            .iter()
            .map(|c| {
                acc += c;
                acc / total
            })
            .collect();
        Self { cumulative }
    }

    fn cdf(&self, w: usize) -> f64 {
        self.cumulative[w.min(self.cumulative.len() - 1)]
    }

    /// P(W+ ≥ w), via the symmetry W+ ~ max − W+.
    fn sf(&self, w: usize) -> f64 {
        let max = self.cumulative.len() - 1;
        self.cdf(max.saturating_sub(w))
    }
}

// =============================================================================
// Spearman
// =============================================================================

/// Spearman rank correlation with a t-distribution p-value.
pub fn spearman_correlation(sample: &PairedSample, alternative: Alternative) -> Result<ClassicalResult> {
    let n = sample.len();
    if n < 3 {
        return Err(RankTestError::InsufficientData {
            test: "Spearman correlation test",
            got: n,
            min: 3,
        });
    }

    let rx = average_ranks(sample.x());
    let ry = average_ranks(sample.y());
    let rho = pearson(&rx, &ry).ok_or_else(|| {
        RankTestError::Numerical("Spearman's rho is undefined for constant input".into())
    })?;

    let df = (n - 2) as f64;
    let t = rho * (df / (1.0 - rho * rho).max(0.0)).sqrt();
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| RankTestError::Numerical(e.to_string()))?;
    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(t.abs()),
        Alternative::Greater => dist.sf(t),
        Alternative::Less => dist.cdf(t),
    };

    Ok(ClassicalResult {
        test: ClassicalTest::Spearman,
        statistic: rho,
        p_value: p_value.clamp(0.0, 1.0),
        n,
        alternative,
        method: PValueMethod::StudentT,
    })
}

fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b) {
        sab += (x - ma) * (y - mb);
        saa += (x - ma) * (x - ma);
        sbb += (y - mb) * (y - mb);
    }
    if saa == 0.0 || sbb == 0.0 {
        return None;
    }
    Some((sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0))
}

// =============================================================================
// Mann–Whitney U
// =============================================================================

/// Mann–Whitney U test. The statistic is U of the x group.
pub fn mann_whitney_u(samples: &IndependentSamples, alternative: Alternative) -> Result<ClassicalResult> {
    let (n1, n2) = samples.sizes();
    let pooled: Vec<f64> = samples.x().iter().chain(samples.y()).copied().collect();
    let ranks = average_ranks(&pooled);

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;

    let nf = n1f + n2f;
    let tie_term: f64 = tie_counts(&pooled)
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let mean = n1f * n2f / 2.0;
    let var = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));

    let p_value = if var > 0.0 {
        let sd = var.sqrt();
        let normal = standard_normal()?;
        let p = match alternative {
            Alternative::TwoSided => 2.0 * normal.sf((u1.max(u2) - mean - 0.5) / sd),
            Alternative::Greater => normal.sf((u1 - mean - 0.5) / sd),
            Alternative::Less => normal.sf((u2 - mean - 0.5) / sd),
        };
        p.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Ok(ClassicalResult {
        test: ClassicalTest::MannWhitneyU,
        statistic: u1,
        p_value,
        n: n1 + n2,
        alternative,
        method: PValueMethod::Normal,
    })
}
