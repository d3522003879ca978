//! Gaussian kernel density estimation of posterior draws.
//!
//! The Savage–Dickey ratio needs the posterior density at a single point,
//! and one-sided tests also need the posterior mass on either side of it.
//! Both are evaluated in log space so that a posterior far from zero still
//! yields a finite log Bayes factor instead of underflowing to `0` or `∞`.
//!
//! Bounded parameters (ρ ∈ [-1, 1]) use reflection at the bounds so the
//! estimate does not leak mass outside the support.

use core::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::diagnostics::quantile_sorted;
use crate::error::{RankTestError, Result};

/// Below this standardized value `ln Φ(z)` switches to its asymptotic series.
const LOG_CDF_ASYMPTOTIC: f64 = -35.0;

/// Gaussian KDE with Silverman's rule-of-thumb bandwidth.
#[derive(Debug, Clone)]
pub struct KernelDensity {
    /// Kernel centres, including reflected copies when bounded.
    centres: Vec<f64>,
    /// Number of original draws.
    n: usize,
    bandwidth: f64,
    support: Option<(f64, f64)>,
    /// ln of the estimate's total mass over the support.
    log_total: f64,
}

impl KernelDensity {
    /// Estimate on the whole real line.
    pub fn new(draws: &[f64]) -> Result<Self> {
        Self::build(draws, None)
    }

    /// Estimate on `[lower, upper]`, reflecting kernels at both bounds.
    pub fn with_bounds(draws: &[f64], lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() || lower >= upper {
            return Err(RankTestError::Numerical(format!(
                "density support [{lower}, {upper}] is empty"
            )));
        }
        Self::build(draws, Some((lower, upper)))
    }

    fn build(draws: &[f64], support: Option<(f64, f64)>) -> Result<Self> {
        if draws.is_empty() {
            return Err(RankTestError::EmptyPosterior);
        }
        let bandwidth = silverman_bandwidth(draws)?;

        let centres = match support {
            None => draws.to_vec(),
            Some((lower, upper)) => {
                let mut c = Vec::with_capacity(3 * draws.len());
                c.extend_from_slice(draws);
                c.extend(draws.iter().map(|&x| 2.0 * lower - x));
                c.extend(draws.iter().map(|&x| 2.0 * upper - x));
                c
            }
        };

        let mut kde = Self {
            centres,
            n: draws.len(),
            bandwidth,
            support,
            log_total: 0.0,
        };
        if let Some((lower, upper)) = support {
            kde.log_total = kde.raw_log_mass(lower, upper);
        }
        Ok(kde)
    }

    /// Kernel bandwidth h.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// ln f̂(x). `-∞` outside the support.
    pub fn log_pdf(&self, x: f64) -> f64 {
        if let Some((lower, upper)) = self.support {
            if x < lower || x > upper {
                return f64::NEG_INFINITY;
            }
        }
        let h = self.bandwidth;
        let terms = self.centres.iter().map(|&c| {
            let z = (x - c) / h;
            -0.5 * z * z
        });
        log_sum_exp(terms) - (self.n as f64 * h * (2.0 * PI).sqrt()).ln() - self.log_total
    }

    /// f̂(x).
    pub fn pdf(&self, x: f64) -> f64 {
        self.log_pdf(x).exp()
    }

    /// ln of the estimated probability of `[lower, upper]`.
    pub fn log_mass(&self, lower: f64, upper: f64) -> f64 {
        let (lo, hi) = match self.support {
            Some((a, b)) => (lower.max(a), upper.min(b)),
            None => (lower, upper),
        };
        if lo >= hi {
            return f64::NEG_INFINITY;
        }
        self.raw_log_mass(lo, hi) - self.log_total
    }

    /// Estimated P(X ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        self.log_mass(f64::NEG_INFINITY, x).exp()
    }

    fn raw_log_mass(&self, lower: f64, upper: f64) -> f64 {
        let h = self.bandwidth;
        let terms = self
            .centres
            .iter()
            .map(|&c| log_standard_interval((lower - c) / h, (upper - c) / h));
        log_sum_exp(terms) - (self.n as f64).ln()
    }
}

/// Silverman's rule: `0.9 · min(sd, IQR/1.34) · n^(-1/5)`.
///
/// Falls back to the sd when the IQR is zero. Constant draws have no
/// usable bandwidth and are rejected.
pub fn silverman_bandwidth(draws: &[f64]) -> Result<f64> {
    let n = draws.len();
    if n < 2 {
        return Err(RankTestError::InsufficientData {
            test: "kernel density estimate",
            got: n,
            min: 2,
        });
    }

    let mean = draws.iter().sum::<f64>() / n as f64;
    let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();

    let mut sorted = draws.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);

    let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
    if spread <= 0.0 || !spread.is_finite() {
        return Err(RankTestError::Numerical(
            "posterior draws are constant; density is undefined".into(),
        ));
    }
    Ok(0.9 * spread * (n as f64).powf(-0.2))
}

/// ln Φ(z), accurate far into the lower tail.
pub fn log_normal_cdf(z: f64) -> f64 {
    if z >= LOG_CDF_ASYMPTOTIC {
        (0.5 * erfc(-z / SQRT_2)).ln()
    } else {
        let z2 = z * z;
        -0.5 * z2 - (-z).ln() - 0.5 * (2.0 * PI).ln() + (1.0 - 1.0 / z2 + 3.0 / (z2 * z2)).ln()
    }
}

/// ln(Φ(b) − Φ(a)) for a ≤ b.
fn log_standard_interval(a: f64, b: f64) -> f64 {
    if a >= b {
        return f64::NEG_INFINITY;
    }
    // Keep both ends on the lower side, where ln Φ is accurate
    let (a, b) = if a > 0.0 { (-b, -a) } else { (a, b) };
    let log_hi = log_normal_cdf(b);
    let log_lo = log_normal_cdf(a);
    log_hi + (-(log_lo - log_hi).exp()).ln_1p()
}

fn log_sum_exp(terms: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = terms.collect();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
