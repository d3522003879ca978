//! Convergence diagnostics and posterior summaries.
//!
//! - [`gelman_rubin`]: potential scale reduction factor (R-hat)
//! - [`effective_sample_size`]: autocorrelation-adjusted chain length
//! - [`PosteriorSummary`]: mean, sd, median and a central credible interval

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Unbiased sample variance (n − 1 denominator).
fn variance(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    xs.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (xs.len() - 1) as f64
}

/// Gelman–Rubin potential scale reduction factor.
///
/// Compares between-chain and within-chain variance:
///
/// ```text
/// W  = mean of within-chain variances
/// B  = n · var(chain means)
/// V̂  = (n−1)/n · W + B/n
/// R̂  = sqrt(V̂ / W)
/// ```
///
/// A single chain is split into two halves. Returns `None` when there are
/// fewer than two draws per (split) chain. Constant chains give 1.0.
pub fn gelman_rubin(chains: &[Vec<f64>]) -> Option<f64> {
    let chains: Vec<&[f64]> = if chains.len() == 1 {
        let chain = &chains[0];
        let half = chain.len() / 2;
        vec![&chain[..half], &chain[chain.len() - half..]]
    } else {
        chains.iter().map(Vec::as_slice).collect()
    };

    let n = chains.iter().map(|c| c.len()).min()?;
    if n < 2 || chains.len() < 2 {
        return None;
    }

    let means: Vec<f64> = chains.iter().map(|c| mean(&c[..n])).collect();
    let w = chains
        .iter()
        .zip(&means)
        .map(|(c, &m)| variance(&c[..n], m))
        .sum::<f64>()
        / chains.len() as f64;
    let grand_mean = mean(&means);
    let b = n as f64 * variance(&means, grand_mean);

    if w <= 0.0 {
        return Some(if b <= 0.0 { 1.0 } else { f64::INFINITY });
    }

    let n = n as f64;
    let var_plus = (n - 1.0) / n * w + b / n;
    Some((var_plus / w).sqrt())
}

/// Effective sample size of one chain, `N / tau`.
///
/// The integrated autocorrelation time `tau = -1 + 2 * sum_m G_m` uses
/// Geyer's initial monotone sequence: `G_m = r(2m) + r(2m+1)` is summed
/// while it stays positive, and each term is capped by the one before it.
/// Autocovariances use the `1/N` estimator. The result never exceeds `N`.
pub fn effective_sample_size(chain: &[f64]) -> f64 {
    let n = chain.len();
    if n < 4 {
        return n as f64;
    }

    let m = mean(chain);
    let gamma0 = autocovariance(chain, 0, m);
    if gamma0 < 1e-12 {
        return n as f64;
    }

    let mut tau = -1.0;
    let mut previous = f64::INFINITY;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = (autocovariance(chain, lag, m) + autocovariance(chain, lag + 1, m)) / gamma0;
        if pair <= 0.0 {
            break;
        }
        let pair = pair.min(previous);
        tau += 2.0 * pair;
        previous = pair;
        lag += 2;
    }

    (n as f64 / tau.max(1.0)).min(n as f64)
}

fn autocovariance(chain: &[f64], lag: usize, mean: f64) -> f64 {
    chain
        .iter()
        .zip(&chain[lag..])
        .map(|(&a, &b)| (a - mean) * (b - mean))
        .sum::<f64>()
        / chain.len() as f64
}

/// Quantile of already-sorted data by linear interpolation (R type 7).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}

/// Point and interval summaries of a set of posterior draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    /// Number of pooled draws.
    pub n_draws: usize,
    /// Posterior mean.
    pub mean: f64,
    /// Posterior standard deviation.
    pub sd: f64,
    /// Posterior median.
    pub median: f64,
    /// Central credible interval `(lower, upper)`.
    pub credible_interval: (f64, f64),
    /// Probability mass of the credible interval (e.g. 0.95).
    pub credible_level: f64,
    /// Sum of per-chain effective sample sizes.
    pub ess: f64,
}

impl PosteriorSummary {
    /// Summarise chains with a central interval at `level`.
    pub fn from_chains(chains: &[Vec<f64>], level: f64) -> Self {
        let mut pooled: Vec<f64> = chains.iter().flatten().copied().collect();
        let n_draws = pooled.len();
        if n_draws == 0 {
            return Self {
                n_draws,
                mean: f64::NAN,
                sd: f64::NAN,
                median: f64::NAN,
                credible_interval: (f64::NAN, f64::NAN),
                credible_level: level,
                ess: 0.0,
            };
        }

        let m = mean(&pooled);
        let sd = variance(&pooled, m).sqrt();
        pooled.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let tail = (1.0 - level) / 2.0;

        Self {
            n_draws,
            mean: m,
            sd,
            median: quantile_sorted(&pooled, 0.5),
            credible_interval: (
                quantile_sorted(&pooled, tail),
                quantile_sorted(&pooled, 1.0 - tail),
            ),
            credible_level: level,
            ess: chains.iter().map(|c| effective_sample_size(c)).sum(),
        }
    }
}
