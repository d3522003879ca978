//! Wilcoxon rank-sum (Mann–Whitney) test via latent normal groups.
//!
//! ```text
//! zx_i ~ N(δ/2, 1),  zy_j ~ N(−δ/2, 1),  pooled ranks fixed to the observed ones
//! δ | g ~ N(0, g),   g ~ InvGamma(1/2, r²/2)
//! ```
//!
//! Positive δ means x tends to exceed y.

use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{init_latent, rank_bounds, sample_g, sample_normal, ChainKernel};
use crate::error::{RankTestError, Result};
use crate::ranks::average_ranks;
use crate::truncnorm;
use crate::types::TestFamily;

/// Chain state for the rank-sum sampler.
#[derive(Debug, Clone)]
pub struct RankSumState {
    latent: Vec<f64>,
    delta: f64,
    order: Vec<usize>,
}

/// Transition kernel for the rank-sum effect size δ.
#[derive(Debug, Clone)]
pub struct RankSumKernel {
    /// Ranks of x followed by y within the pooled sample.
    pooled_ranks: Vec<f64>,
    n1: usize,
    cauchy_scale: f64,
    n_gibbs_iterations: usize,
}

impl RankSumKernel {
    /// Build the kernel from two independent groups.
    pub fn new(x: &[f64], y: &[f64], cauchy_scale: f64, n_gibbs_iterations: usize) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(RankTestError::InsufficientData {
                test: "rank-sum test (each group)",
                got: x.len().min(y.len()),
                min: 1,
            });
        }
        let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
        Ok(Self {
            pooled_ranks: average_ranks(&pooled),
            n1: x.len(),
            cauchy_scale,
            n_gibbs_iterations: n_gibbs_iterations.max(1),
        })
    }
}

/// Conjugate Gibbs rounds for a two-group mean difference with σ² = 1.
///
/// ```text
/// μ | g ~ N(2g(n₁x̄ − n₂ȳ) / (g(n₁+n₂) + 4),  4g / (g(n₁+n₂) + 4))
/// g | μ ~ InvGamma(1, (μ² + r²)/2)
/// ```
pub(crate) fn gibbs_two_sample(
    rng: &mut Xoshiro256PlusPlus,
    x: &[f64],
    y: &[f64],
    n_iter: usize,
    r: f64,
) -> Result<f64> {
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let mut g = 1.0;
    let mut mu = 0.0;

    for _ in 0..n_iter {
        let denom = g * (n1 + n2) + 4.0;
        mu = sample_normal(rng, 2.0 * g * (sum_x - sum_y) / denom, 4.0 * g / denom);
        g = sample_g(rng, mu, r)?;
    }

    Ok(mu)
}

impl ChainKernel for RankSumKernel {
    type State = RankSumState;

    fn family(&self) -> TestFamily {
        TestFamily::RankSum
    }

    fn prior_parameter(&self) -> f64 {
        self.cauchy_scale
    }

    fn init(&self, rng: &mut Xoshiro256PlusPlus) -> Result<RankSumState> {
        Ok(RankSumState {
            latent: init_latent(rng, &self.pooled_ranks, false),
            delta: 0.0,
            order: (0..self.pooled_ranks.len()).collect(),
        })
    }

    fn step(&self, state: &mut RankSumState, rng: &mut Xoshiro256PlusPlus) -> Result<f64> {
        let half = state.delta / 2.0;

        state.order.shuffle(rng);
        for idx in 0..state.order.len() {
            let i = state.order[idx];
            let mean = if i < self.n1 { half } else { -half };
            let (lower, upper) = rank_bounds(&state.latent, &self.pooled_ranks, i, f64::NEG_INFINITY);
            state.latent[i] = truncnorm::sample(rng, lower, upper, mean, 1.0)?;
        }

        let (x, y) = state.latent.split_at(self.n1);
        state.delta = gibbs_two_sample(rng, x, y, self.n_gibbs_iterations, self.cauchy_scale)?;
        Ok(state.delta)
    }
}
