//! Wilcoxon signed-rank test via latent normal differences.
//!
//! ```text
//! d_i ~ N(δ, 1),   sign(d_i) and rank(|d_i|) fixed to the observed ones
//! δ | g ~ N(0, g),   g ~ InvGamma(1/2, r²/2)      (Cauchy(0, r) marginal)
//! ```
//!
//! Each draw refreshes |d_i| between its rank neighbours (floor 0) from a
//! normal with mean sign(d_i)·δ, then runs a few rounds of the conjugate
//! one-sample Gibbs sampler for (δ, g). Zero differences carry no sign and
//! get a fresh random one every sweep.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{init_latent, rank_bounds, sample_g, sample_normal, ChainKernel};
use crate::error::{RankTestError, Result};
use crate::ranks::{average_ranks, signs};
use crate::truncnorm;
use crate::types::TestFamily;

/// Chain state for the signed-rank sampler.
#[derive(Debug, Clone)]
pub struct SignedRankState {
    abs_latent: Vec<f64>,
    delta: f64,
    order: Vec<usize>,
}

/// Transition kernel for the signed-rank effect size δ.
#[derive(Debug, Clone)]
pub struct SignedRankKernel {
    abs_ranks: Vec<f64>,
    signs: Vec<f64>,
    cauchy_scale: f64,
    n_gibbs_iterations: usize,
}

impl SignedRankKernel {
    /// Build the kernel from differences (already shifted by the test value).
    pub fn new(differences: &[f64], cauchy_scale: f64, n_gibbs_iterations: usize) -> Result<Self> {
        if differences.len() < 2 {
            return Err(RankTestError::InsufficientData {
                test: "signed-rank test",
                got: differences.len(),
                min: 2,
            });
        }
        let abs: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
        Ok(Self {
            abs_ranks: average_ranks(&abs),
            signs: signs(differences),
            cauchy_scale,
            n_gibbs_iterations: n_gibbs_iterations.max(1),
        })
    }
}

/// Conjugate Gibbs rounds for a one-sample normal mean with σ² = 1.
///
/// ```text
/// μ | g, d ~ N(n·d̄ / (n + 1/g), 1 / (n + 1/g))
/// g | μ    ~ InvGamma(1, (μ² + r²)/2)
/// ```
pub(crate) fn gibbs_one_sample(
    rng: &mut Xoshiro256PlusPlus,
    diffs: &[f64],
    n_iter: usize,
    r: f64,
) -> Result<f64> {
    let n = diffs.len() as f64;
    let ybar = diffs.iter().sum::<f64>() / n;
    let mut g = ybar * ybar + 1.0;
    let mut mu = ybar;

    for _ in 0..n_iter {
        let precision = n + 1.0 / g;
        mu = sample_normal(rng, n * ybar / precision, 1.0 / precision);
        g = sample_g(rng, mu, r)?;
    }

    Ok(mu)
}

impl ChainKernel for SignedRankKernel {
    type State = SignedRankState;

    fn family(&self) -> TestFamily {
        TestFamily::SignedRank
    }

    fn prior_parameter(&self) -> f64 {
        self.cauchy_scale
    }

    fn init(&self, rng: &mut Xoshiro256PlusPlus) -> Result<SignedRankState> {
        Ok(SignedRankState {
            abs_latent: init_latent(rng, &self.abs_ranks, true),
            delta: 0.0,
            order: (0..self.abs_ranks.len()).collect(),
        })
    }

    fn step(&self, state: &mut SignedRankState, rng: &mut Xoshiro256PlusPlus) -> Result<f64> {
        let sweep_signs: Vec<f64> = self
            .signs
            .iter()
            .map(|&s| {
                if s != 0.0 {
                    s
                } else if rng.random_bool(0.5) {
                    1.0
                } else {
                    -1.0
                }
            })
            .collect();

        state.order.shuffle(rng);
        for idx in 0..state.order.len() {
            let i = state.order[idx];
            let (lower, upper) = rank_bounds(&state.abs_latent, &self.abs_ranks, i, 0.0);
            state.abs_latent[i] =
                truncnorm::sample(rng, lower, upper, sweep_signs[i] * state.delta, 1.0)?;
        }

        let diffs: Vec<f64> = state
            .abs_latent
            .iter()
            .zip(&sweep_signs)
            .map(|(a, s)| a * s)
            .collect();

        state.delta = gibbs_one_sample(rng, &diffs, self.n_gibbs_iterations, self.cauchy_scale)?;
        Ok(state.delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplerConfig;
    use crate::sampler::run_chains;
    use rand::SeedableRng;

    #[test]
    fn test_one_sample_gibbs_tracks_mean() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let diffs: Vec<f64> = (0..200).map(|i| 1.0 + ((i % 7) as f64 - 3.0) * 0.3).collect();
        let draws: Vec<f64> = (0..400)
            .map(|_| gibbs_one_sample(&mut rng, &diffs, 5, 0.707).unwrap())
            .collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 1.0).abs() < 0.1, "mean = {mean}");
    }

    #[test]
    fn test_all_positive_differences_give_positive_delta() {
        let diffs = [1.2, 0.4, 2.5, 0.9, 1.7, 3.1, 0.6, 1.1, 2.2, 0.8, 1.5, 1.9];
        let kernel = SignedRankKernel::new(&diffs, 0.707, 10).unwrap();
        let config = SamplerConfig::quick().seed(12);
        let posterior = run_chains(&kernel, &config, None).unwrap();
        assert!(posterior.mean() > 0.5, "mean delta = {}", posterior.mean());
    }

    #[test]
    fn test_sign_flip_mirrors_posterior() {
        let diffs = [1.2, -0.4, 2.5, 0.9, -1.7, 3.1, 0.6, 1.1];
        let flipped: Vec<f64> = diffs.iter().map(|d| -d).collect();
        let config = SamplerConfig::quick().n_samples(800).n_burnin(100).seed(21);

        let a = run_chains(&SignedRankKernel::new(&diffs, 0.707, 10).unwrap(), &config, None)
            .unwrap();
        let b = run_chains(&SignedRankKernel::new(&flipped, 0.707, 10).unwrap(), &config, None)
            .unwrap();
        assert!(a.mean() > 0.0 && b.mean() < 0.0);
        assert!((a.mean() + b.mean()).abs() < 0.15, "{} vs {}", a.mean(), b.mean());
    }

    #[test]
    fn test_zero_differences_are_tolerated() {
        let diffs = [0.0, 0.0, 1.0, -1.0, 2.0, 0.0];
        let kernel = SignedRankKernel::new(&diffs, 0.707, 10).unwrap();
        let posterior = run_chains(&kernel, &SamplerConfig::quick().seed(2), None).unwrap();
        assert!(posterior.draws().iter().all(|d| d.is_finite()));
    }
}
