//! Rank-likelihood Gibbs samplers.
//!
//! All three samplers share one scheme: the observed data are replaced by
//! latent normal variables constrained to reproduce the observed ranks
//! (and, for the signed-rank test, the observed signs). Each draw
//!
//! 1. sweeps the latent variables in random order, redrawing each from a
//!    normal truncated between its rank neighbours, then
//! 2. updates the parameter of interest given the latent variables.
//!
//! | Family        | Latent model                          | Parameter update          |
//! |---------------|---------------------------------------|---------------------------|
//! | Spearman      | (zx, zy) ~ N₂(0, [[1, ρ], [ρ, 1]])    | Metropolis on atanh(ρ)    |
//! | Signed-rank   | d ~ N(δ, 1), signs and \|d\| ranks fixed | Gibbs, Cauchy(0, r) prior |
//! | Rank-sum      | x ~ N(δ/2, 1), y ~ N(−δ/2, 1)         | Gibbs, Cauchy(0, r) prior |
//!
//! Chains are driven by [`run_chains`], which gives every chain its own
//! xoshiro256++ stream (one `jump()` apart) so that results do not depend
//! on whether chains run sequentially or on the `parallel` rayon pool.

mod rank_sum;
mod signed_rank;
mod spearman;

pub use rank_sum::RankSumKernel;
pub use signed_rank::SignedRankKernel;
pub use spearman::{pearson_to_spearman, SpearmanKernel};

use core::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::config::SamplerConfig;
use crate::constants::RHAT_CONVERGENCE_THRESHOLD;
use crate::diagnostics::{gelman_rubin, PosteriorSummary};
use crate::error::{RankTestError, Result};
use crate::types::{SampleInput, TestFamily};

/// Progress callback, invoked with the number of draws just completed.
pub type Progress<'a> = &'a (dyn Fn(u64) + Sync);

/// One Markov chain transition for a rank-likelihood model.
///
/// The kernel holds the (immutable) rank information; per-chain mutable
/// state lives in `State` so a kernel can be shared across threads.
pub trait ChainKernel: Sync {
    /// Latent variables and current parameter value of one chain.
    type State: Send;

    /// Test family this kernel samples for.
    fn family(&self) -> TestFamily;

    /// Prior parameter the kernel was built with.
    fn prior_parameter(&self) -> f64;

    /// Initial chain state.
    fn init(&self, rng: &mut Xoshiro256PlusPlus) -> Result<Self::State>;

    /// Advance the chain one draw and return the new parameter value.
    fn step(&self, state: &mut Self::State, rng: &mut Xoshiro256PlusPlus) -> Result<f64>;
}

/// Posterior draws from one or more chains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Posterior {
    /// Family the draws belong to.
    pub family: TestFamily,

    /// Prior parameter used while sampling.
    pub prior_parameter: f64,

    /// Retained draws per chain (burn-in removed).
    pub chains: Vec<Vec<f64>>,

    /// Gelman–Rubin statistic; `None` when too few draws to compute it.
    pub r_hat: Option<f64>,

    /// Base seed of the run.
    pub seed: u64,
}

impl Posterior {
    /// Wrap existing draws, computing R-hat.
    pub fn from_chains(
        family: TestFamily,
        prior_parameter: f64,
        chains: Vec<Vec<f64>>,
        seed: u64,
    ) -> Self {
        let r_hat = gelman_rubin(&chains);
        Self {
            family,
            prior_parameter,
            chains,
            r_hat,
            seed,
        }
    }

    /// All draws pooled, chain-major.
    pub fn draws(&self) -> Vec<f64> {
        self.chains.iter().flatten().copied().collect()
    }

    /// Total number of retained draws.
    pub fn n_draws(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }

    /// Whether no draws were retained.
    pub fn is_empty(&self) -> bool {
        self.n_draws() == 0
    }

    /// Posterior mean over all chains.
    pub fn mean(&self) -> f64 {
        self.draws().iter().sum::<f64>() / self.n_draws() as f64
    }

    /// Summary with a 95% central credible interval.
    pub fn summary(&self) -> PosteriorSummary {
        PosteriorSummary::from_chains(&self.chains, 0.95)
    }

    /// R-hat at or below `threshold`. Unknown R-hat counts as not converged.
    pub fn is_converged_at(&self, threshold: f64) -> bool {
        self.r_hat.is_some_and(|r| r <= threshold)
    }

    /// R-hat at or below 1.05.
    pub fn is_converged(&self) -> bool {
        self.is_converged_at(RHAT_CONVERGENCE_THRESHOLD)
    }
}

/// Independent random streams for `n` chains, one `jump()` apart.
fn chain_streams(seed: u64, n: usize) -> Vec<Xoshiro256PlusPlus> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let stream = rng.clone();
            rng.jump();
            stream
        })
        .collect()
}

fn run_single_chain<K: ChainKernel>(
    kernel: &K,
    mut rng: Xoshiro256PlusPlus,
    config: &SamplerConfig,
    progress: Option<Progress<'_>>,
) -> Result<Vec<f64>> {
    let mut state = kernel.init(&mut rng)?;
    let mut retained = Vec::with_capacity(config.kept_per_chain());

    for t in 0..config.n_samples {
        let draw = kernel.step(&mut state, &mut rng)?;
        if t >= config.n_burnin {
            retained.push(draw);
        }
        if let Some(report) = progress {
            report(1);
        }
    }

    Ok(retained)
}

/// Run `config.n_chains` chains of `kernel` and collect the posterior.
///
/// # Errors
///
/// `SamplerConfiguration` for invalid settings (checked before any draw),
/// `Numerical` if a conditional distribution cannot be formed.
pub fn run_chains<K: ChainKernel>(
    kernel: &K,
    config: &SamplerConfig,
    progress: Option<Progress<'_>>,
) -> Result<Posterior> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let streams = chain_streams(seed, config.n_chains);

    #[cfg(feature = "parallel")]
    let chains: Result<Vec<Vec<f64>>> = {
        use rayon::prelude::*;
        streams
            .into_par_iter()
            .map(|rng| run_single_chain(kernel, rng, config, progress))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let chains: Result<Vec<Vec<f64>>> = streams
        .into_iter()
        .map(|rng| run_single_chain(kernel, rng, config, progress))
        .collect();

    Ok(Posterior::from_chains(
        kernel.family(),
        kernel.prior_parameter(),
        chains?,
        seed,
    ))
}

/// Draw posterior samples for `family` from `input`.
///
/// Spearman needs paired data; the signed-rank test takes paired data
/// (differences `x − y − test_value`) or one sample (`x − test_value`);
/// the rank-sum test takes independent groups (`x − test_value` vs `y`).
pub fn sample_posterior(
    input: &SampleInput,
    family: TestFamily,
    config: &SamplerConfig,
    progress: Option<Progress<'_>>,
) -> Result<Posterior> {
    config.validate()?;
    let prior = config.resolve_prior_parameter(family);
    let shift = config.test_value;

    match (family, input) {
        (TestFamily::Spearman, SampleInput::Paired(p)) => {
            run_chains(&SpearmanKernel::new(p, prior)?, config, progress)
        }
        (TestFamily::SignedRank, SampleInput::Paired(p)) => {
            let kernel =
                SignedRankKernel::new(&p.differences(shift), prior, config.n_gibbs_iterations)?;
            run_chains(&kernel, config, progress)
        }
        (TestFamily::SignedRank, SampleInput::OneSample(s)) => {
            let kernel =
                SignedRankKernel::new(&s.differences(shift), prior, config.n_gibbs_iterations)?;
            run_chains(&kernel, config, progress)
        }
        (TestFamily::RankSum, SampleInput::Independent(s)) => {
            let x: Vec<f64> = s.x().iter().map(|v| v - shift).collect();
            let kernel = RankSumKernel::new(&x, s.y(), prior, config.n_gibbs_iterations)?;
            run_chains(&kernel, config, progress)
        }
        (family, input) => Err(RankTestError::UnsupportedInput {
            family,
            input: input.kind(),
        }),
    }
}

// =============================================================================
// Shared latent-variable helpers
// =============================================================================

/// Latent values whose ordering matches `ranks`.
///
/// Draws `n` standard normals (absolute values if `absolute`), sorts them,
/// and hands them out in rank order.
pub(crate) fn init_latent(rng: &mut Xoshiro256PlusPlus, ranks: &[f64], absolute: bool) -> Vec<f64> {
    let n = ranks.len();
    let mut draws: Vec<f64> = (0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(rng);
            if absolute {
                z.abs()
            } else {
                z
            }
        })
        .collect();
    draws.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| ranks[a].partial_cmp(&ranks[b]).unwrap_or(Ordering::Equal));

    let mut latent = vec![0.0; n];
    for (value, &idx) in draws.into_iter().zip(&order) {
        latent[idx] = value;
    }
    latent
}

/// Truncation interval for element `i`: the largest latent of strictly
/// lower rank and the smallest latent of strictly higher rank.
pub(crate) fn rank_bounds(latent: &[f64], ranks: &[f64], i: usize, floor: f64) -> (f64, f64) {
    let rank = ranks[i];
    let mut lower = floor;
    let mut upper = f64::INFINITY;
    for (&z, &r) in latent.iter().zip(ranks) {
        if r < rank {
            lower = lower.max(z);
        } else if r > rank {
            upper = upper.min(z);
        }
    }
    (lower, upper)
}

/// Clamp bounds for the mixing variance g of the Zellner–Siow prior.
const G_MIN: f64 = 1e-10;
const G_MAX: f64 = 1e10;

/// Sample g | μ ~ InvGamma(1, (μ² + r²)/2) with σ² = 1.
pub(crate) fn sample_g(rng: &mut Xoshiro256PlusPlus, mu: f64, r: f64) -> Result<f64> {
    let rate = (mu * mu + r * r) / 2.0;
    // rand_distr uses shape-scale, so scale = 1/rate
    let gamma = rand_distr::Gamma::new(1.0, 1.0 / rate)
        .map_err(|e| RankTestError::Numerical(format!("Gamma(1, 1/{rate}): {e}")))?;
    let precision: f64 = gamma.sample(rng);
    Ok((1.0 / precision).clamp(G_MIN, G_MAX))
}

/// Sample from N(mean, var).
pub(crate) fn sample_normal(rng: &mut Xoshiro256PlusPlus, mean: f64, var: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    mean + var.sqrt() * z
}
