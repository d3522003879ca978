//! Savage–Dickey Bayes factors for the rank tests.
//!
//! H0 fixes the parameter at zero and H1 leaves it free, so BF10 is the
//! ratio of prior to posterior density at zero:
//!
//! ```text
//! BF10 = π(0) / p(0 | data)                                 (two-sided)
//! BF10 = [π(0) / π(side)] / [p(0 | data) / p(side | data)]  (one-sided)
//! ```
//!
//! where `side` is the half-line named by the alternative. The posterior
//! density and mass come from a [`KernelDensity`] of the draws, reflected
//! at ±1 for ρ. Everything is carried in log space; [`BayesFactor::bf10`]
//! may overflow to `∞` for overwhelming evidence but
//! [`BayesFactor::log_bf10`] stays finite.

use core::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::density::KernelDensity;
use crate::error::{RankTestError, Result};
use crate::interpretation::Evidence;
use crate::prior::Prior;
use crate::sampler::Posterior;
use crate::types::{Alternative, TestFamily};

/// Relative tolerance when matching prior parameters.
const PRIOR_TOLERANCE: f64 = 1e-12;

/// Which representation of the Bayes factor to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BfType {
    /// Evidence for H1 over H0.
    #[default]
    Bf10,
    /// Evidence for H0 over H1.
    Bf01,
    /// Natural log of BF10.
    LogBf10,
}

/// A Bayes factor together with the quantities it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesFactor {
    /// Test family of the posterior.
    pub family: TestFamily,
    /// Direction of H1.
    pub alternative: Alternative,
    /// Prior on the parameter under H1.
    pub prior: Prior,
    /// ln BF10.
    pub log_bf10: f64,
    /// ln π(0).
    pub log_prior_density: f64,
    /// ln p(0 | data) from the density estimate.
    pub log_posterior_density: f64,
    /// Posterior probability of the hypothesised side (1 for two-sided).
    pub posterior_mass: f64,
    /// Draws the density estimate was built from.
    pub n_draws: usize,
}

impl BayesFactor {
    /// BF10 = exp(ln BF10).
    pub fn bf10(&self) -> f64 {
        self.log_bf10.exp()
    }

    /// BF01 = 1 / BF10.
    pub fn bf01(&self) -> f64 {
        (-self.log_bf10).exp()
    }

    /// ln BF10.
    pub fn log_bf10(&self) -> f64 {
        self.log_bf10
    }

    /// The factor in the requested representation.
    pub fn value(&self, bf_type: BfType) -> f64 {
        match bf_type {
            BfType::Bf10 => self.bf10(),
            BfType::Bf01 => self.bf01(),
            BfType::LogBf10 => self.log_bf10(),
        }
    }

    /// Evidence band of BF10.
    pub fn evidence(&self) -> Evidence {
        Evidence::from_bf10(self.bf10())
    }
}

/// Compute BF10 for `posterior`.
///
/// `family` and `prior_parameter` must match what the posterior was
/// sampled with, so a Bayes factor can never silently mix a posterior from
/// one prior with the density of another.
///
/// # Errors
///
/// `FamilyMismatch`, `PriorMismatch`, `EmptyPosterior`, or
/// `SamplerConfiguration` for a non-positive prior parameter.
pub fn compute_bayes_factor(
    posterior: &Posterior,
    family: TestFamily,
    prior_parameter: f64,
    alternative: Alternative,
) -> Result<BayesFactor> {
    if posterior.family != family {
        return Err(RankTestError::FamilyMismatch {
            expected: posterior.family,
            got: family,
        });
    }
    let expected = posterior.prior_parameter;
    if (expected - prior_parameter).abs() > PRIOR_TOLERANCE * expected.abs().max(1.0)
        || prior_parameter.is_nan()
    {
        return Err(RankTestError::PriorMismatch {
            expected,
            got: prior_parameter,
        });
    }
    if posterior.is_empty() {
        return Err(RankTestError::EmptyPosterior);
    }

    let prior = Prior::for_family(family, prior_parameter)?;
    savage_dickey(&posterior.draws(), family, prior, alternative)
}

/// Savage–Dickey ratio at zero for raw draws.
pub fn savage_dickey(
    draws: &[f64],
    family: TestFamily,
    prior: Prior,
    alternative: Alternative,
) -> Result<BayesFactor> {
    let kde = match family.parameter_bounds() {
        Some((lower, upper)) => KernelDensity::with_bounds(draws, lower, upper)?,
        None => KernelDensity::new(draws)?,
    };

    let mut log_prior_density = prior.log_pdf(0.0)?;
    if family == TestFamily::Spearman {
        // Prior is on Pearson's rho; draws are Spearman's rho, d(rho)/d(rho_s) = pi/3 at 0
        log_prior_density += (PI / 3.0).ln();
    }
    let log_posterior_density = kde.log_pdf(0.0);

    let (log_prior_mass, log_posterior_mass) = match alternative {
        Alternative::TwoSided => (0.0, 0.0),
        Alternative::Greater => (
            prior.mass(alternative)?.ln(),
            kde.log_mass(0.0, f64::INFINITY),
        ),
        Alternative::Less => (
            prior.mass(alternative)?.ln(),
            kde.log_mass(f64::NEG_INFINITY, 0.0),
        ),
    };

    let log_bf10 =
        (log_prior_density - log_prior_mass) - (log_posterior_density - log_posterior_mass);
    if log_bf10.is_nan() {
        return Err(RankTestError::Numerical(format!(
            "Bayes factor undefined: ln p(0|data) = {log_posterior_density}, \
             ln P(side|data) = {log_posterior_mass}"
        )));
    }

    Ok(BayesFactor {
        family,
        alternative,
        prior,
        log_bf10,
        log_prior_density,
        log_posterior_density,
        posterior_mass: log_posterior_mass.exp(),
        n_draws: draws.len(),
    })
}
