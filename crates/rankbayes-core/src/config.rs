//! Sampler configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CAUCHY_SCALE, DEFAULT_KAPPA, DEFAULT_N_BURNIN, DEFAULT_N_CHAINS,
    DEFAULT_N_GIBBS_ITERATIONS, DEFAULT_N_SAMPLES,
};
use crate::error::{RankTestError, Result};
use crate::types::TestFamily;

/// Settings for the rank-likelihood Gibbs samplers.
///
/// Fixed for the duration of a run. Builder methods never panic; call
/// [`SamplerConfig::validate`] (the samplers do) to surface bad values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Draws per chain, burn-in included. Default: 1,000.
    pub n_samples: usize,

    /// Leading draws discarded from each chain. Must be `< n_samples`.
    /// Default: 1.
    pub n_burnin: usize,

    /// Independent chains. R-hat needs at least 2 to compare chains; a
    /// single chain is split in halves instead. Default: 5.
    pub n_chains: usize,

    /// Inner Gibbs rounds for delta per outer draw (signed-rank and
    /// rank-sum only). Default: 10.
    pub n_gibbs_iterations: usize,

    /// Prior parameter: Cauchy scale for delta, kappa for rho.
    ///
    /// `None` uses the family default (1/√2 for delta, 1 for rho).
    pub prior_parameter: Option<f64>,

    /// Location subtracted from differences before ranking (signed-rank).
    /// Default: 0.
    pub test_value: f64,

    /// RNG seed. `None` draws a fresh seed per run; the seed actually used
    /// is recorded in the posterior.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_N_SAMPLES,
            n_burnin: DEFAULT_N_BURNIN,
            n_chains: DEFAULT_N_CHAINS,
            n_gibbs_iterations: DEFAULT_N_GIBBS_ITERATIONS,
            prior_parameter: None,
            test_value: 0.0,
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Default configuration (1,000 draws × 5 chains).
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast configuration for exploratory runs and tests.
    pub fn quick() -> Self {
        Self {
            n_samples: 300,
            n_burnin: 50,
            n_chains: 2,
            n_gibbs_iterations: 5,
            ..Self::default()
        }
    }

    /// Publication configuration: 10,000 draws, 1,000 burn-in, 10 chains.
    pub fn thorough() -> Self {
        Self {
            n_samples: 10_000,
            n_burnin: 1_000,
            n_chains: 10,
            ..Self::default()
        }
    }

    /// Set draws per chain.
    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = n;
        self
    }

    /// Set burn-in per chain.
    pub fn n_burnin(mut self, n: usize) -> Self {
        self.n_burnin = n;
        self
    }

    /// Set number of chains.
    pub fn n_chains(mut self, n: usize) -> Self {
        self.n_chains = n;
        self
    }

    /// Set inner Gibbs iterations.
    pub fn n_gibbs_iterations(mut self, n: usize) -> Self {
        self.n_gibbs_iterations = n;
        self
    }

    /// Set the prior parameter.
    pub fn prior_parameter(mut self, value: f64) -> Self {
        self.prior_parameter = Some(value);
        self
    }

    /// Set the null location.
    pub fn test_value(mut self, value: f64) -> Self {
        self.test_value = value;
        self
    }

    /// Fix the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Prior parameter for `family`, falling back to the family default.
    pub fn resolve_prior_parameter(&self, family: TestFamily) -> f64 {
        self.prior_parameter.unwrap_or(match family {
            TestFamily::Spearman => DEFAULT_KAPPA,
            TestFamily::SignedRank | TestFamily::RankSum => DEFAULT_CAUCHY_SCALE,
        })
    }

    /// Draws retained per chain after burn-in.
    pub fn kept_per_chain(&self) -> usize {
        self.n_samples.saturating_sub(self.n_burnin)
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<()> {
        fn invalid(parameter: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(RankTestError::SamplerConfiguration {
                parameter,
                reason: reason.into(),
            })
        }

        if self.n_samples == 0 {
            return invalid("n_samples", "must be positive");
        }
        if self.n_burnin >= self.n_samples {
            return invalid(
                "n_burnin",
                format!(
                    "must be smaller than n_samples ({} >= {})",
                    self.n_burnin, self.n_samples
                ),
            );
        }
        if self.n_chains == 0 {
            return invalid("n_chains", "must be at least 1");
        }
        if self.n_gibbs_iterations == 0 {
            return invalid("n_gibbs_iterations", "must be at least 1");
        }
        if let Some(p) = self.prior_parameter {
            if !p.is_finite() || p <= 0.0 {
                return invalid("prior_parameter", format!("must be positive and finite, got {p}"));
            }
        }
        if !self.test_value.is_finite() {
            return invalid("test_value", "must be finite");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SamplerConfig::default();
        assert_eq!(config.n_samples, 1_000);
        assert_eq!(config.n_burnin, 1);
        assert_eq!(config.n_chains, 5);
        assert_eq!(config.n_gibbs_iterations, 10);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_configs() {
        let thorough = SamplerConfig::thorough();
        assert_eq!(thorough.n_samples, 10_000);
        assert_eq!(thorough.n_burnin, 1_000);
        assert_eq!(thorough.n_chains, 10);
        assert_eq!(thorough.kept_per_chain(), 9_000);

        assert!(SamplerConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_resolve_prior_parameter() {
        let config = SamplerConfig::default();
        assert_eq!(config.resolve_prior_parameter(TestFamily::Spearman), 1.0);
        assert!(
            (config.resolve_prior_parameter(TestFamily::SignedRank) - 0.707_106_781).abs() < 1e-8
        );
        let config = config.prior_parameter(0.5);
        assert_eq!(config.resolve_prior_parameter(TestFamily::RankSum), 0.5);
    }

    #[test]
    fn test_validation_reports_parameter() {
        let cases = [
            (SamplerConfig::new().n_samples(0), "n_samples"),
            (SamplerConfig::new().n_samples(10).n_burnin(10), "n_burnin"),
            (SamplerConfig::new().n_chains(0), "n_chains"),
            (SamplerConfig::new().n_gibbs_iterations(0), "n_gibbs_iterations"),
            (SamplerConfig::new().prior_parameter(-1.0), "prior_parameter"),
            (SamplerConfig::new().prior_parameter(f64::NAN), "prior_parameter"),
            (SamplerConfig::new().test_value(f64::INFINITY), "test_value"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(RankTestError::SamplerConfiguration { parameter, .. }) => {
                    assert_eq!(parameter, expected)
                }
                other => panic!("expected {expected} error, got {other:?}"),
            }
        }
    }
}
