//! Configuration for a rank-based Bayesian analysis.

use rankbayes_core::constants::RHAT_CONVERGENCE_THRESHOLD;
use rankbayes_core::{Alternative, BfType, SamplerConfig};

use crate::error::{Error, Result};

/// Configuration options for [`crate::RankTest`].
///
/// Wraps the sampler settings with the choices that only matter to the
/// analysis and its report: test direction, the convergence threshold and
/// what to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // =========================================================================
    // Sampling
    // =========================================================================

    /// Draws, burn-in, chains, prior parameter, test value and seed.
    pub sampler: SamplerConfig,

    // =========================================================================
    // Hypothesis
    // =========================================================================

    /// Direction of H1. Default: two-sided.
    pub alternative: Alternative,

    /// R-hat above this value is reported as not converged and logged as
    /// a warning. The analysis still completes. Default: 1.05.
    pub rhat_threshold: f64,

    /// Mass of the central credible interval in the report. Default: 0.95.
    pub credible_level: f64,

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Representation of the Bayes factor in text output. Default: BF10.
    pub bf_type: BfType,

    /// Include the verbal evidence band. Default: true.
    pub interpret: bool,

    /// Drive a progress callback while sampling. Default: true.
    pub show_progress: bool,

    /// Also run the matching classical test. Default: true.
    pub include_classical: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            alternative: Alternative::TwoSided,
            rhat_threshold: RHAT_CONVERGENCE_THRESHOLD,
            credible_level: 0.95,
            bf_type: BfType::Bf10,
            interpret: true,
            show_progress: true,
            include_classical: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Few draws and two chains, for trying things out.
    pub fn quick() -> Self {
        Self {
            sampler: SamplerConfig::quick(),
            ..Default::default()
        }
    }

    /// 10,000 draws with 1,000 burn-in on 10 chains, for reported results.
    pub fn thorough() -> Self {
        Self {
            sampler: SamplerConfig::thorough(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Replace the sampler settings.
    pub fn sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Set the direction of H1.
    pub fn alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Set the R-hat convergence threshold.
    pub fn rhat_threshold(mut self, threshold: f64) -> Self {
        self.rhat_threshold = threshold;
        self
    }

    /// Set the credible interval mass.
    pub fn credible_level(mut self, level: f64) -> Self {
        self.credible_level = level;
        self
    }

    /// Set the Bayes factor representation for text output.
    pub fn bf_type(mut self, bf_type: BfType) -> Self {
        self.bf_type = bf_type;
        self
    }

    /// Show or hide the evidence band.
    pub fn interpret(mut self, interpret: bool) -> Self {
        self.interpret = interpret;
        self
    }

    /// Enable or disable progress reporting.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Enable or disable the classical companion test.
    pub fn include_classical(mut self, include: bool) -> Self {
        self.include_classical = include;
        self
    }

    /// Set the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.sampler.seed = Some(seed);
        self
    }

    /// Check if the configuration is valid.
    ///
    /// Reports the first offending setting.
    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        if !(self.rhat_threshold.is_finite() && self.rhat_threshold >= 1.0) {
            return Err(Error::Config(format!(
                "rhat_threshold must be a finite value >= 1, got {}",
                self.rhat_threshold
            )));
        }
        if !(self.credible_level > 0.0 && self.credible_level < 1.0) {
            return Err(Error::Config(format!(
                "credible_level must be in (0, 1), got {}",
                self.credible_level
            )));
        }
        Ok(())
    }
}
