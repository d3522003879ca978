//! Result of one Bayesian rank test.

use serde::Serialize;

use rankbayes_core::{
    Alternative, BayesFactor, ClassicalResult, Evidence, PosteriorSummary, Prior, TestFamily,
};

/// Everything a finished analysis reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReport {
    /// Which rank test was run.
    pub family: TestFamily,

    /// Shape of the input ("paired", "one-sample", ...).
    pub input_kind: &'static str,

    /// Pairs, observations, or n1 + n2.
    pub sample_size: usize,

    /// Direction of H1.
    pub alternative: Alternative,

    /// Prior on the parameter under H1.
    pub prior: Prior,

    /// Location the data were shifted by before ranking.
    pub test_value: f64,

    /// BF10 = exp(`log_bf10`), duplicated for readers of the JSON.
    pub bf10: f64,

    /// BF01 = 1 / BF10.
    pub bf01: f64,

    /// Full Bayes-factor record.
    pub bayes_factor: BayesFactor,

    /// Verbal band of BF10; `None` when interpretation is off.
    pub evidence: Option<Evidence>,

    /// Posterior summary of rho or delta.
    pub posterior: PosteriorSummary,

    /// Gelman–Rubin statistic; `None` when it could not be computed.
    pub r_hat: Option<f64>,

    /// Whether R-hat is at or below the configured threshold.
    pub converged: bool,

    /// Chains run.
    pub n_chains: usize,

    /// Draws per chain, burn-in included.
    pub n_samples: usize,

    /// Leading draws discarded per chain.
    pub n_burnin: usize,

    /// Base RNG seed; rerunning with it reproduces the draws.
    pub seed: u64,

    /// Matching frequentist test, when requested and computable.
    pub classical: Option<ClassicalResult>,

    /// Wall-clock time of the analysis in seconds.
    pub elapsed_secs: f64,
}

impl TestReport {
    /// Name of the estimated parameter (ρ or δ).
    pub fn parameter_symbol(&self) -> &'static str {
        self.family.parameter_symbol()
    }
}
