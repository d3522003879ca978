//! The load → sample → Bayes factor → report pipeline.
//!
//! Stages run strictly in order and any failure ends the run. Chains that
//! have not converged are not a failure: the report carries R-hat and a
//! `converged` flag and a warning is logged.

use std::time::Instant;

use rankbayes_core::{
    compute_bayes_factor, mann_whitney_u, sample_posterior, spearman_correlation,
    wilcoxon_signed_rank, Alternative, ClassicalResult, Evidence, IndependentSamples, PosteriorSummary, Prior,
    Progress, RankTestError, SampleInput, TestFamily,
};

use crate::config::Config;
use crate::error::Result;
use crate::report::TestReport;

/// A configured Bayesian rank test.
///
/// # Example
///
/// ```ignore
/// use rankbayes::{Config, RankTest};
/// use rankbayes_core::PairedSample;
///
/// let sample = PairedSample::new(post, pre)?;
/// let report = RankTest::signed_rank()
///     .config(Config::thorough().seed(2024))
///     .run(&sample.into())?;
/// println!("BF10 = {:.2}", report.bf10);
/// ```
#[derive(Debug, Clone)]
pub struct RankTest {
    family: TestFamily,
    config: Config,
}

impl RankTest {
    /// A test of `family` with default configuration.
    pub fn new(family: TestFamily) -> Self {
        Self {
            family,
            config: Config::default(),
        }
    }

    /// Bayesian Spearman correlation.
    pub fn spearman() -> Self {
        Self::new(TestFamily::Spearman)
    }

    /// Bayesian Wilcoxon signed-rank test.
    pub fn signed_rank() -> Self {
        Self::new(TestFamily::SignedRank)
    }

    /// Bayesian Wilcoxon rank-sum test.
    pub fn rank_sum() -> Self {
        Self::new(TestFamily::RankSum)
    }

    /// Replace the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The test family.
    pub fn family(&self) -> TestFamily {
        self.family
    }

    /// The active configuration.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Run the analysis without progress reporting.
    pub fn run(&self, input: &SampleInput) -> Result<TestReport> {
        self.run_with_progress(input, None)
    }

    /// Run the analysis, calling `progress` once per posterior draw.
    ///
    /// `progress` is ignored when `show_progress` is off.
    pub fn run_with_progress(
        &self,
        input: &SampleInput,
        progress: Option<Progress<'_>>,
    ) -> Result<TestReport> {
        let start = Instant::now();
        let config = &self.config;
        config.validate()?;

        let family = self.family;
        let sampler = &config.sampler;
        let prior_parameter = sampler.resolve_prior_parameter(family);
        let prior = Prior::for_family(family, prior_parameter)?;

        tracing::info!(
            test = %family,
            input = input.kind(),
            n = input.sample_size(),
            chains = sampler.n_chains,
            samples = sampler.n_samples,
            burnin = sampler.n_burnin,
            "sampling posterior"
        );

        let progress = if config.show_progress { progress } else { None };
        let posterior = sample_posterior(input, family, sampler, progress)?;

        let converged = posterior.is_converged_at(config.rhat_threshold);
        match posterior.r_hat {
            Some(r_hat) if !converged => tracing::warn!(
                r_hat,
                threshold = config.rhat_threshold,
                "chains have not converged; consider more samples or burn-in"
            ),
            None => tracing::warn!("too few draws to compute R-hat"),
            _ => tracing::debug!(r_hat = ?posterior.r_hat, "chains converged"),
        }

        let bayes_factor =
            compute_bayes_factor(&posterior, family, prior_parameter, config.alternative)?;
        tracing::info!(
            bf10 = bayes_factor.bf10(),
            log_bf10 = bayes_factor.log_bf10(),
            seed = posterior.seed,
            "Bayes factor computed"
        );

        let classical = if config.include_classical {
            match classical_test(family, input, sampler.test_value, config.alternative) {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::warn!(error = %e, "classical test skipped");
                    None
                }
            }
        } else {
            None
        };

        let evidence = config
            .interpret
            .then(|| Evidence::from_bf10(bayes_factor.bf10()));

        Ok(TestReport {
            family,
            input_kind: input.kind(),
            sample_size: input.sample_size(),
            alternative: config.alternative,
            prior,
            test_value: sampler.test_value,
            bf10: bayes_factor.bf10(),
            bf01: bayes_factor.bf01(),
            evidence,
            posterior: PosteriorSummary::from_chains(&posterior.chains, config.credible_level),
            r_hat: posterior.r_hat,
            converged,
            n_chains: sampler.n_chains,
            n_samples: sampler.n_samples,
            n_burnin: sampler.n_burnin,
            seed: posterior.seed,
            classical,
            bayes_factor,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}

/// The classical test matching `family` on `input`.
///
/// Signed-rank differences and the x group of a rank-sum test are shifted
/// by `test_value` first, as in the Bayesian samplers.
pub fn classical_test(
    family: TestFamily,
    input: &SampleInput,
    test_value: f64,
    alternative: Alternative,
) -> Result<ClassicalResult> {
    let result = match (family, input) {
        (TestFamily::Spearman, SampleInput::Paired(p)) => spearman_correlation(p, alternative),
        (TestFamily::SignedRank, SampleInput::Paired(p)) => {
            wilcoxon_signed_rank(&p.differences(test_value), alternative)
        }
        (TestFamily::SignedRank, SampleInput::OneSample(s)) => {
            wilcoxon_signed_rank(&s.differences(test_value), alternative)
        }
        (TestFamily::RankSum, SampleInput::Independent(s)) => {
            let shifted = s.x().iter().map(|v| v - test_value).collect();
            IndependentSamples::new(shifted, s.y().to_vec())
                .and_then(|s| mann_whitney_u(&s, alternative))
        }
        (family, input) => Err(RankTestError::UnsupportedInput {
            family,
            input: input.kind(),
        }),
    };
    Ok(result?)
}

/// Every classical test that applies to `input`.
///
/// Paired data get the signed-rank and Spearman tests, one sample the
/// signed-rank test, and independent groups the Mann–Whitney test.
pub fn classical_tests(
    input: &SampleInput,
    test_value: f64,
    alternative: Alternative,
) -> Result<Vec<ClassicalResult>> {
    let families: &[TestFamily] = match input {
        SampleInput::Paired(_) => &[TestFamily::SignedRank, TestFamily::Spearman],
        SampleInput::OneSample(_) => &[TestFamily::SignedRank],
        SampleInput::Independent(_) => &[TestFamily::RankSum],
    };
    families
        .iter()
        .map(|&family| classical_test(family, input, test_value, alternative))
        .collect()
}
