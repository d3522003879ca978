//! Error type for sampling and Bayes-factor computation.

use thiserror::Error;

use crate::types::TestFamily;

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, RankTestError>;

/// Errors raised by the rank-test pipeline.
///
/// Every variant is fatal to the run that produced it. Non-convergence is
/// deliberately absent: it is reported through [`crate::Posterior::r_hat`]
/// and never aborts an analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankTestError {
    /// Paired sequences have different lengths.
    #[error("paired samples differ in length: x has {x_len} values, y has {y_len}")]
    InputLengthMismatch {
        /// Length of the first sequence.
        x_len: usize,
        /// Length of the second sequence.
        y_len: usize,
    },

    /// Too few observations for the requested test.
    #[error("{test} needs at least {min} observations, got {got}")]
    InsufficientData {
        /// Test or input that was short.
        test: &'static str,
        /// Number of observations supplied.
        got: usize,
        /// Minimum required.
        min: usize,
    },

    /// A NaN or infinite value was supplied.
    #[error("non-finite value {value} at position {index} of {sample}")]
    NonFiniteValue {
        /// Which sequence held the value.
        sample: &'static str,
        /// Zero-based position.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A sampler parameter is out of range.
    #[error("invalid sampler configuration: {parameter} {reason}")]
    SamplerConfiguration {
        /// Parameter name as it appears in [`crate::SamplerConfig`].
        parameter: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The Bayes-factor calculator received no draws.
    #[error("posterior sample is empty")]
    EmptyPosterior,

    /// The prior parameter differs from the one the draws were generated with.
    #[error("prior parameter {got} does not match the sampler's {expected}")]
    PriorMismatch {
        /// Prior parameter recorded in the posterior.
        expected: f64,
        /// Prior parameter passed to the calculator.
        got: f64,
    },

    /// The test family differs from the one the draws were generated with.
    #[error("posterior was sampled for {expected}, not {got}")]
    FamilyMismatch {
        /// Family recorded in the posterior.
        expected: TestFamily,
        /// Family passed to the calculator.
        got: TestFamily,
    },

    /// The input shape cannot be used with this test family.
    #[error("{family} cannot be run on {input} data")]
    UnsupportedInput {
        /// Requested family.
        family: TestFamily,
        /// Kind of input supplied.
        input: &'static str,
    },

    /// A distribution could not be constructed from sampler state.
    #[error("numerical failure: {0}")]
    Numerical(String),
}
