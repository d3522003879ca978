//! Core algorithms for Bayesian rank-based hypothesis testing.
//!
//! This crate holds everything that does not touch the filesystem or the
//! terminal: the rank-likelihood Gibbs samplers for Spearman's rho, the
//! Wilcoxon signed-rank test and the rank-sum test, their convergence
//! diagnostics, Savage–Dickey Bayes factors, evidence banding, and the
//! matching classical tests.
//!
//! # Features
//!
//! - `parallel`: run chains on a rayon thread pool. Draws are identical to
//!   the sequential driver for the same seed.
//!
//! # Usage
//!
//! This crate is typically used through the `rankbayes` crate, which adds
//! data loading, reporting and a CLI. Used directly:
//!
//! ```
//! use rankbayes_core::{
//!     compute_bayes_factor, sample_posterior, Alternative, PairedSample, SamplerConfig,
//!     TestFamily,
//! };
//!
//! let pre = vec![4.0, 5.0, 3.0, 6.0, 5.0, 4.0, 6.0, 2.0];
//! let post = vec![5.0, 6.0, 5.0, 7.0, 5.5, 6.0, 6.5, 4.0];
//! let sample = PairedSample::new(post, pre)?;
//!
//! let config = SamplerConfig::quick().seed(1);
//! let posterior = sample_posterior(&sample.into(), TestFamily::SignedRank, &config, None)?;
//! let prior = config.resolve_prior_parameter(TestFamily::SignedRank);
//! let bf = compute_bayes_factor(&posterior, TestFamily::SignedRank, prior, Alternative::TwoSided)?;
//! println!("BF10 = {:.2} ({})", bf.bf10(), bf.evidence());
//! # Ok::<(), rankbayes_core::RankTestError>(())
//! ```

pub mod bayes_factor;
pub mod classical;
pub mod config;
pub mod constants;
pub mod density;
pub mod diagnostics;
pub mod error;
pub mod interpretation;
pub mod prior;
pub mod ranks;
pub mod sampler;
pub mod truncnorm;
pub mod types;

// Re-export commonly used items at crate root
pub use bayes_factor::{compute_bayes_factor, BayesFactor, BfType};
pub use classical::{
    mann_whitney_u, spearman_correlation, wilcoxon_signed_rank, ClassicalResult, ClassicalTest,
};
pub use config::SamplerConfig;
pub use diagnostics::{effective_sample_size, gelman_rubin, PosteriorSummary};
pub use error::{RankTestError, Result};
pub use interpretation::{Evidence, EvidenceStrength, Hypothesis};
pub use prior::Prior;
pub use sampler::{sample_posterior, Posterior, Progress};
pub use types::{Alternative, IndependentSamples, OneSample, PairedSample, SampleInput, TestFamily};
