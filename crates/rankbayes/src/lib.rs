//! # rankbayes
//!
//! Bayesian rank-based hypothesis tests for small ordinal datasets.
//!
//! This crate wraps the samplers of `rankbayes-core` into a complete
//! analysis, outputting:
//! - A Savage–Dickey Bayes factor (BF10, BF01 or log BF10)
//! - A verbal evidence band ("strong evidence for H1")
//! - Posterior mean, median, sd and credible interval of rho or delta
//! - R-hat and effective sample size of the chains
//! - The matching classical test for comparison
//!
//! Three tests are available: Spearman's rho for association, the Wilcoxon
//! signed-rank test for paired or one-sample location, and the Wilcoxon
//! rank-sum test for two independent groups. Only the ranks of the data
//! enter the likelihood, so results are unchanged by any monotone recoding
//! of a Likert scale.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rankbayes::{data::parse_values, Config, RankTest};
//! use rankbayes_core::PairedSample;
//!
//! let post = parse_values("5, 6, 4, 7, 6, 5, 7, 3")?;
//! let pre = parse_values("4, 4, 4, 5, 6, 3, 5, 3")?;
//! let sample = PairedSample::new(post, pre)?;
//!
//! let report = RankTest::signed_rank()
//!     .config(Config::thorough().seed(1))
//!     .run(&sample.into())?;
//!
//! println!("{}", rankbayes::output::format_report(&report, Default::default()));
//! ```
//!
//! ## Loading survey exports
//!
//! ```ignore
//! use rankbayes::data::{load_likert_csv, LikertScale};
//!
//! let table = load_likert_csv("responses.csv".as_ref(), LikertScale::new(1, 7))?;
//! let sample = table.paired(&["post_1", "post_2"], &["pre_1", "pre_2"])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod pipeline;
mod report;

// Functional modules
pub mod data;
pub mod output;

// Re-exports for public API
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{classical_test, classical_tests, RankTest};
pub use report::TestReport;

pub use rankbayes_core::{
    Alternative, BfType, ClassicalResult, Evidence, IndependentSamples, OneSample, PairedSample,
    SampleInput, SamplerConfig, TestFamily,
};
