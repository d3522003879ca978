//! Pre/post questionnaire analysis on the bundled likability data.
//!
//! Composite scores of three Likert items are compared before and after an
//! intervention with the Bayesian signed-rank test, followed by the
//! classical tests for the same pairs.

use std::path::PathBuf;

use rankbayes::data::{load_likert_csv, LikertScale};
use rankbayes::output::{format_classical, format_report};
use rankbayes::{classical_tests, Alternative, BfType, Config, RankTest, SampleInput};

fn main() -> rankbayes::Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/likability_pre_post.csv");
    let table = load_likert_csv(&path, LikertScale::new(1, 7))?;
    let sample = table.paired(&["post_1", "post_2", "post_3"], &["pre_1", "pre_2", "pre_3"])?;

    println!("Respondents with complete answers: {}\n", sample.len());

    let input: SampleInput = sample.into();
    let report = RankTest::signed_rank()
        .config(Config::thorough().seed(2024).show_progress(false))
        .run(&input)?;
    println!("{}\n", format_report(&report, BfType::Bf10));

    let classical = classical_tests(&input, 0.0, Alternative::TwoSided)?;
    println!("{}", format_classical(&classical));

    Ok(())
}
