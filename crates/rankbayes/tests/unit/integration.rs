//! End-to-end tests of the analysis pipeline.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use rankbayes::data::{load_likert_csv, LikertScale};
use rankbayes::output::{format_report, to_json};
use rankbayes::{
    classical_tests, Alternative, BfType, Config, Error, IndependentSamples, OneSample,
    PairedSample, RankTest, SampleInput, SamplerConfig,
};
use rankbayes_core::classical::PValueMethod;
use rankbayes_core::{ClassicalTest, EvidenceStrength, Hypothesis, RankTestError};

fn demo_sample() -> PairedSample {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/likability_pre_post.csv");
    let table = load_likert_csv(&path, LikertScale::new(1, 7)).unwrap();
    table
        .paired(&["post_1", "post_2", "post_3"], &["pre_1", "pre_2", "pre_3"])
        .unwrap()
}

fn quick(seed: u64) -> Config {
    Config::quick().seed(seed).show_progress(false)
}

fn correlated(n: usize) -> PairedSample {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| i as f64 + if i % 4 == 0 { 1.5 } else { 0.0 })
        .collect();
    PairedSample::new(x, y).unwrap()
}

// =============================================================================
// DEMO QUESTIONNAIRE
// =============================================================================

#[test]
fn demo_signed_rank_thorough_favours_h1() {
    let input: SampleInput = demo_sample().into();
    let report = RankTest::signed_rank()
        .config(Config::thorough().seed(2024).show_progress(false))
        .run(&input)
        .unwrap();

    assert_eq!(report.sample_size, 22);
    assert_eq!(report.seed, 2024);
    assert!(report.bf10 > 10.0, "BF10 = {}", report.bf10);
    assert!((report.bf10 * report.bf01 - 1.0).abs() < 1e-9);
    assert!(report.posterior.mean > 0.0);
    assert!(report.posterior.credible_interval.0 > 0.0);
    assert_eq!(report.posterior.n_draws, 10 * 9_000);
    assert!(report.converged, "R-hat = {:?}", report.r_hat);

    let evidence = report.evidence.unwrap();
    assert_eq!(evidence.favours, Some(Hypothesis::H1));
    assert!(evidence.strength >= EvidenceStrength::Strong);

    let classical = report.classical.unwrap();
    assert_eq!(classical.test, ClassicalTest::WilcoxonSignedRank);
    assert!(classical.p_value < 0.01);
}

#[test]
fn demo_one_sided_directions_split() {
    let input: SampleInput = demo_sample().into();
    let run = |alternative| {
        RankTest::signed_rank()
            .config(quick(5).alternative(alternative))
            .run(&input)
            .unwrap()
    };

    let greater = run(Alternative::Greater);
    let less = run(Alternative::Less);
    assert!(greater.bf10 > 1.0);
    assert!(less.bf10 < 1.0);
    assert_eq!(less.evidence.unwrap().favours, Some(Hypothesis::H0));
}

// =============================================================================
// REPRODUCIBILITY
// =============================================================================

#[test]
fn seeded_runs_are_deterministic() {
    let input: SampleInput = correlated(15).into();
    let first = RankTest::spearman().config(quick(99)).run(&input).unwrap();
    let second = RankTest::spearman().config(quick(99)).run(&input).unwrap();

    assert_eq!(first.bayes_factor.log_bf10, second.bayes_factor.log_bf10);
    assert_eq!(first.posterior.mean, second.posterior.mean);
    assert_eq!(first.r_hat, second.r_hat);
}

#[test]
fn different_seeds_differ() {
    let input: SampleInput = correlated(15).into();
    let a = RankTest::spearman().config(quick(1)).run(&input).unwrap();
    let b = RankTest::spearman().config(quick(2)).run(&input).unwrap();
    assert_ne!(a.posterior.mean, b.posterior.mean);
}

#[test]
fn unseeded_run_reports_reusable_seed() {
    let input: SampleInput = correlated(12).into();
    let config = Config::quick().show_progress(false);
    let first = RankTest::spearman().config(config.clone()).run(&input).unwrap();
    let rerun = RankTest::spearman()
        .config(config.seed(first.seed))
        .run(&input)
        .unwrap();
    assert_eq!(first.posterior.mean, rerun.posterior.mean);
}

#[test]
fn monotone_recoding_leaves_report_unchanged() {
    let sample = demo_sample();
    let recoded = PairedSample::new(
        sample.x().iter().map(|v| v.exp()).collect(),
        sample.y().iter().map(|v| v.exp()).collect(),
    )
    .unwrap();

    let original = RankTest::spearman()
        .config(quick(11))
        .run(&sample.into())
        .unwrap();
    let transformed = RankTest::spearman()
        .config(quick(11))
        .run(&recoded.into())
        .unwrap();
    assert_eq!(original.bayes_factor.log_bf10, transformed.bayes_factor.log_bf10);
}

// =============================================================================
// INPUT HANDLING
// =============================================================================

#[test]
fn length_mismatch_rejected_before_sampling() {
    let calls = AtomicU64::new(0);
    let result = PairedSample::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![1.0, 2.0, 3.0, 4.0])
        .map_err(Error::from)
        .and_then(|sample| {
            let tick = |n: u64| {
                calls.fetch_add(n, Ordering::Relaxed);
            };
            RankTest::signed_rank()
                .config(Config::quick())
                .run_with_progress(&sample.into(), Some(&tick))
        });

    match result {
        Err(Error::Analysis(RankTestError::InputLengthMismatch { x_len, y_len })) => {
            assert_eq!((x_len, y_len), (5, 4));
        }
        other => panic!("Expected InputLengthMismatch, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn spearman_on_one_sample_unsupported() {
    let input: SampleInput = OneSample::new(vec![1.0, 2.0, 3.0]).unwrap().into();
    assert!(matches!(
        RankTest::spearman().config(quick(1)).run(&input),
        Err(Error::Analysis(RankTestError::UnsupportedInput { .. }))
    ));
}

#[test]
fn progress_counts_every_draw() {
    let calls = AtomicU64::new(0);
    let tick = |n: u64| {
        calls.fetch_add(n, Ordering::Relaxed);
    };
    let config = Config::quick().seed(3);
    let expected = (config.sampler.n_chains * config.sampler.n_samples) as u64;

    RankTest::spearman()
        .config(config)
        .run_with_progress(&correlated(10).into(), Some(&tick))
        .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), expected);
}

#[test]
fn progress_suppressed_when_disabled() {
    let calls = AtomicU64::new(0);
    let tick = |n: u64| {
        calls.fetch_add(n, Ordering::Relaxed);
    };
    RankTest::spearman()
        .config(quick(3))
        .run_with_progress(&correlated(10).into(), Some(&tick))
        .unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

// =============================================================================
// FAMILIES
// =============================================================================

#[test]
fn spearman_detects_association() {
    let report = RankTest::spearman()
        .config(quick(8))
        .run(&correlated(20).into())
        .unwrap();
    assert!(report.bf10 > 3.0, "BF10 = {}", report.bf10);
    assert!(report.posterior.mean > 0.5);
    assert!(report.posterior.credible_interval.1 <= 1.0);
    assert_eq!(report.parameter_symbol(), "rho");
}

#[test]
fn spearman_posterior_on_classical_rho_scale() {
    let n = 40;
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..n).map(|i| i as f64 + if i % 2 == 0 { 2.5 } else { 0.0 }).collect();
    let input: SampleInput = PairedSample::new(x, y).unwrap().into();

    let config = Config::quick()
        .show_progress(false)
        .sampler(SamplerConfig::quick().n_samples(1_500).n_burnin(300).seed(13));
    let report = RankTest::spearman().config(config).run(&input).unwrap();
    let classical = report.classical.unwrap();
    assert_eq!(classical.test, ClassicalTest::Spearman);

    // Posterior draws and the classical statistic share the rank-correlation scale
    let gap = (report.posterior.mean - classical.statistic).abs();
    assert!(
        gap < 0.05,
        "posterior mean {} vs Spearman rho {}",
        report.posterior.mean,
        classical.statistic
    );
}

#[test]
fn rank_sum_separated_groups() {
    let x: Vec<f64> = (0..12).map(|i| 10.0 + i as f64).collect();
    let y: Vec<f64> = (0..12).map(|i| i as f64 * 0.5).collect();
    let input: SampleInput = IndependentSamples::new(x, y).unwrap().into();

    let report = RankTest::rank_sum().config(quick(4)).run(&input).unwrap();
    assert!(report.bf10 > 10.0, "BF10 = {}", report.bf10);
    assert!(report.posterior.mean > 0.0);
    assert_eq!(report.input_kind, "independent two-sample");

    let classical = report.classical.unwrap();
    assert_eq!(classical.test, ClassicalTest::MannWhitneyU);
    assert_eq!(classical.method, PValueMethod::Normal);
}

#[test]
fn null_data_does_not_favour_h1() {
    let x = vec![3.0, 5.0, 4.0, 2.0, 6.0, 4.0, 3.0, 5.0, 2.0, 6.0];
    let y = vec![4.0, 4.0, 3.0, 3.0, 5.0, 5.0, 2.0, 6.0, 3.0, 5.0];
    let input: SampleInput = PairedSample::new(x, y).unwrap().into();

    let report = RankTest::signed_rank().config(quick(12)).run(&input).unwrap();
    assert!(report.bf10 < 3.0, "BF10 = {}", report.bf10);
}

#[test]
fn classical_skipped_when_disabled() {
    let report = RankTest::spearman()
        .config(quick(6).include_classical(false).interpret(false))
        .run(&correlated(10).into())
        .unwrap();
    assert!(report.classical.is_none());
    assert!(report.evidence.is_none());
}

#[test]
fn classical_tests_for_paired_input() {
    let input: SampleInput = demo_sample().into();
    let results = classical_tests(&input, 0.0, Alternative::TwoSided).unwrap();
    let tests: Vec<ClassicalTest> = results.iter().map(|r| r.test).collect();
    assert_eq!(
        tests,
        vec![ClassicalTest::WilcoxonSignedRank, ClassicalTest::Spearman]
    );
}

// =============================================================================
// OUTPUT
// =============================================================================

#[test]
fn report_serializes_and_formats() {
    let report = RankTest::signed_rank()
        .config(quick(21))
        .run(&demo_sample().into())
        .unwrap();

    let json = to_json(&report).unwrap();
    assert!(json.contains("\"bf10\""));
    assert!(json.contains("\"family\""));
    assert!(json.contains("\"seed\":21"));

    colored::control::set_override(false);
    let text = format_report(&report, BfType::LogBf10);
    assert!(text.contains("log(BF10) = "));
    assert!(text.contains("n = 22"));
}
