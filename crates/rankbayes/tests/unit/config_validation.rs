//! Tests for configuration validation.
//!
//! Invalid settings must be rejected by `Config::validate` and by the
//! pipeline before any draw is taken.

use rankbayes::{Config, Error, RankTest, SamplerConfig};
use rankbayes_core::RankTestError;

fn sampler_parameter(config: &Config) -> Option<&'static str> {
    match config.validate() {
        Err(Error::Analysis(RankTestError::SamplerConfiguration { parameter, .. })) => {
            Some(parameter)
        }
        _ => None,
    }
}

// =============================================================================
// PRESETS
// =============================================================================

#[test]
fn presets_are_valid() {
    assert!(Config::new().validate().is_ok());
    assert!(Config::quick().validate().is_ok());
    assert!(Config::thorough().validate().is_ok());
}

#[test]
fn thorough_preset_values() {
    let config = Config::thorough();
    assert_eq!(config.sampler.n_samples, 10_000);
    assert_eq!(config.sampler.n_burnin, 1_000);
    assert_eq!(config.sampler.n_chains, 10);
    assert_eq!(config.rhat_threshold, 1.05);
    assert!(config.interpret);
}

#[test]
fn seed_builder_sets_sampler_seed() {
    let config = Config::quick().seed(7);
    assert_eq!(config.sampler.seed, Some(7));
}

// =============================================================================
// SAMPLER SETTINGS
// =============================================================================

#[test]
fn zero_samples_rejected() {
    let config = Config::new().sampler(SamplerConfig::new().n_samples(0));
    assert_eq!(sampler_parameter(&config), Some("n_samples"));
}

#[test]
fn burnin_not_below_samples_rejected() {
    let config = Config::new().sampler(SamplerConfig::new().n_samples(100).n_burnin(100));
    assert_eq!(sampler_parameter(&config), Some("n_burnin"));
}

#[test]
fn zero_chains_rejected() {
    let config = Config::new().sampler(SamplerConfig::new().n_chains(0));
    assert_eq!(sampler_parameter(&config), Some("n_chains"));
}

#[test]
fn non_positive_prior_rejected() {
    for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
        let config = Config::new().sampler(SamplerConfig::new().prior_parameter(bad));
        assert_eq!(sampler_parameter(&config), Some("prior_parameter"), "prior {bad}");
    }
}

#[test]
fn non_finite_test_value_rejected() {
    let config = Config::new().sampler(SamplerConfig::new().test_value(f64::NAN));
    assert_eq!(sampler_parameter(&config), Some("test_value"));
}

// =============================================================================
// ANALYSIS SETTINGS
// =============================================================================

#[test]
fn rhat_threshold_below_one_rejected() {
    let config = Config::new().rhat_threshold(0.99);
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn rhat_threshold_one_valid() {
    assert!(Config::new().rhat_threshold(1.0).validate().is_ok());
}

#[test]
fn credible_level_bounds() {
    assert!(matches!(
        Config::new().credible_level(0.0).validate(),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Config::new().credible_level(1.0).validate(),
        Err(Error::Config(_))
    ));
    assert!(Config::new().credible_level(0.89).validate().is_ok());
}

#[test]
fn invalid_config_fails_before_sampling() {
    let sample = rankbayes::PairedSample::new(vec![1.0, 2.0, 3.0], vec![2.0, 1.0, 3.0]).unwrap();
    let test = RankTest::spearman().config(Config::quick().rhat_threshold(0.5));
    assert!(matches!(test.run(&sample.into()), Err(Error::Config(_))));
}
