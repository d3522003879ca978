//! Priors on the test parameter under H1.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, Cauchy, Continuous, ContinuousCDF};

use crate::error::{RankTestError, Result};
use crate::types::{Alternative, TestFamily};

/// Prior distribution on ρ or δ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Prior {
    /// Cauchy(0, scale) on δ (signed-rank and rank-sum tests).
    Cauchy {
        /// Scale r.
        scale: f64,
    },
    /// Beta(1/κ, 1/κ) stretched to [-1, 1] on ρ (Spearman).
    StretchedBeta {
        /// Width κ; κ = 1 is uniform.
        kappa: f64,
    },
}

impl Prior {
    /// The prior used by `family` with parameter `parameter`.
    pub fn for_family(family: TestFamily, parameter: f64) -> Result<Self> {
        if !(parameter.is_finite() && parameter > 0.0) {
            return Err(RankTestError::SamplerConfiguration {
                parameter: "prior_parameter",
                reason: format!("must be positive and finite, got {parameter}"),
            });
        }
        Ok(match family {
            TestFamily::Spearman => Prior::StretchedBeta { kappa: parameter },
            TestFamily::SignedRank | TestFamily::RankSum => Prior::Cauchy { scale: parameter },
        })
    }

    /// The scale or width parameter.
    pub fn parameter(&self) -> f64 {
        match *self {
            Prior::Cauchy { scale } => scale,
            Prior::StretchedBeta { kappa } => kappa,
        }
    }

    /// ln π(x).
    pub fn log_pdf(&self, x: f64) -> Result<f64> {
        match *self {
            Prior::Cauchy { scale } => Ok(cauchy(scale)?.ln_pdf(x)),
            Prior::StretchedBeta { kappa } => {
                if !(-1.0..=1.0).contains(&x) {
                    return Ok(f64::NEG_INFINITY);
                }
                // ρ = 2u − 1, so π(ρ) = Beta(u) / 2
                Ok(beta(kappa)?.ln_pdf((x + 1.0) / 2.0) - core::f64::consts::LN_2)
            }
        }
    }

    /// P(X ≤ x).
    pub fn cdf(&self, x: f64) -> Result<f64> {
        match *self {
            Prior::Cauchy { scale } => Ok(cauchy(scale)?.cdf(x)),
            Prior::StretchedBeta { kappa } => Ok(beta(kappa)?.cdf(((x + 1.0) / 2.0).clamp(0.0, 1.0))),
        }
    }

    /// Prior probability of the side of zero named by `alternative`.
    pub fn mass(&self, alternative: Alternative) -> Result<f64> {
        Ok(match alternative {
            Alternative::TwoSided => 1.0,
            Alternative::Greater => 1.0 - self.cdf(0.0)?,
            Alternative::Less => self.cdf(0.0)?,
        })
    }
}

fn cauchy(scale: f64) -> Result<Cauchy> {
    Cauchy::new(0.0, scale).map_err(|e| RankTestError::Numerical(format!("Cauchy(0, {scale}): {e}")))
}

fn beta(kappa: f64) -> Result<Beta> {
    let shape = 1.0 / kappa;
    Beta::new(shape, shape).map_err(|e| RankTestError::Numerical(format!("Beta({shape}, {shape}): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_1_SQRT_2, PI};

    #[test]
    fn test_family_selects_prior() {
        assert_eq!(
            Prior::for_family(TestFamily::Spearman, 1.0).unwrap(),
            Prior::StretchedBeta { kappa: 1.0 }
        );
        assert_eq!(
            Prior::for_family(TestFamily::RankSum, 0.5).unwrap(),
            Prior::Cauchy { scale: 0.5 }
        );
    }

    #[test]
    fn test_invalid_parameter() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Prior::for_family(TestFamily::SignedRank, bad),
                Err(RankTestError::SamplerConfiguration { parameter: "prior_parameter", .. })
            ));
        }
    }

    #[test]
    fn test_cauchy_density_at_zero() {
        let prior = Prior::Cauchy { scale: FRAC_1_SQRT_2 };
        let expected = 1.0 / (PI * FRAC_1_SQRT_2);
        assert!((prior.log_pdf(0.0).unwrap().exp() - expected).abs() < 1e-12);
        assert!((prior.mass(Alternative::Greater).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_stretched_beta() {
        let prior = Prior::StretchedBeta { kappa: 1.0 };
        assert!((prior.log_pdf(0.0).unwrap().exp() - 0.5).abs() < 1e-12);
        assert!((prior.log_pdf(0.8).unwrap().exp() - 0.5).abs() < 1e-12);
        assert_eq!(prior.log_pdf(1.5).unwrap(), f64::NEG_INFINITY);
        assert!((prior.cdf(0.5).unwrap() - 0.75).abs() < 1e-12);
        assert!((prior.mass(Alternative::Less).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_wider_kappa_concentrates_at_zero() {
        let flat = Prior::StretchedBeta { kappa: 1.0 }.log_pdf(0.0).unwrap();
        let narrow = Prior::StretchedBeta { kappa: 0.5 }.log_pdf(0.0).unwrap();
        assert!(narrow > flat);
    }
}
