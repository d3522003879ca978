//! Truncated normal sampling.
//!
//! Inverse-CDF sampling on whichever side of the distribution keeps the
//! most precision: intervals entirely above the mean are sampled through
//! the survival function, intervals below it through the CDF. When the
//! interval mass underflows, one-sided tails fall back to Robert's (1995)
//! exponential rejection sampler.

use core::f64::consts::SQRT_2;

use rand::Rng;
use rand_distr::{Distribution, Exp};
use statrs::function::erf::{erfc, erfc_inv};

use crate::error::{RankTestError, Result};

/// Standard normal CDF: Φ(x) = erfc(-x/√2) / 2
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal quantile: Φ⁻¹(p) = -√2 · erfc⁻¹(2p)
#[inline]
pub fn normal_quantile(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Draw from N(mean, sd²) truncated to `[lower, upper]`.
///
/// Bounds may be infinite. `sd` must be positive.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    lower: f64,
    upper: f64,
    mean: f64,
    sd: f64,
) -> Result<f64> {
    if sd <= 0.0 || !sd.is_finite() {
        return Err(RankTestError::Numerical(format!(
            "truncated normal needs a positive sd, got {sd}"
        )));
    }
    if lower.is_nan() || upper.is_nan() || lower > upper {
        return Err(RankTestError::Numerical(format!(
            "empty truncation interval [{lower}, {upper}]"
        )));
    }

    let a = (lower - mean) / sd;
    let b = (upper - mean) / sd;
    let z = sample_standard(rng, a, b)?;
    // Rescaling can land an ulp outside the interval
    Ok((mean + sd * z).clamp(lower, upper))
}

/// Draw from N(0, 1) truncated to `[a, b]`.
fn sample_standard<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> Result<f64> {
    if a == b {
        return Ok(a);
    }

    let z = if a >= 0.0 {
        // Upper region: work with Q(x) = Φ(-x), which is accurate in the tail
        let q_a = normal_cdf(-a);
        let q_b = normal_cdf(-b);
        if q_a - q_b > 0.0 {
            let u = q_b + (q_a - q_b) * rng.random::<f64>();
            -normal_quantile(u)
        } else {
            f64::NAN
        }
    } else {
        let p_a = normal_cdf(a);
        let p_b = normal_cdf(b);
        if p_b - p_a > 0.0 {
            let u = p_a + (p_b - p_a) * rng.random::<f64>();
            normal_quantile(u)
        } else {
            f64::NAN
        }
    };

    if z.is_finite() && z >= a && z <= b {
        return Ok(z);
    }

    // Interval mass underflowed or the quantile hit ±∞
    if b.is_infinite() && a.is_finite() {
        tail_sample(rng, a)
    } else if a.is_infinite() && b.is_finite() {
        Ok(-tail_sample(rng, -b)?)
    } else if a.is_finite() && b.is_finite() {
        Ok(0.5 * (a + b))
    } else {
        Err(RankTestError::Numerical(format!(
            "cannot sample truncated normal on [{a}, {b}]"
        )))
    }
}

/// Robert's exponential rejection sampler for N(0,1) truncated to `[a, ∞)`.
fn tail_sample<R: Rng + ?Sized>(rng: &mut R, a: f64) -> Result<f64> {
    let alpha = 0.5 * (a + (a * a + 4.0).sqrt());
    let exp = Exp::new(alpha).map_err(|e| RankTestError::Numerical(e.to_string()))?;
    loop {
        let z = a + exp.sample(rng);
        let rho = (-0.5 * (z - alpha) * (z - alpha)).exp();
        if rng.random::<f64>() <= rho {
            return Ok(z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_normal_cdf_quantile_roundtrip() {
        for &p in &[0.001, 0.025, 0.5, 0.975, 0.999] {
            let x = normal_quantile(p);
            assert!((normal_cdf(x) - p).abs() < 1e-10, "p={p}, x={x}");
        }
        assert!((normal_quantile(0.975) - 1.959_963_984_540_054).abs() < 1e-8);
    }

    #[test]
    fn test_samples_respect_bounds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let cases = [
            (-1.0, 1.0, 0.0, 1.0),
            (0.5, f64::INFINITY, 0.0, 1.0),
            (f64::NEG_INFINITY, -2.0, 0.0, 1.0),
            (3.0, 3.5, -2.0, 0.5),
            (0.0, f64::INFINITY, -1.5, 1.0),
        ];
        for &(lo, hi, mean, sd) in &cases {
            for _ in 0..500 {
                let x = sample(&mut rng, lo, hi, mean, sd).unwrap();
                assert!(x >= lo && x <= hi, "{x} outside [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn test_far_tail_falls_back() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        for _ in 0..100 {
            let x = sample(&mut rng, 60.0, f64::INFINITY, 0.0, 1.0).unwrap();
            assert!(x >= 60.0 && x < 61.0, "tail draw {x}");
            let y = sample(&mut rng, f64::NEG_INFINITY, -60.0, 0.0, 1.0).unwrap();
            assert!(y <= -60.0 && y > -61.0, "tail draw {y}");
        }
    }

    #[test]
    fn test_untruncated_mean() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let n = 20_000;
        let mean: f64 = (0..n)
            .map(|_| sample(&mut rng, f64::NEG_INFINITY, f64::INFINITY, 2.0, 1.0).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean - 2.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn test_half_normal_mean() {
        // E[Z | Z > 0] = sqrt(2/π) ≈ 0.7979
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let n = 20_000;
        let mean: f64 = (0..n)
            .map(|_| sample(&mut rng, 0.0, f64::INFINITY, 0.0, 1.0).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean - 0.7979).abs() < 0.03, "mean {mean}");
    }

    #[test]
    fn test_invalid_arguments() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert!(sample(&mut rng, 0.0, 1.0, 0.0, 0.0).is_err());
        assert!(sample(&mut rng, 2.0, 1.0, 0.0, 1.0).is_err());
    }
}
