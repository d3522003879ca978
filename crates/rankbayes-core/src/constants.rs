//! Constants used throughout the crate.

/// Default Cauchy prior scale for the signed-rank and rank-sum tests (1/√2).
pub const DEFAULT_CAUCHY_SCALE: f64 = core::f64::consts::FRAC_1_SQRT_2;

/// Default stretched-beta prior parameter κ for Spearman's rho.
///
/// κ = 1 gives a uniform prior on [-1, 1].
pub const DEFAULT_KAPPA: f64 = 1.0;

// =============================================================================
// Default sampler configuration
// =============================================================================

/// Default number of posterior draws per chain (burn-in included).
pub const DEFAULT_N_SAMPLES: usize = 1_000;

/// Default number of leading draws discarded per chain.
pub const DEFAULT_N_BURNIN: usize = 1;

/// Default number of independent chains.
pub const DEFAULT_N_CHAINS: usize = 5;

/// Default inner Gibbs iterations for the location parameter per draw.
pub const DEFAULT_N_GIBBS_ITERATIONS: usize = 10;

/// R-hat values at or below this are treated as converged.
pub const RHAT_CONVERGENCE_THRESHOLD: f64 = 1.05;

/// Largest |rho| the Spearman sampler will hold.
pub const RHO_BOUND: f64 = 1.0 - 1e-12;

// =============================================================================
// Evidence band thresholds (Jeffreys, as adapted by Lee & Wagenmakers)
// =============================================================================

/// Lower edge of "moderate" evidence.
pub const BF_MODERATE: f64 = 3.0;

/// Lower edge of "strong" evidence.
pub const BF_STRONG: f64 = 10.0;

/// Lower edge of "very strong" evidence.
pub const BF_VERY_STRONG: f64 = 30.0;

/// Lower edge of "extreme" evidence.
pub const BF_EXTREME: f64 = 100.0;

/// Largest sample size for which the exact signed-rank null is enumerated.
pub const EXACT_SIGNED_RANK_MAX_N: usize = 50;
