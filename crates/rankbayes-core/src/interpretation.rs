//! Verbal evidence categories for Bayes factors.
//!
//! Bands follow Jeffreys' scale as popularised by Lee & Wagenmakers:
//! cut points at 1, 3, 10, 30 and 100 for H1, mirrored at their
//! reciprocals for H0. A BF10 and its reciprocal always land in mirrored
//! bands of equal strength.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BF_EXTREME, BF_MODERATE, BF_STRONG, BF_VERY_STRONG};

/// Hypothesis favoured by a Bayes factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hypothesis {
    /// The parameter is zero.
    H0,
    /// The parameter is free.
    H1,
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hypothesis::H0 => write!(f, "H0"),
            Hypothesis::H1 => write!(f, "H1"),
        }
    }
}

/// Strength of evidence, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceStrength {
    /// BF exactly 1.
    None,
    /// Between 1 and 3 (or 1/3 and 1).
    Anecdotal,
    /// 3 to 10.
    Moderate,
    /// 10 to 30.
    Strong,
    /// 30 to 100.
    VeryStrong,
    /// 100 or more.
    Extreme,
}

impl EvidenceStrength {
    /// Lowercase label, e.g. "very strong".
    pub fn label(&self) -> &'static str {
        match self {
            EvidenceStrength::None => "no",
            EvidenceStrength::Anecdotal => "anecdotal",
            EvidenceStrength::Moderate => "moderate",
            EvidenceStrength::Strong => "strong",
            EvidenceStrength::VeryStrong => "very strong",
            EvidenceStrength::Extreme => "extreme",
        }
    }
}

/// Evidence band of a Bayes factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// How strong the evidence is.
    pub strength: EvidenceStrength,
    /// Which hypothesis it favours; `None` when BF10 = 1.
    pub favours: Option<Hypothesis>,
}

impl Evidence {
    /// Classify BF10.
    ///
    /// | BF10          | band                |
    /// |---------------|---------------------|
    /// | ≥ 100         | extreme, H1         |
    /// | [30, 100)     | very strong, H1     |
    /// | [10, 30)      | strong, H1          |
    /// | [3, 10)       | moderate, H1        |
    /// | (1, 3)        | anecdotal, H1       |
    /// | 1             | none                |
    /// | (1/3, 1)      | anecdotal, H0       |
    /// | (1/10, 1/3]   | moderate, H0        |
    /// | (1/30, 1/10]  | strong, H0          |
    /// | (1/100, 1/30] | very strong, H0     |
    /// | ≤ 1/100       | extreme, H0         |
    ///
    /// NaN has no direction and is reported as no evidence.
    pub fn from_bf10(bf10: f64) -> Self {
        if bf10 > 1.0 {
            let strength = if bf10 >= BF_EXTREME {
                EvidenceStrength::Extreme
            } else if bf10 >= BF_VERY_STRONG {
                EvidenceStrength::VeryStrong
            } else if bf10 >= BF_STRONG {
                EvidenceStrength::Strong
            } else if bf10 >= BF_MODERATE {
                EvidenceStrength::Moderate
            } else {
                EvidenceStrength::Anecdotal
            };
            Self::favouring(strength, Hypothesis::H1)
        } else if bf10 < 1.0 {
            let strength = if bf10 <= 1.0 / BF_EXTREME {
                EvidenceStrength::Extreme
            } else if bf10 <= 1.0 / BF_VERY_STRONG {
                EvidenceStrength::VeryStrong
            } else if bf10 <= 1.0 / BF_STRONG {
                EvidenceStrength::Strong
            } else if bf10 <= 1.0 / BF_MODERATE {
                EvidenceStrength::Moderate
            } else {
                EvidenceStrength::Anecdotal
            };
            Self::favouring(strength, Hypothesis::H0)
        } else {
            Self {
                strength: EvidenceStrength::None,
                favours: None,
            }
        }
    }

    fn favouring(strength: EvidenceStrength, hypothesis: Hypothesis) -> Self {
        Self {
            strength,
            favours: Some(hypothesis),
        }
    }

    /// The band seen from the other hypothesis.
    pub fn mirrored(&self) -> Self {
        Self {
            strength: self.strength,
            favours: self.favours.map(|h| match h {
                Hypothesis::H0 => Hypothesis::H1,
                Hypothesis::H1 => Hypothesis::H0,
            }),
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.favours {
            Some(h) => write!(f, "{} evidence for {}", self.strength.label(), h),
            None => write!(f, "no evidence"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(bf: f64) -> String {
        Evidence::from_bf10(bf).to_string()
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(band(15.0), "strong evidence for H1");
        assert_eq!(band(0.05), "strong evidence for H0");
    }

    #[test]
    fn test_h1_boundaries_are_lower_inclusive() {
        assert_eq!(band(100.0), "extreme evidence for H1");
        assert_eq!(band(99.999), "very strong evidence for H1");
        assert_eq!(band(30.0), "very strong evidence for H1");
        assert_eq!(band(29.999), "strong evidence for H1");
        assert_eq!(band(10.0), "strong evidence for H1");
        assert_eq!(band(9.999), "moderate evidence for H1");
        assert_eq!(band(3.0), "moderate evidence for H1");
        assert_eq!(band(2.999), "anecdotal evidence for H1");
        assert_eq!(band(1.0001), "anecdotal evidence for H1");
    }

    #[test]
    fn test_exactly_one() {
        assert_eq!(band(1.0), "no evidence");
        assert_eq!(Evidence::from_bf10(1.0).favours, None);
    }

    #[test]
    fn test_h0_boundaries_mirror_h1() {
        assert_eq!(band(0.9999), "anecdotal evidence for H0");
        assert_eq!(band(1.0 / 3.0), "moderate evidence for H0");
        assert_eq!(band(1.0 / 2.999), "anecdotal evidence for H0");
        assert_eq!(band(1.0 / 10.0), "strong evidence for H0");
        assert_eq!(band(1.0 / 9.999), "moderate evidence for H0");
        assert_eq!(band(1.0 / 30.0), "very strong evidence for H0");
        assert_eq!(band(1.0 / 29.999), "strong evidence for H0");
        assert_eq!(band(1.0 / 100.0), "extreme evidence for H0");
        assert_eq!(band(1.0 / 99.999), "very strong evidence for H0");
    }

    #[test]
    fn test_reciprocal_is_mirrored() {
        for &bf in &[1.5, 2.2, 4.0, 7.5, 12.0, 25.0, 42.0, 80.0, 250.0, 1e6] {
            let forward = Evidence::from_bf10(bf);
            let backward = Evidence::from_bf10(1.0 / bf);
            assert_eq!(forward.mirrored(), backward, "bf = {bf}");
        }
    }

    #[test]
    fn test_limits() {
        assert_eq!(band(f64::INFINITY), "extreme evidence for H1");
        assert_eq!(band(0.0), "extreme evidence for H0");
        assert_eq!(band(f64::NAN), "no evidence");
    }

    #[test]
    fn test_strength_ordering() {
        assert!(EvidenceStrength::Extreme > EvidenceStrength::VeryStrong);
        assert!(EvidenceStrength::Anecdotal > EvidenceStrength::None);
    }
}
