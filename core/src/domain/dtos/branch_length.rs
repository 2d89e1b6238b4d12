use super::errors::PhyloError;

use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The raw form of a branch length distribution as found in configuration
/// files.
///
/// ```yaml
/// distribution: exponential
/// scale: 0.1
/// ```
///
/// ```yaml
/// distribution: uniform
/// low: 0.0
/// high: 0.5
/// ```
///
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionParams {
    pub distribution: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

/// Distribution from which every branch length is drawn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "DistributionParams", into = "DistributionParams")]
pub enum BranchLengthDistribution {
    /// Exponential distribution with mean `scale` (rate `1 / scale`).
    Exponential { scale: f64 },

    /// Uniform distribution over `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl BranchLengthDistribution {
    pub fn exponential(scale: f64) -> Result<Self, PhyloError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PhyloError::UnsupportedDistribution(format!(
                "exponential scale must be positive, found {scale}"
            )));
        }

        Ok(Self::Exponential { scale })
    }

    pub fn uniform(low: f64, high: f64) -> Result<Self, PhyloError> {
        if !(low.is_finite() && high.is_finite() && low >= 0.0 && low < high)
        {
            return Err(PhyloError::UnsupportedDistribution(format!(
                "uniform bounds must satisfy 0 <= low < high, \
                found [{low}, {high})"
            )));
        }

        Ok(Self::Uniform { low, high })
    }

    /// Draw one branch length.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Exponential { scale } => match Exp::new(1.0 / scale) {
                Ok(exp) => exp.sample(rng),
                //
                // Constructors reject invalid scales, so this branch is only
                // reachable by building the variant by hand.
                //
                Err(_) => *scale,
            },
            Self::Uniform { low, high } => rng.gen_range(*low..*high),
        }
    }

    /// Log-prior correction for a change of total tree length.
    ///
    /// Under an exponential prior with rate `1 / scale`, the log density of a
    /// tree is `-L / scale` up to a constant, so the ratio between a candidate
    /// and the current tree is `-(L_candidate - L_current) / scale`. The
    /// uniform prior is flat and contributes nothing.
    pub fn log_prior_ratio(
        &self,
        current_length: f64,
        candidate_length: f64,
    ) -> f64 {
        match self {
            Self::Exponential { scale } => {
                -(candidate_length - current_length) / scale
            }
            Self::Uniform { .. } => 0.0,
        }
    }
}

impl TryFrom<DistributionParams> for BranchLengthDistribution {
    type Error = PhyloError;

    fn try_from(params: DistributionParams) -> Result<Self, Self::Error> {
        let missing = |name: &str| {
            PhyloError::UnsupportedDistribution(format!(
                "{} distribution requires the `{name}` parameter",
                params.distribution
            ))
        };

        match params.distribution.to_lowercase().as_str() {
            "exponential" => {
                Self::exponential(params.scale.ok_or_else(|| missing("scale"))?)
            }
            "uniform" => Self::uniform(
                params.low.ok_or_else(|| missing("low"))?,
                params.high.ok_or_else(|| missing("high"))?,
            ),
            other => {
                Err(PhyloError::UnsupportedDistribution(other.to_string()))
            }
        }
    }
}

impl From<BranchLengthDistribution> for DistributionParams {
    fn from(distribution: BranchLengthDistribution) -> Self {
        match distribution {
            BranchLengthDistribution::Exponential { scale } => {
                DistributionParams {
                    distribution: "exponential".to_string(),
                    scale: Some(scale),
                    low: None,
                    high: None,
                }
            }
            BranchLengthDistribution::Uniform { low, high } => {
                DistributionParams {
                    distribution: "uniform".to_string(),
                    scale: None,
                    low: Some(low),
                    high: Some(high),
                }
            }
        }
    }
}

impl Display for BranchLengthDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exponential { scale } => {
                write!(f, "exponential(scale={scale})")
            }
            Self::Uniform { low, high } => write!(f, "uniform({low}, {high})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_parse_exponential_from_yaml() {
        let distribution: BranchLengthDistribution =
            serde_yaml::from_str("distribution: exponential\nscale: 0.1\n")
                .unwrap();

        assert_eq!(
            distribution,
            BranchLengthDistribution::Exponential { scale: 0.1 }
        );
    }

    #[test]
    fn test_parse_uniform_from_json() {
        let distribution: BranchLengthDistribution = serde_json::from_str(
            r#"{"distribution": "uniform", "low": 0.0, "high": 1.0}"#,
        )
        .unwrap();

        assert_eq!(
            distribution,
            BranchLengthDistribution::Uniform {
                low: 0.0,
                high: 1.0
            }
        );
    }

    #[test]
    fn test_unknown_distribution_is_rejected() {
        let params = DistributionParams {
            distribution: "gamma".to_string(),
            scale: Some(1.0),
            low: None,
            high: None,
        };

        assert_eq!(
            BranchLengthDistribution::try_from(params),
            Err(PhyloError::UnsupportedDistribution("gamma".to_string()))
        );

        assert!(serde_yaml::from_str::<BranchLengthDistribution>(
            "distribution: lognormal\nscale: 1.0\n"
        )
        .is_err());
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(BranchLengthDistribution::exponential(0.0).is_err());
        assert!(BranchLengthDistribution::exponential(-1.0).is_err());
        assert!(BranchLengthDistribution::uniform(1.0, 1.0).is_err());
        assert!(BranchLengthDistribution::uniform(-1.0, 1.0).is_err());
    }

    #[test]
    fn test_samples_are_in_support() {
        let mut rng = StdRng::seed_from_u64(3);
        let exponential = BranchLengthDistribution::exponential(0.1).unwrap();
        let uniform = BranchLengthDistribution::uniform(0.2, 0.4).unwrap();

        let mut total = 0.0;
        for _ in 0..5000 {
            let value = exponential.sample(&mut rng);
            assert!(value >= 0.0);
            total += value;

            let value = uniform.sample(&mut rng);
            assert!((0.2..0.4).contains(&value));
        }

        let mean = total / 5000.0;
        assert!((mean - 0.1).abs() < 0.01, "{mean}");
    }

    #[test]
    fn test_log_prior_ratio() {
        let exponential = BranchLengthDistribution::exponential(0.5).unwrap();
        let uniform = BranchLengthDistribution::uniform(0.0, 1.0).unwrap();

        assert!((exponential.log_prior_ratio(1.0, 2.0) + 2.0).abs() < 1e-12);
        assert_eq!(uniform.log_prior_ratio(1.0, 2.0), 0.0);
    }
}
