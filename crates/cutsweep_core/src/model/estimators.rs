//! Estimator families and unordered estimator pairs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::quantities::{CentralityEstimator, MultiplicityEstimator};
use crate::error::{ConfigError, UnknownIdentifier};

/// Which physical quantity a group of estimators measures
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorFamily {
    Centrality,
    Multiplicity,
}

impl EstimatorFamily {
    pub fn name(self) -> &'static str {
        match self {
            EstimatorFamily::Centrality => "centrality",
            EstimatorFamily::Multiplicity => "multiplicity",
        }
    }

    /// Every unordered pair of distinct estimators in this family, in
    /// enumeration order
    pub fn pairs(self) -> Vec<EstimatorPair> {
        let members: Vec<Estimator> = match self {
            EstimatorFamily::Centrality => CentralityEstimator::ALL
                .iter()
                .copied()
                .map(Estimator::Centrality)
                .collect(),
            EstimatorFamily::Multiplicity => MultiplicityEstimator::ALL
                .iter()
                .copied()
                .map(Estimator::Multiplicity)
                .collect(),
        };

        let mut pairs = Vec::with_capacity(members.len() * (members.len() - 1) / 2);
        for (i, &first) in members.iter().enumerate() {
            for &second in &members[i + 1..] {
                pairs.push(EstimatorPair { first, second });
            }
        }
        pairs
    }
}

impl FromStr for EstimatorFamily {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centrality" | "cen" => Ok(EstimatorFamily::Centrality),
            "multiplicity" | "mul" => Ok(EstimatorFamily::Multiplicity),
            _ => Err(UnknownIdentifier::new("estimator family", s)),
        }
    }
}

impl fmt::Display for EstimatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single estimator from either family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Estimator {
    Centrality(CentralityEstimator),
    Multiplicity(MultiplicityEstimator),
}

impl Estimator {
    pub fn family(self) -> EstimatorFamily {
        match self {
            Estimator::Centrality(_) => EstimatorFamily::Centrality,
            Estimator::Multiplicity(_) => EstimatorFamily::Multiplicity,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Estimator::Centrality(e) => e.name(),
            Estimator::Multiplicity(e) => e.name(),
        }
    }
}

impl From<CentralityEstimator> for Estimator {
    fn from(e: CentralityEstimator) -> Self {
        Estimator::Centrality(e)
    }
}

impl From<MultiplicityEstimator> for Estimator {
    fn from(e: MultiplicityEstimator) -> Self {
        Estimator::Multiplicity(e)
    }
}

impl FromStr for Estimator {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<CentralityEstimator>()
            .map(Estimator::Centrality)
            .or_else(|_| s.parse::<MultiplicityEstimator>().map(Estimator::Multiplicity))
            .map_err(|_| UnknownIdentifier::new("estimator", s))
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered pair of two distinct estimators of the same family.
///
/// Stored normalized (`first < second`), so `(a, b)` and `(b, a)` are the same
/// key. Serialized as `"FIRST-SECOND"` so it can key maps in JSON and YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EstimatorPair {
    first: Estimator,
    second: Estimator,
}

impl EstimatorPair {
    pub fn new(a: impl Into<Estimator>, b: impl Into<Estimator>) -> Result<Self, ConfigError> {
        let (a, b) = (a.into(), b.into());
        if a.family() != b.family() {
            return Err(ConfigError::InvalidEstimatorPair {
                first: a.to_string(),
                second: b.to_string(),
                reason: "estimators belong to different families",
            });
        }
        if a == b {
            return Err(ConfigError::InvalidEstimatorPair {
                first: a.to_string(),
                second: b.to_string(),
                reason: "an estimator cannot be correlated with itself",
            });
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> Estimator {
        self.first
    }

    pub fn second(&self) -> Estimator {
        self.second
    }

    pub fn family(&self) -> EstimatorFamily {
        self.first.family()
    }

    /// Parse `"A-B"`, reporting unknown names and invalid pairs under `field`
    pub fn parse_field(field: &str, s: &str) -> Result<Self, ConfigError> {
        let (a, b) = s
            .split_once(['-', '/', ','])
            .ok_or_else(|| ConfigError::unknown(field, UnknownIdentifier::new("estimator pair", s)))?;
        let a = a.parse::<Estimator>().map_err(|e| ConfigError::unknown(field, e))?;
        let b = b.parse::<Estimator>().map_err(|e| ConfigError::unknown(field, e))?;
        Self::new(a, b).map_err(|e| e.in_field(field))
    }
}

impl fmt::Display for EstimatorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

impl From<EstimatorPair> for String {
    fn from(pair: EstimatorPair) -> Self {
        pair.to_string()
    }
}

impl TryFrom<String> for EstimatorPair {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_field("estimator pair", &s)
    }
}
