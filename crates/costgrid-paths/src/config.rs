//! Facade configuration: method selection and slope policy.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How traversal cost is derived from the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// The grid holds per-cell traversal cost; moving between neighbours
    /// costs the mean of both cells times the step length.
    #[default]
    Omnidirectional,
    /// The grid holds elevation; moving between neighbours costs the
    /// absolute elevation change, scaled for diagonals.
    Directional,
}

impl Method {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Omnidirectional => "omnidirectional",
            Self::Directional => "directional",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omnidirectional" => Ok(Self::Omnidirectional),
            "directional" => Ok(Self::Directional),
            _ => Err(Error::UnknownMethod(s.to_owned())),
        }
    }
}

/// Which elevation changes a directional edge may follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlopePolicy {
    /// Every neighbour move is allowed.
    #[default]
    Unrestricted,
    /// Moves to a lower neighbour are dropped.
    UphillOnly,
    /// Moves to a higher neighbour are dropped.
    DownhillOnly,
}

impl SlopePolicy {
    /// Build a policy from the two enforcement flags. Setting both is a
    /// configuration error.
    pub fn from_flags(enforce_uphill: bool, enforce_downhill: bool) -> Result<Self, Error> {
        match (enforce_uphill, enforce_downhill) {
            (false, false) => Ok(Self::Unrestricted),
            (true, false) => Ok(Self::UphillOnly),
            (false, true) => Ok(Self::DownhillOnly),
            (true, true) => Err(Error::ConflictingSlopePolicy),
        }
    }

    #[inline]
    pub const fn enforce_uphill(self) -> bool {
        matches!(self, Self::UphillOnly)
    }

    #[inline]
    pub const fn enforce_downhill(self) -> bool {
        matches!(self, Self::DownhillOnly)
    }

    /// Whether an edge with elevation change `delta` (destination minus
    /// origin) is kept. Level moves are always kept.
    #[inline]
    pub fn admits(self, delta: f64) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::UphillOnly => delta >= 0.0,
            Self::DownhillOnly => delta <= 0.0,
        }
    }
}

/// Settings for a [`CostDistance`](crate::CostDistance) facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostDistanceConfig {
    pub method: Method,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slope: SlopePolicy,
}

impl CostDistanceConfig {
    /// Grid-native cost surface, no slope restriction.
    pub const fn omnidirectional() -> Self {
        Self {
            method: Method::Omnidirectional,
            slope: SlopePolicy::Unrestricted,
        }
    }

    /// Elevation-derived directional graph with the given slope policy.
    pub const fn directional(slope: SlopePolicy) -> Self {
        Self {
            method: Method::Directional,
            slope,
        }
    }

    /// Reject slope restrictions on the omnidirectional method, which has no
    /// notion of uphill or downhill.
    pub fn validate(&self) -> Result<(), Error> {
        if self.method == Method::Omnidirectional && self.slope != SlopePolicy::Unrestricted {
            return Err(Error::SlopePolicyNeedsDirectional { policy: self.slope });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_known_names() {
        assert_eq!("omnidirectional".parse::<Method>(), Ok(Method::Omnidirectional));
        assert_eq!(" Directional ".parse::<Method>(), Ok(Method::Directional));
        assert_eq!(
            "diagonal".parse::<Method>(),
            Err(Error::UnknownMethod("diagonal".into()))
        );
        assert_eq!(Method::Directional.to_string(), "directional");
    }

    #[test]
    fn slope_flags() {
        assert_eq!(SlopePolicy::from_flags(false, false), Ok(SlopePolicy::Unrestricted));
        assert_eq!(SlopePolicy::from_flags(true, false), Ok(SlopePolicy::UphillOnly));
        assert_eq!(SlopePolicy::from_flags(false, true), Ok(SlopePolicy::DownhillOnly));
        assert_eq!(
            SlopePolicy::from_flags(true, true),
            Err(Error::ConflictingSlopePolicy)
        );
        assert!(SlopePolicy::UphillOnly.enforce_uphill());
        assert!(!SlopePolicy::UphillOnly.enforce_downhill());
    }

    #[test]
    fn slope_admits() {
        assert!(SlopePolicy::Unrestricted.admits(-3.0));
        assert!(SlopePolicy::UphillOnly.admits(2.0));
        assert!(SlopePolicy::UphillOnly.admits(0.0));
        assert!(!SlopePolicy::UphillOnly.admits(-0.5));
        assert!(SlopePolicy::DownhillOnly.admits(-0.5));
        assert!(SlopePolicy::DownhillOnly.admits(0.0));
        assert!(!SlopePolicy::DownhillOnly.admits(2.0));
    }

    #[test]
    fn validate_rejects_slope_on_omnidirectional() {
        assert!(CostDistanceConfig::default().validate().is_ok());
        assert!(
            CostDistanceConfig::directional(SlopePolicy::DownhillOnly)
                .validate()
                .is_ok()
        );
        let bad = CostDistanceConfig {
            method: Method::Omnidirectional,
            slope: SlopePolicy::UphillOnly,
        };
        assert_eq!(
            bad.validate(),
            Err(Error::SlopePolicyNeedsDirectional {
                policy: SlopePolicy::UphillOnly
            })
        );
    }
}
