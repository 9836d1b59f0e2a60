//! Closed universes of track quantities, event quantities and estimators
//!
//! Textual names match the enumerator names used by the analysis task
//! (`PT`, `DCAXY`, `V0M`, ...). Parsing anything else is a configuration error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownIdentifier;

/// Per-track observables that can be cut on and histogrammed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackQuantity {
    /// Transverse momentum
    Pt,
    /// Azimuthal angle
    Phi,
    /// Pseudorapidity
    Eta,
    Charge,
    /// Number of TPC clusters
    TpcNcls,
    /// Number of crossed TPC pad rows
    TpcCrossedRows,
    /// Number of ITS clusters
    ItsNcls,
    /// Chi2 per degree of freedom of the track fit
    Chi2PerNdf,
    /// Distance of closest approach along the beam axis
    DcaZ,
    /// Distance of closest approach in the transverse plane
    DcaXy,
}

impl TrackQuantity {
    pub const ALL: [TrackQuantity; 10] = [
        TrackQuantity::Pt,
        TrackQuantity::Phi,
        TrackQuantity::Eta,
        TrackQuantity::Charge,
        TrackQuantity::TpcNcls,
        TrackQuantity::TpcCrossedRows,
        TrackQuantity::ItsNcls,
        TrackQuantity::Chi2PerNdf,
        TrackQuantity::DcaZ,
        TrackQuantity::DcaXy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrackQuantity::Pt => "PT",
            TrackQuantity::Phi => "PHI",
            TrackQuantity::Eta => "ETA",
            TrackQuantity::Charge => "CHARGE",
            TrackQuantity::TpcNcls => "TPCNCLS",
            TrackQuantity::TpcCrossedRows => "TPCCROSSEDROWS",
            TrackQuantity::ItsNcls => "ITSNCLS",
            TrackQuantity::Chi2PerNdf => "CHI2PERNDF",
            TrackQuantity::DcaZ => "DCAZ",
            TrackQuantity::DcaXy => "DCAXY",
        }
    }
}

/// Per-event observables that can be cut on and histogrammed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventQuantity {
    /// Number of tracks in the event
    Mul,
    /// Number of tracks surviving the track cuts
    MulQ,
    /// Sum of particle weights
    MulW,
    /// Reference multiplicity from the event header
    MulRef,
    /// Number of contributors to the primary vertex
    NContrib,
    /// Centrality percentile of the chosen estimator
    Cen,
    X,
    Y,
    Z,
    /// Distance of the primary vertex from the origin
    VPos,
}

impl EventQuantity {
    pub const ALL: [EventQuantity; 10] = [
        EventQuantity::Mul,
        EventQuantity::MulQ,
        EventQuantity::MulW,
        EventQuantity::MulRef,
        EventQuantity::NContrib,
        EventQuantity::Cen,
        EventQuantity::X,
        EventQuantity::Y,
        EventQuantity::Z,
        EventQuantity::VPos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventQuantity::Mul => "MUL",
            EventQuantity::MulQ => "MULQ",
            EventQuantity::MulW => "MULW",
            EventQuantity::MulRef => "MULREF",
            EventQuantity::NContrib => "NCONTRIB",
            EventQuantity::Cen => "CEN",
            EventQuantity::X => "X",
            EventQuantity::Y => "Y",
            EventQuantity::Z => "Z",
            EventQuantity::VPos => "VPOS",
        }
    }
}

/// Either kind of quantity, for overrides that may target tracks or events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Track(TrackQuantity),
    Event(EventQuantity),
}

impl Quantity {
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Track(q) => q.name(),
            Quantity::Event(q) => q.name(),
        }
    }
}

impl From<TrackQuantity> for Quantity {
    fn from(q: TrackQuantity) -> Self {
        Quantity::Track(q)
    }
}

impl From<EventQuantity> for Quantity {
    fn from(q: EventQuantity) -> Self {
        Quantity::Event(q)
    }
}

/// Detector-specific ways of measuring centrality
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CentralityEstimator {
    V0M,
    CL0,
    CL1,
    SpdTracklets,
}

impl CentralityEstimator {
    pub const ALL: [CentralityEstimator; 4] = [
        CentralityEstimator::V0M,
        CentralityEstimator::CL0,
        CentralityEstimator::CL1,
        CentralityEstimator::SpdTracklets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CentralityEstimator::V0M => "V0M",
            CentralityEstimator::CL0 => "CL0",
            CentralityEstimator::CL1 => "CL1",
            CentralityEstimator::SpdTracklets => "SPDTRACKLETS",
        }
    }
}

/// Ways of counting event multiplicity. Each one is also an event quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum MultiplicityEstimator {
    Mul,
    MulQ,
    MulW,
    MulRef,
    NContrib,
}

impl MultiplicityEstimator {
    pub const ALL: [MultiplicityEstimator; 5] = [
        MultiplicityEstimator::Mul,
        MultiplicityEstimator::MulQ,
        MultiplicityEstimator::MulW,
        MultiplicityEstimator::MulRef,
        MultiplicityEstimator::NContrib,
    ];

    /// The event quantity whose binning this estimator shares
    pub fn quantity(self) -> EventQuantity {
        match self {
            MultiplicityEstimator::Mul => EventQuantity::Mul,
            MultiplicityEstimator::MulQ => EventQuantity::MulQ,
            MultiplicityEstimator::MulW => EventQuantity::MulW,
            MultiplicityEstimator::MulRef => EventQuantity::MulRef,
            MultiplicityEstimator::NContrib => EventQuantity::NContrib,
        }
    }

    pub fn name(self) -> &'static str {
        self.quantity().name()
    }
}

// ============================================================================
// Textual identifiers
// ============================================================================

fn lookup<T: Copy>(
    all: &[T],
    name: impl Fn(T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T, UnknownIdentifier> {
    let wanted = s.trim();
    all.iter()
        .copied()
        .find(|&v| name(v).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnknownIdentifier::new(kind, s))
}

impl FromStr for TrackQuantity {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::name, "track quantity", s)
    }
}

impl FromStr for EventQuantity {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::name, "event quantity", s)
    }
}

impl FromStr for Quantity {
    type Err = UnknownIdentifier;

    /// Track and event names are disjoint, so the lookup is unambiguous
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<TrackQuantity>()
            .map(Quantity::Track)
            .or_else(|_| s.parse::<EventQuantity>().map(Quantity::Event))
            .map_err(|_| UnknownIdentifier::new("quantity", s))
    }
}

impl FromStr for CentralityEstimator {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::name, "centrality estimator", s)
    }
}

impl FromStr for MultiplicityEstimator {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::name, "multiplicity estimator", s)
    }
}

impl fmt::Display for TrackQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for EventQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for CentralityEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MultiplicityEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for q in TrackQuantity::ALL {
            assert_eq!(q.name().parse::<TrackQuantity>(), Ok(q));
        }
        for q in EventQuantity::ALL {
            assert_eq!(q.name().parse::<EventQuantity>(), Ok(q));
        }
        for e in CentralityEstimator::ALL {
            assert_eq!(e.name().parse::<CentralityEstimator>(), Ok(e));
        }
    }

    #[test]
    fn track_and_event_names_are_disjoint() {
        for t in TrackQuantity::ALL {
            assert!(t.name().parse::<EventQuantity>().is_err());
        }
        assert_eq!("dcaxy".parse::<Quantity>(), Ok(Quantity::Track(TrackQuantity::DcaXy)));
        assert_eq!(" Z ".parse::<Quantity>(), Ok(Quantity::Event(EventQuantity::Z)));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "DCA".parse::<Quantity>().unwrap_err();
        assert_eq!(err.kind, "quantity");
        assert_eq!(err.value, "DCA");
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&TrackQuantity::Chi2PerNdf).unwrap();
        assert_eq!(json, "\"CHI2PERNDF\"");
        let json = serde_json::to_string(&CentralityEstimator::SpdTracklets).unwrap();
        assert_eq!(json, "\"SPDTRACKLETS\"");
    }
}
