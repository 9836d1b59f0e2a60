//! Per-quantity default table
//!
//! The builder never invents numbers: every cut range and control-histogram
//! binning comes from a `DefaultTable` handed to it. `DefaultTable::standard()`
//! is the table used by the general-purpose jobs; descriptors may patch it.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    CentralityEstimator, EventQuantity, FilterBit, HistogramBinning, SelectionRange, Toggles,
    TrackQuantity,
};

/// How the number of histogram bins is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinSpec {
    /// Exact bin count
    Fixed(u32),
    /// Bins per unit of the quantity, rounded, at least one bin
    PerUnit(f64),
}

impl BinSpec {
    pub fn bins(&self, low: f64, high: f64) -> u32 {
        match *self {
            BinSpec::Fixed(n) => n,
            BinSpec::PerUnit(density) => {
                let bins = ((high - low) * density).round();
                if bins < 1.0 { 1 } else { bins as u32 }
            }
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        match *self {
            BinSpec::Fixed(0) => Err(ConfigError::InvalidBinning {
                field: field.to_string(),
                reason: "bin count must be at least 1".to_string(),
            }),
            BinSpec::PerUnit(d) if !d.is_finite() || d <= 0.0 => Err(ConfigError::InvalidBinning {
                field: field.to_string(),
                reason: format!("bin density must be positive, got {d}"),
            }),
            _ => Ok(()),
        }
    }
}

/// Default cut range and control-histogram binning of one quantity.
///
/// Cut range and histogram range coincide in the default table; either can be
/// overridden independently afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantityDefaults {
    pub min: f64,
    pub max: f64,
    pub binning: BinSpec,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl QuantityDefaults {
    pub fn new(min: f64, max: f64, binning: BinSpec) -> Self {
        Self {
            min,
            max,
            binning,
            active: true,
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Same binning rule over a different interval
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn selection(&self, field: &str) -> Result<SelectionRange, ConfigError> {
        let mut range = SelectionRange::new(field, self.min, self.max)?;
        range.active = self.active;
        Ok(range)
    }

    pub fn histogram(&self, field: &str) -> Result<HistogramBinning, ConfigError> {
        self.binning.validate(field)?;
        HistogramBinning::new(
            field,
            self.binning.bins(self.min, self.max),
            self.min,
            self.max,
        )
    }
}

/// Complete default table for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultTable {
    pub track: BTreeMap<TrackQuantity, QuantityDefaults>,
    pub event: BTreeMap<EventQuantity, QuantityDefaults>,
    pub filter_bit: FilterBit,
    pub centrality_estimator: CentralityEstimator,
    pub toggles: Toggles,
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DefaultTable {
    /// Table of the general-purpose flow jobs: filter bit 128, V0M centrality,
    /// primary and charged tracks only
    pub fn standard() -> Self {
        Self {
            track: TrackQuantity::ALL
                .iter()
                .map(|&q| (q, standard_track(q)))
                .collect(),
            event: EventQuantity::ALL
                .iter()
                .map(|&q| (q, standard_event(q)))
                .collect(),
            filter_bit: FilterBit(128),
            centrality_estimator: CentralityEstimator::V0M,
            toggles: Toggles::default(),
        }
    }

    /// Table without any quantity entries; callers must fill every quantity
    pub fn empty() -> Self {
        Self {
            track: BTreeMap::new(),
            event: BTreeMap::new(),
            filter_bit: FilterBit(128),
            centrality_estimator: CentralityEstimator::V0M,
            toggles: Toggles::default(),
        }
    }

    pub fn track_defaults(&self, q: TrackQuantity) -> Result<&QuantityDefaults, ConfigError> {
        self.track.get(&q).ok_or_else(|| ConfigError::MissingDefault {
            quantity: format!("track quantity {q}"),
        })
    }

    pub fn event_defaults(&self, q: EventQuantity) -> Result<&QuantityDefaults, ConfigError> {
        self.event.get(&q).ok_or_else(|| ConfigError::MissingDefault {
            quantity: format!("event quantity {q}"),
        })
    }

    #[must_use]
    pub fn with_track(mut self, q: TrackQuantity, defaults: QuantityDefaults) -> Self {
        self.track.insert(q, defaults);
        self
    }

    #[must_use]
    pub fn with_event(mut self, q: EventQuantity, defaults: QuantityDefaults) -> Self {
        self.event.insert(q, defaults);
        self
    }
}

fn standard_track(q: TrackQuantity) -> QuantityDefaults {
    use BinSpec::{Fixed, PerUnit};
    match q {
        TrackQuantity::Pt => QuantityDefaults::new(0.2, 5.0, PerUnit(100.0)),
        TrackQuantity::Phi => QuantityDefaults::new(0.0, TAU, Fixed(360)),
        TrackQuantity::Eta => QuantityDefaults::new(-0.8, 0.8, PerUnit(100.0)),
        TrackQuantity::Charge => QuantityDefaults::new(-2.5, 2.5, PerUnit(1.0)),
        TrackQuantity::TpcNcls => QuantityDefaults::new(60.0, 159.0, PerUnit(1.0)),
        // not applied unless a job switches it on
        TrackQuantity::TpcCrossedRows => QuantityDefaults::new(70.0, 159.0, PerUnit(1.0)).inactive(),
        TrackQuantity::ItsNcls => QuantityDefaults::new(0.0, 10.0, PerUnit(1.0)),
        TrackQuantity::Chi2PerNdf => QuantityDefaults::new(0.9, 4.5, PerUnit(100.0)),
        TrackQuantity::DcaZ => QuantityDefaults::new(-3.2, 3.2, PerUnit(10.0)),
        TrackQuantity::DcaXy => QuantityDefaults::new(-2.4, 2.4, PerUnit(10.0)),
    }
}

fn standard_event(q: EventQuantity) -> QuantityDefaults {
    use BinSpec::PerUnit;
    match q {
        EventQuantity::Mul => QuantityDefaults::new(0.0, 10_000.0, PerUnit(0.1)),
        EventQuantity::MulQ => QuantityDefaults::new(2.0, 3_000.0, PerUnit(0.1)),
        EventQuantity::MulW => QuantityDefaults::new(2.0, 3_000.0, PerUnit(0.1)),
        // reference multiplicity is -999 in simulated data
        EventQuantity::MulRef => QuantityDefaults::new(2.0, 3_000.0, PerUnit(0.1)),
        EventQuantity::NContrib => QuantityDefaults::new(0.0, 3_000.0, PerUnit(0.1)),
        // range replaced by the job's centrality window
        EventQuantity::Cen => QuantityDefaults::new(0.0, 100.0, PerUnit(1.0)),
        EventQuantity::X | EventQuantity::Y | EventQuantity::Z => {
            QuantityDefaults::new(-10.0, 10.0, PerUnit(10.0))
        }
        EventQuantity::VPos => QuantityDefaults::new(1e-6, 18.0, PerUnit(100.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_quantity() {
        let table = DefaultTable::standard();
        for q in TrackQuantity::ALL {
            assert!(table.track_defaults(q).is_ok(), "missing {q}");
        }
        for q in EventQuantity::ALL {
            assert!(table.event_defaults(q).is_ok(), "missing {q}");
        }
    }

    #[test]
    fn per_unit_binning_rounds() {
        // (5.0 - 0.2) * 100 is 479.99999... in floating point
        assert_eq!(BinSpec::PerUnit(100.0).bins(0.2, 5.0), 480);
        assert_eq!(BinSpec::PerUnit(0.1).bins(2.0, 3000.0), 300);
        assert_eq!(BinSpec::PerUnit(1.0).bins(5.0, 5.0), 1);
    }

    #[test]
    fn zero_density_is_rejected() {
        let defaults = QuantityDefaults::new(0.0, 1.0, BinSpec::PerUnit(0.0));
        assert!(defaults.histogram("PT").is_err());
    }

    #[test]
    fn empty_table_reports_missing_quantity() {
        let err = DefaultTable::empty()
            .track_defaults(TrackQuantity::DcaZ)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingDefault {
                quantity: "track quantity DCAZ".to_string()
            }
        );
    }
}
