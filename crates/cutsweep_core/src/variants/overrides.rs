//! Typed overrides and their textual form
//!
//! An `Override` replaces exactly one field (or one family of correlation
//! cuts) of an `AnalysisConfiguration`. Overrides are always applied to a
//! clone, and the clone is only returned once every override in the list
//! succeeded and the result validates.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    AnalysisConfiguration, CentralityEstimator, CorrelationCut, EstimatorFamily, EstimatorPair,
    FilterBit, HistogramBinning, Quantity, SelectionRange, Toggle,
};

/// A single field replacement
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    SetCorrelationCut {
        pair: EstimatorPair,
        cut: CorrelationCut,
    },
    ClearCorrelationCut(EstimatorPair),
    /// Same cut for every pair of the family
    SetFamilyCorrelationCut {
        family: EstimatorFamily,
        cut: CorrelationCut,
    },
    ClearFamilyCorrelationCuts(EstimatorFamily),
    SetSelectionRange {
        quantity: Quantity,
        min: f64,
        max: f64,
    },
    /// Keep the range but stop applying it
    DisableSelection(Quantity),
    SetCentralityEstimator(CentralityEstimator),
    SetTrackFilter(FilterBit),
    SetHistogramBinning {
        quantity: Quantity,
        binning: HistogramBinning,
    },
    SetToggle {
        toggle: Toggle,
        value: bool,
    },
}

impl Override {
    /// Path of the field this override writes, as reported in errors and diffs
    pub fn field(&self) -> String {
        match self {
            Override::SetCorrelationCut { pair, .. } | Override::ClearCorrelationCut(pair) => {
                format!("correlation_cuts.{pair}")
            }
            Override::SetFamilyCorrelationCut { family, .. }
            | Override::ClearFamilyCorrelationCuts(family) => {
                format!("correlation_cuts.{family}")
            }
            Override::SetSelectionRange { quantity, .. } | Override::DisableSelection(quantity) => {
                cut_field(*quantity)
            }
            Override::SetCentralityEstimator(_) => "centrality_estimator".to_string(),
            Override::SetTrackFilter(_) => "filter_bit".to_string(),
            Override::SetHistogramBinning { quantity, .. } => match quantity {
                Quantity::Track(q) => format!("track_histograms.{q}"),
                Quantity::Event(q) => format!("event_histograms.{q}"),
            },
            Override::SetToggle { toggle, .. } => format!("toggles.{}", toggle.name()),
        }
    }

    fn apply(&self, config: &mut AnalysisConfiguration) -> Result<(), ConfigError> {
        match self {
            Override::SetCorrelationCut { pair, cut } => {
                cut.validate(pair.to_string())?;
                config.correlation_cuts.insert(*pair, *cut);
            }
            Override::ClearCorrelationCut(pair) => {
                config.correlation_cuts.remove(pair);
            }
            Override::SetFamilyCorrelationCut { family, cut } => {
                for pair in family.pairs() {
                    cut.validate(pair.to_string())?;
                    config.correlation_cuts.insert(pair, *cut);
                }
            }
            Override::ClearFamilyCorrelationCuts(family) => {
                config
                    .correlation_cuts
                    .retain(|pair, _| pair.family() != *family);
            }
            Override::SetSelectionRange { quantity, min, max } => {
                let range = SelectionRange::new(self.field(), *min, *max)?;
                match quantity {
                    Quantity::Track(q) => config.track_cuts.insert(*q, range),
                    Quantity::Event(q) => config.event_cuts.insert(*q, range),
                };
            }
            Override::DisableSelection(quantity) => {
                let range = match quantity {
                    Quantity::Track(q) => config.track_cuts.get_mut(q),
                    Quantity::Event(q) => config.event_cuts.get_mut(q),
                };
                let range = range.ok_or_else(|| ConfigError::MissingDefault {
                    quantity: self.field(),
                })?;
                range.active = false;
            }
            Override::SetCentralityEstimator(estimator) => {
                config.centrality_estimator = *estimator;
            }
            Override::SetTrackFilter(bit) => config.filter_bit = *bit,
            Override::SetHistogramBinning { quantity, binning } => {
                binning.validate(self.field())?;
                match quantity {
                    Quantity::Track(q) => config.track_histograms.insert(*q, *binning),
                    Quantity::Event(q) => config.event_histograms.insert(*q, *binning),
                };
            }
            Override::SetToggle { toggle, value } => config.toggles.set(*toggle, *value),
        }
        Ok(())
    }
}

fn cut_field(quantity: Quantity) -> String {
    match quantity {
        Quantity::Track(q) => format!("track_cuts.{q}"),
        Quantity::Event(q) => format!("event_cuts.{q}"),
    }
}

impl AnalysisConfiguration {
    /// Clone this configuration and apply `overrides` in order.
    ///
    /// Name and lineage are kept. On error `self` is untouched and no partial
    /// result escapes.
    pub fn with_overrides(&self, overrides: &[Override]) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        for o in overrides {
            o.apply(&mut config)?;
        }
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Textual Overrides
// =============================================================================

/// Override as written in a descriptor document.
///
/// Identifiers are plain strings and are resolved, case-insensitively, by
/// [`OverrideSpec::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideSpec {
    SetCorrelationCut {
        pair: String,
        slope: f64,
        offset: f64,
    },
    ClearCorrelationCut {
        pair: String,
    },
    SetFamilyCorrelationCut {
        family: String,
        slope: f64,
        offset: f64,
    },
    ClearFamilyCorrelationCuts {
        family: String,
    },
    SetSelectionRange {
        quantity: String,
        min: f64,
        max: f64,
    },
    DisableSelection {
        quantity: String,
    },
    SetCentralityEstimator {
        estimator: String,
    },
    SetTrackFilter {
        filter_bit: u32,
    },
    SetHistogramBinning {
        quantity: String,
        bins: u32,
        low: f64,
        high: f64,
    },
    SetToggle {
        toggle: String,
        value: bool,
    },
}

impl OverrideSpec {
    /// Resolve identifiers into a typed override
    pub fn resolve(&self) -> Result<Override, ConfigError> {
        let resolved = match self {
            OverrideSpec::SetCorrelationCut {
                pair,
                slope,
                offset,
            } => Override::SetCorrelationCut {
                pair: EstimatorPair::parse_field("correlation_cuts", pair)?,
                cut: CorrelationCut::new(*slope, *offset),
            },
            OverrideSpec::ClearCorrelationCut { pair } => {
                Override::ClearCorrelationCut(EstimatorPair::parse_field("correlation_cuts", pair)?)
            }
            OverrideSpec::SetFamilyCorrelationCut {
                family,
                slope,
                offset,
            } => Override::SetFamilyCorrelationCut {
                family: parse_family(family)?,
                cut: CorrelationCut::new(*slope, *offset),
            },
            OverrideSpec::ClearFamilyCorrelationCuts { family } => {
                Override::ClearFamilyCorrelationCuts(parse_family(family)?)
            }
            OverrideSpec::SetSelectionRange { quantity, min, max } => {
                Override::SetSelectionRange {
                    quantity: parse_quantity("selection range", quantity)?,
                    min: *min,
                    max: *max,
                }
            }
            OverrideSpec::DisableSelection { quantity } => {
                Override::DisableSelection(parse_quantity("selection range", quantity)?)
            }
            OverrideSpec::SetCentralityEstimator { estimator } => {
                Override::SetCentralityEstimator(
                    estimator
                        .parse::<CentralityEstimator>()
                        .map_err(|e| ConfigError::unknown("centrality_estimator", e))?,
                )
            }
            OverrideSpec::SetTrackFilter { filter_bit } => {
                Override::SetTrackFilter(FilterBit(*filter_bit))
            }
            OverrideSpec::SetHistogramBinning {
                quantity,
                bins,
                low,
                high,
            } => Override::SetHistogramBinning {
                quantity: parse_quantity("histogram binning", quantity)?,
                binning: HistogramBinning {
                    bins: *bins,
                    low: *low,
                    high: *high,
                },
            },
            OverrideSpec::SetToggle { toggle, value } => Override::SetToggle {
                toggle: toggle
                    .parse::<Toggle>()
                    .map_err(|e| ConfigError::unknown("toggles", e))?,
                value: *value,
            },
        };
        Ok(resolved)
    }
}

fn parse_family(s: &str) -> Result<EstimatorFamily, ConfigError> {
    s.parse::<EstimatorFamily>()
        .map_err(|e| ConfigError::unknown("correlation_cuts", e))
}

fn parse_quantity(field: &str, s: &str) -> Result<Quantity, ConfigError> {
    s.parse::<Quantity>()
        .map_err(|e| ConfigError::unknown(field, e))
}
