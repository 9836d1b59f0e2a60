use serde::{Deserialize, Serialize};

use super::overrides::{Override, OverrideSpec};
use crate::error::ConfigError;
use crate::model::{
    CentralityEstimator, CorrelationCut, EstimatorFamily, EstimatorPair, FilterBit,
    HistogramBinning, Quantity, Toggle,
};

/// One named deviation from a source configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDefinition {
    /// Appended to the source name with `_`
    pub suffix: String,
    /// Suffix of an earlier variant to derive from; `None` derives from the
    /// baseline
    pub source: Option<String>,
    /// Applied in order, last write wins
    pub overrides: Vec<Override>,
}

/// Fluent construction of a [`VariantDefinition`]
///
/// ```ignore
/// let tight_dca = VariantBuilder::new("TightDca")
///     .selection_range(TrackQuantity::DcaXy, -2.2, 2.2)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct VariantBuilder {
    definition: VariantDefinition,
}

impl VariantBuilder {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            definition: VariantDefinition {
                suffix: suffix.into(),
                source: None,
                overrides: Vec::new(),
            },
        }
    }

    /// Derive from an earlier variant instead of the baseline
    #[must_use]
    pub fn from_variant(mut self, source_suffix: impl Into<String>) -> Self {
        self.definition.source = Some(source_suffix.into());
        self
    }

    #[must_use]
    pub fn with_override(mut self, o: Override) -> Self {
        self.definition.overrides.push(o);
        self
    }

    #[must_use]
    pub fn correlation_cut(self, pair: EstimatorPair, slope: f64, offset: f64) -> Self {
        self.with_override(Override::SetCorrelationCut {
            pair,
            cut: CorrelationCut::new(slope, offset),
        })
    }

    #[must_use]
    pub fn clear_correlation_cut(self, pair: EstimatorPair) -> Self {
        self.with_override(Override::ClearCorrelationCut(pair))
    }

    #[must_use]
    pub fn family_correlation_cut(self, family: EstimatorFamily, slope: f64, offset: f64) -> Self {
        self.with_override(Override::SetFamilyCorrelationCut {
            family,
            cut: CorrelationCut::new(slope, offset),
        })
    }

    #[must_use]
    pub fn clear_family_correlation_cuts(self, family: EstimatorFamily) -> Self {
        self.with_override(Override::ClearFamilyCorrelationCuts(family))
    }

    #[must_use]
    pub fn selection_range(self, quantity: impl Into<Quantity>, min: f64, max: f64) -> Self {
        self.with_override(Override::SetSelectionRange {
            quantity: quantity.into(),
            min,
            max,
        })
    }

    #[must_use]
    pub fn disable_selection(self, quantity: impl Into<Quantity>) -> Self {
        self.with_override(Override::DisableSelection(quantity.into()))
    }

    #[must_use]
    pub fn centrality_estimator(self, estimator: CentralityEstimator) -> Self {
        self.with_override(Override::SetCentralityEstimator(estimator))
    }

    #[must_use]
    pub fn filter_bit(self, filter_bit: u32) -> Self {
        self.with_override(Override::SetTrackFilter(FilterBit(filter_bit)))
    }

    #[must_use]
    pub fn histogram_binning(
        self,
        quantity: impl Into<Quantity>,
        bins: u32,
        low: f64,
        high: f64,
    ) -> Self {
        self.with_override(Override::SetHistogramBinning {
            quantity: quantity.into(),
            binning: HistogramBinning { bins, low, high },
        })
    }

    #[must_use]
    pub fn toggle(self, toggle: Toggle, value: bool) -> Self {
        self.with_override(Override::SetToggle { toggle, value })
    }

    pub fn build(self) -> VariantDefinition {
        self.definition
    }
}

/// Variant as written in a descriptor document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default)]
    pub overrides: Vec<OverrideSpec>,
}

impl VariantSpec {
    /// Resolve every textual override; errors name this variant
    pub fn resolve(&self) -> Result<VariantDefinition, ConfigError> {
        let overrides = self
            .overrides
            .iter()
            .map(OverrideSpec::resolve)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.in_variant(&self.suffix))?;

        Ok(VariantDefinition {
            suffix: self.suffix.clone(),
            source: self.from.clone(),
            overrides,
        })
    }
}
