//! Configuration Builder
//!
//! Produces the baseline `AnalysisConfiguration` of a job from the centrality
//! window, a base name and a default table.
//!
//! # Example
//!
//! ```ignore
//! use cutsweep_core::config::{ConfigurationBuilder, DefaultTable};
//! use cutsweep_core::model::{CentralityWindow, TrackQuantity};
//!
//! let baseline = ConfigurationBuilder::new("LHC10h", CentralityWindow::new(0.0, 10.0)?)
//!     .defaults(DefaultTable::standard())
//!     .symmetric_cumulants(vec![vec![2, 3], vec![2, 4]])
//!     .kinematic_binning(TrackQuantity::Pt, vec![0.2, 0.5, 1.0, 2.0, 5.0])
//!     .build()?;
//!
//! assert_eq!(baseline.name, "LHC10h_0.0-10.0");
//! ```

use std::collections::BTreeMap;

use super::defaults::DefaultTable;
use crate::error::ConfigError;
use crate::model::{
    AnalysisConfiguration, CentralityEstimator, CentralityWindow, CorrelationQaBinning,
    CorrelatorSettings, Estimator, EstimatorFamily, EstimatorPair, EventQuantity, FilterBit,
    HistogramBinning, Toggle, Toggles, TrackQuantity,
};

/// Builder for the baseline configuration of one job
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    base_name: String,
    window: CentralityWindow,
    defaults: DefaultTable,
    toggles: Option<Toggles>,
    toggle_overrides: Vec<(Toggle, bool)>,
    filter_bit: Option<FilterBit>,
    centrality_estimator: Option<CentralityEstimator>,
    correlator_settings: CorrelatorSettings,
}

impl ConfigurationBuilder {
    /// Start a builder using `DefaultTable::standard()`
    #[must_use]
    pub fn new(base_name: impl Into<String>, window: CentralityWindow) -> Self {
        Self {
            base_name: base_name.into(),
            window,
            defaults: DefaultTable::standard(),
            toggles: None,
            toggle_overrides: Vec::new(),
            filter_bit: None,
            centrality_estimator: None,
            correlator_settings: CorrelatorSettings::default(),
        }
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    /// Replace the default table
    #[must_use]
    pub fn defaults(mut self, table: DefaultTable) -> Self {
        self.defaults = table;
        self
    }

    /// Replace all toggles at once
    #[must_use]
    pub fn toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = Some(toggles);
        self
    }

    /// Set a single toggle; applied after `toggles()`
    #[must_use]
    pub fn toggle(mut self, toggle: Toggle, value: bool) -> Self {
        self.toggle_overrides.push((toggle, value));
        self
    }

    #[must_use]
    pub fn filter_bit(mut self, filter_bit: u32) -> Self {
        self.filter_bit = Some(FilterBit(filter_bit));
        self
    }

    #[must_use]
    pub fn centrality_estimator(mut self, estimator: CentralityEstimator) -> Self {
        self.centrality_estimator = Some(estimator);
        self
    }

    // =========================================================================
    // Correlators
    // =========================================================================

    #[must_use]
    pub fn correlators(mut self, correlators: Vec<Vec<i32>>) -> Self {
        self.correlator_settings.correlators = correlators;
        self
    }

    #[must_use]
    pub fn symmetric_cumulants(mut self, harmonics: Vec<Vec<u32>>) -> Self {
        self.correlator_settings.symmetric_cumulants = harmonics;
        self
    }

    /// Variable-width bin edges for a track quantity
    #[must_use]
    pub fn kinematic_binning(mut self, quantity: TrackQuantity, edges: Vec<f64>) -> Self {
        self.correlator_settings
            .kinematic_binning
            .insert(quantity, edges);
        self
    }

    #[must_use]
    pub fn correlator_settings(mut self, settings: CorrelatorSettings) -> Self {
        self.correlator_settings = settings;
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Name of the baseline, `{base}_{min:.1}-{max:.1}`
    pub fn name(&self) -> String {
        format!("{}_{}", self.base_name, self.window.label())
    }

    /// Build the baseline. No correlation cut is applied.
    pub fn build(&self) -> Result<AnalysisConfiguration, ConfigError> {
        let table = &self.defaults;

        let mut track_cuts = BTreeMap::new();
        let mut track_histograms = BTreeMap::new();
        for q in TrackQuantity::ALL {
            let defaults = table.track_defaults(q)?;
            let field = format!("track.{q}");
            track_cuts.insert(q, defaults.selection(&field)?);
            track_histograms.insert(q, defaults.histogram(&field)?);
        }

        let mut event_cuts = BTreeMap::new();
        let mut event_histograms = BTreeMap::new();
        for q in EventQuantity::ALL {
            let mut defaults = *table.event_defaults(q)?;
            if q == EventQuantity::Cen {
                defaults = defaults.with_range(self.window.min(), self.window.max());
            }
            let field = format!("event.{q}");
            event_cuts.insert(q, defaults.selection(&field)?);
            event_histograms.insert(q, defaults.histogram(&field)?);
        }

        let correlation_qa = correlation_qa_binnings(&event_histograms)?;

        let mut toggles = self.toggles.unwrap_or(table.toggles);
        for &(toggle, value) in &self.toggle_overrides {
            toggles.set(toggle, value);
        }

        let config = AnalysisConfiguration {
            name: self.name(),
            lineage: None,
            track_cuts,
            event_cuts,
            correlation_cuts: BTreeMap::new(),
            centrality_estimator: self
                .centrality_estimator
                .unwrap_or(table.centrality_estimator),
            filter_bit: self.filter_bit.unwrap_or(table.filter_bit),
            toggles,
            track_histograms,
            event_histograms,
            correlation_qa,
            correlator_settings: self.correlator_settings.clone(),
        };
        config.validate()?;

        tracing::debug!(
            task = %config.name,
            qa_pairs = config.correlation_qa.len(),
            "baseline configuration built"
        );
        Ok(config)
    }
}

/// QA binning for every unordered estimator pair of both families.
///
/// Centrality axes use the centrality histogram binning; multiplicity axes use
/// the binning of the matching event quantity.
fn correlation_qa_binnings(
    event_histograms: &BTreeMap<EventQuantity, HistogramBinning>,
) -> Result<BTreeMap<EstimatorPair, CorrelationQaBinning>, ConfigError> {
    let axis = |estimator: Estimator| -> Result<HistogramBinning, ConfigError> {
        let quantity = match estimator {
            Estimator::Centrality(_) => EventQuantity::Cen,
            Estimator::Multiplicity(m) => m.quantity(),
        };
        event_histograms
            .get(&quantity)
            .copied()
            .ok_or_else(|| ConfigError::MissingDefault {
                quantity: format!("event quantity {quantity}"),
            })
    };

    let mut qa = BTreeMap::new();
    for family in [EstimatorFamily::Centrality, EstimatorFamily::Multiplicity] {
        for pair in family.pairs() {
            let binning = CorrelationQaBinning {
                x: axis(pair.first())?,
                y: axis(pair.second())?,
            };
            qa.insert(pair, binning);
        }
    }
    Ok(qa)
}
