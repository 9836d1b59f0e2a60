//! The analysis configuration aggregate
//!
//! An `AnalysisConfiguration` is a plain value: cloning it copies every map and
//! list, so a derived variant never shares state with its source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::estimators::{EstimatorFamily, EstimatorPair};
use super::quantities::{CentralityEstimator, EventQuantity, Quantity, TrackQuantity};
use super::ranges::{
    CorrelationCut, CorrelationQaBinning, HistogramBinning, SelectionRange, validate_bin_edges,
};
use crate::error::ConfigError;

/// Track-filter bit mask selecting a predefined track-quality class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterBit(pub u32);

impl fmt::Display for FilterBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Independent on/off switches of the analysis task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggles {
    pub primary_only: bool,
    pub charged_only: bool,
    /// Must not be combined with a filter bit
    pub global_tracks_only: bool,
    pub fill_qa_histograms: bool,
    /// Fill only the estimator-correlation QA histograms
    pub qa_histograms_only: bool,
    /// Fill control histograms and skip the correlator computation
    pub control_histograms_only: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            primary_only: true,
            charged_only: true,
            global_tracks_only: false,
            fill_qa_histograms: false,
            qa_histograms_only: false,
            control_histograms_only: false,
        }
    }
}

/// Names of the individual toggles, for overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    PrimaryOnly,
    ChargedOnly,
    GlobalTracksOnly,
    FillQaHistograms,
    QaHistogramsOnly,
    ControlHistogramsOnly,
}

impl Toggle {
    pub const ALL: [Toggle; 6] = [
        Toggle::PrimaryOnly,
        Toggle::ChargedOnly,
        Toggle::GlobalTracksOnly,
        Toggle::FillQaHistograms,
        Toggle::QaHistogramsOnly,
        Toggle::ControlHistogramsOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Toggle::PrimaryOnly => "primary_only",
            Toggle::ChargedOnly => "charged_only",
            Toggle::GlobalTracksOnly => "global_tracks_only",
            Toggle::FillQaHistograms => "fill_qa_histograms",
            Toggle::QaHistogramsOnly => "qa_histograms_only",
            Toggle::ControlHistogramsOnly => "control_histograms_only",
        }
    }
}

impl std::str::FromStr for Toggle {
    type Err = crate::error::UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Toggle::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::error::UnknownIdentifier::new("toggle", s))
    }
}

impl Toggles {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::PrimaryOnly => self.primary_only,
            Toggle::ChargedOnly => self.charged_only,
            Toggle::GlobalTracksOnly => self.global_tracks_only,
            Toggle::FillQaHistograms => self.fill_qa_histograms,
            Toggle::QaHistogramsOnly => self.qa_histograms_only,
            Toggle::ControlHistogramsOnly => self.control_histograms_only,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        let slot = match toggle {
            Toggle::PrimaryOnly => &mut self.primary_only,
            Toggle::ChargedOnly => &mut self.charged_only,
            Toggle::GlobalTracksOnly => &mut self.global_tracks_only,
            Toggle::FillQaHistograms => &mut self.fill_qa_histograms,
            Toggle::QaHistogramsOnly => &mut self.qa_histograms_only,
            Toggle::ControlHistogramsOnly => &mut self.control_histograms_only,
        };
        *slot = value;
    }
}

/// Where a variant came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// Name of the configuration this one was cloned from
    pub source: String,
    /// Suffix appended to the source name
    pub suffix: String,
}

/// Inputs of the external correlator computation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelatorSettings {
    /// Harmonics of multi-particle correlators, e.g. `[-2, 2]`
    #[serde(default)]
    pub correlators: Vec<Vec<i32>>,

    /// Harmonic sets of symmetric cumulants, e.g. `[2, 3]` or `[2, 3, 4]`
    #[serde(default)]
    pub symmetric_cumulants: Vec<Vec<u32>>,

    /// Variable-width bin edges for differential correlators
    #[serde(default)]
    pub kinematic_binning: BTreeMap<TrackQuantity, Vec<f64>>,
}

impl CorrelatorSettings {
    /// `self` on top of `base`: non-empty harmonic lists replace the base
    /// lists, kinematic edges replace the base edges per quantity
    pub fn layered_over(&self, base: &CorrelatorSettings) -> CorrelatorSettings {
        let mut kinematic_binning = base.kinematic_binning.clone();
        kinematic_binning.extend(
            self.kinematic_binning
                .iter()
                .map(|(quantity, edges)| (*quantity, edges.clone())),
        );

        CorrelatorSettings {
            correlators: non_empty_or(&self.correlators, &base.correlators),
            symmetric_cumulants: non_empty_or(&self.symmetric_cumulants, &base.symmetric_cumulants),
            kinematic_binning,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, harmonics) in self.correlators.iter().enumerate() {
            if harmonics.is_empty() {
                return Err(ConfigError::InvalidHarmonics {
                    field: format!("correlators[{i}]"),
                    reason: "no harmonics given".to_string(),
                });
            }
        }

        for (i, harmonics) in self.symmetric_cumulants.iter().enumerate() {
            let field = format!("symmetric_cumulants[{i}]");
            if !(2..=3).contains(&harmonics.len()) {
                return Err(ConfigError::InvalidHarmonics {
                    field,
                    reason: format!("expected 2 or 3 harmonics, got {}", harmonics.len()),
                });
            }
            if harmonics.contains(&0) {
                return Err(ConfigError::InvalidHarmonics {
                    field,
                    reason: "harmonic 0 is not allowed".to_string(),
                });
            }
            let mut sorted = harmonics.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != harmonics.len() {
                return Err(ConfigError::InvalidHarmonics {
                    field,
                    reason: "harmonics must be distinct".to_string(),
                });
            }
        }

        for (quantity, edges) in &self.kinematic_binning {
            validate_bin_edges(&format!("kinematic_binning.{quantity}"), edges)?;
        }
        Ok(())
    }
}

fn non_empty_or<T: Clone>(own: &[T], base: &[T]) -> Vec<T> {
    if own.is_empty() { base.to_vec() } else { own.to_vec() }
}

/// Fully resolved configuration of one analysis task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfiguration {
    /// Unique task name; also used as the output container name
    pub name: String,

    /// Set for variants; `None` for a baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Lineage>,

    // === Selection ===
    pub track_cuts: BTreeMap<TrackQuantity, SelectionRange>,
    pub event_cuts: BTreeMap<EventQuantity, SelectionRange>,

    /// At most one cut per unordered estimator pair
    #[serde(default)]
    pub correlation_cuts: BTreeMap<EstimatorPair, CorrelationCut>,

    pub centrality_estimator: CentralityEstimator,
    pub filter_bit: FilterBit,
    pub toggles: Toggles,

    // === Diagnostics ===
    pub track_histograms: BTreeMap<TrackQuantity, HistogramBinning>,
    pub event_histograms: BTreeMap<EventQuantity, HistogramBinning>,

    /// One entry for every unordered pair of each estimator family
    pub correlation_qa: BTreeMap<EstimatorPair, CorrelationQaBinning>,

    // === Correlators ===
    #[serde(default)]
    pub correlator_settings: CorrelatorSettings,
}

impl AnalysisConfiguration {
    pub fn selection_range(&self, quantity: Quantity) -> Option<&SelectionRange> {
        match quantity {
            Quantity::Track(q) => self.track_cuts.get(&q),
            Quantity::Event(q) => self.event_cuts.get(&q),
        }
    }

    pub fn histogram_binning(&self, quantity: Quantity) -> Option<&HistogramBinning> {
        match quantity {
            Quantity::Track(q) => self.track_histograms.get(&q),
            Quantity::Event(q) => self.event_histograms.get(&q),
        }
    }

    pub fn correlation_cut(&self, pair: &EstimatorPair) -> Option<&CorrelationCut> {
        self.correlation_cuts.get(pair)
    }

    /// Correlation cuts applied within one estimator family
    pub fn correlation_cuts_in(
        &self,
        family: EstimatorFamily,
    ) -> impl Iterator<Item = (&EstimatorPair, &CorrelationCut)> {
        self.correlation_cuts
            .iter()
            .filter(move |(pair, _)| pair.family() == family)
    }

    /// Check every range, binning and cut of the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for q in TrackQuantity::ALL {
            let range = self
                .track_cuts
                .get(&q)
                .ok_or_else(|| ConfigError::MissingDefault {
                    quantity: format!("track cut {q}"),
                })?;
            range.validate(format!("track_cuts.{q}"))?;
            let binning =
                self.track_histograms
                    .get(&q)
                    .ok_or_else(|| ConfigError::MissingDefault {
                        quantity: format!("track histogram {q}"),
                    })?;
            binning.validate(format!("track_histograms.{q}"))?;
        }

        for q in EventQuantity::ALL {
            let range = self
                .event_cuts
                .get(&q)
                .ok_or_else(|| ConfigError::MissingDefault {
                    quantity: format!("event cut {q}"),
                })?;
            range.validate(format!("event_cuts.{q}"))?;
            let binning =
                self.event_histograms
                    .get(&q)
                    .ok_or_else(|| ConfigError::MissingDefault {
                        quantity: format!("event histogram {q}"),
                    })?;
            binning.validate(format!("event_histograms.{q}"))?;
        }

        for (pair, qa) in &self.correlation_qa {
            qa.x.validate(format!("correlation_qa.{pair}.x"))?;
            qa.y.validate(format!("correlation_qa.{pair}.y"))?;
        }
        for (pair, cut) in &self.correlation_cuts {
            cut.validate(pair.to_string())?;
        }

        self.correlator_settings.validate()?;

        if self.toggles.global_tracks_only && self.filter_bit.0 != 0 {
            tracing::warn!(
                task = %self.name,
                filter_bit = self.filter_bit.0,
                "global_tracks_only combined with a filter bit"
            );
        }
        Ok(())
    }

    /// Field paths whose values differ from `other`.
    ///
    /// Name and lineage are identity, not settings, and are not compared.
    pub fn differences(&self, other: &Self) -> Vec<String> {
        let mut out = Vec::new();

        diff_maps("track_cuts", &self.track_cuts, &other.track_cuts, &mut out);
        diff_maps("event_cuts", &self.event_cuts, &other.event_cuts, &mut out);
        diff_maps(
            "correlation_cuts",
            &self.correlation_cuts,
            &other.correlation_cuts,
            &mut out,
        );
        if self.centrality_estimator != other.centrality_estimator {
            out.push("centrality_estimator".to_string());
        }
        if self.filter_bit != other.filter_bit {
            out.push("filter_bit".to_string());
        }
        for toggle in Toggle::ALL {
            if self.toggles.get(toggle) != other.toggles.get(toggle) {
                out.push(format!("toggles.{}", toggle.name()));
            }
        }
        diff_maps(
            "track_histograms",
            &self.track_histograms,
            &other.track_histograms,
            &mut out,
        );
        diff_maps(
            "event_histograms",
            &self.event_histograms,
            &other.event_histograms,
            &mut out,
        );
        diff_maps(
            "correlation_qa",
            &self.correlation_qa,
            &other.correlation_qa,
            &mut out,
        );
        if self.correlator_settings != other.correlator_settings {
            out.push("correlator_settings".to_string());
        }
        out
    }
}

fn diff_maps<K, V>(prefix: &str, a: &BTreeMap<K, V>, b: &BTreeMap<K, V>, out: &mut Vec<String>)
where
    K: Ord + fmt::Display,
    V: PartialEq,
{
    for (key, value) in a {
        if b.get(key) != Some(value) {
            out.push(format!("{prefix}.{key}"));
        }
    }
    for key in b.keys() {
        if !a.contains_key(key) {
            out.push(format!("{prefix}.{key}"));
        }
    }
}
