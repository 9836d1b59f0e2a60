//! Named override catalogues
//!
//! Each preset bundles the baseline overrides and the variant list of one of
//! the standard job types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;
use crate::model::{
    CentralityEstimator, CorrelationCut, CorrelatorSettings, EstimatorFamily, EventQuantity,
    Toggle, TrackQuantity,
};
use crate::variants::{Override, VariantBuilder, VariantDefinition};

/// Standard centrality correlation cut
pub const CENTRALITY_CORRELATION_CUT: CorrelationCut = CorrelationCut {
    slope: 1.1,
    offset: 10.0,
};

/// Standard multiplicity correlation cut
pub const MULTIPLICITY_CORRELATION_CUT: CorrelationCut = CorrelationCut {
    slope: 1.4,
    offset: 300.0,
};

/// Centrality cut of the high-multiplicity outlier study
pub const OUTLIER_CENTRALITY_CORRELATION_CUT: CorrelationCut = CorrelationCut {
    slope: 1.0,
    offset: 10.0,
};

/// Transverse-momentum edges for differential correlators
pub const PT_EDGES: [f64; 7] = [0.2, 0.34, 0.5, 0.7, 1.0, 2.0, 5.0];

/// Pseudorapidity edges for differential correlators
pub const ETA_EDGES: [f64; 5] = [-0.8, -0.4, 0.0, 0.4, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Symmetric-cumulant systematics: estimator, vertex, outlier, DCA,
    /// cluster and filter-bit variations of a baseline with both correlation
    /// cuts
    Systematics,
    /// Baseline with both correlation cuts, plus variants removing them
    CorrelationCuts,
    /// Uncut baseline, centrality cut, then multiplicity cut on top of it
    StackedCorrelationCuts,
    /// A single task computing every symmetric cumulant up to harmonic 6
    Bootstrap,
    /// A single task trending two-particle correlators in pt and eta bins
    Trending,
    /// Control histograms with a loose centrality cut, with and without the
    /// multiplicity cut
    HighMultiplicityOutliers,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Systematics,
        Preset::CorrelationCuts,
        Preset::StackedCorrelationCuts,
        Preset::Bootstrap,
        Preset::Trending,
        Preset::HighMultiplicityOutliers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Systematics => "systematics",
            Preset::CorrelationCuts => "correlation_cuts",
            Preset::StackedCorrelationCuts => "stacked_correlation_cuts",
            Preset::Bootstrap => "bootstrap",
            Preset::Trending => "trending",
            Preset::HighMultiplicityOutliers => "high_multiplicity_outliers",
        }
    }

    /// Correlator inputs of the baseline; a job's own `analysis` section is
    /// layered on top
    pub fn correlator_settings(self) -> CorrelatorSettings {
        match self {
            Preset::Systematics => CorrelatorSettings {
                symmetric_cumulants: symmetric_cumulants(),
                kinematic_binning: kinematic_edges(),
                ..CorrelatorSettings::default()
            },
            Preset::Bootstrap => CorrelatorSettings {
                symmetric_cumulants: symmetric_cumulants(),
                ..CorrelatorSettings::default()
            },
            Preset::Trending => CorrelatorSettings {
                correlators: (1..=6).map(|n| vec![-n, n]).collect(),
                kinematic_binning: kinematic_edges(),
                ..CorrelatorSettings::default()
            },
            Preset::CorrelationCuts
            | Preset::StackedCorrelationCuts
            | Preset::HighMultiplicityOutliers => CorrelatorSettings::default(),
        }
    }

    /// Overrides applied to the built baseline before variants are derived
    pub fn baseline_overrides(self) -> Vec<Override> {
        match self {
            Preset::StackedCorrelationCuts | Preset::Bootstrap | Preset::Trending => Vec::new(),
            Preset::Systematics => standard_correlation_cuts(),
            Preset::CorrelationCuts => {
                let mut overrides = standard_correlation_cuts();
                overrides.push(Override::SetToggle {
                    toggle: Toggle::QaHistogramsOnly,
                    value: true,
                });
                overrides
            }
            Preset::HighMultiplicityOutliers => vec![
                Override::SetFamilyCorrelationCut {
                    family: EstimatorFamily::Centrality,
                    cut: OUTLIER_CENTRALITY_CORRELATION_CUT,
                },
                Override::SetToggle {
                    toggle: Toggle::QaHistogramsOnly,
                    value: true,
                },
                Override::SetToggle {
                    toggle: Toggle::ControlHistogramsOnly,
                    value: true,
                },
            ],
        }
    }

    pub fn variants(self) -> Vec<VariantDefinition> {
        match self {
            Preset::Systematics => systematics(),
            Preset::CorrelationCuts => vec![
                VariantBuilder::new("NOCENCOR")
                    .clear_family_correlation_cuts(EstimatorFamily::Centrality)
                    .build(),
                VariantBuilder::new("NOMULCOR")
                    .clear_family_correlation_cuts(EstimatorFamily::Multiplicity)
                    .build(),
                VariantBuilder::new("NOCENMULCOR")
                    .clear_family_correlation_cuts(EstimatorFamily::Centrality)
                    .clear_family_correlation_cuts(EstimatorFamily::Multiplicity)
                    .build(),
            ],
            Preset::StackedCorrelationCuts => vec![
                VariantBuilder::new("CENCOR")
                    .family_correlation_cut(
                        EstimatorFamily::Centrality,
                        CENTRALITY_CORRELATION_CUT.slope,
                        CENTRALITY_CORRELATION_CUT.offset,
                    )
                    .build(),
                VariantBuilder::new("MULCOR")
                    .from_variant("CENCOR")
                    .family_correlation_cut(
                        EstimatorFamily::Multiplicity,
                        MULTIPLICITY_CORRELATION_CUT.slope,
                        MULTIPLICITY_CORRELATION_CUT.offset,
                    )
                    .build(),
            ],
            Preset::Bootstrap | Preset::Trending => Vec::new(),
            Preset::HighMultiplicityOutliers => vec![
                VariantBuilder::new("MulCor")
                    .family_correlation_cut(
                        EstimatorFamily::Multiplicity,
                        MULTIPLICITY_CORRELATION_CUT.slope,
                        MULTIPLICITY_CORRELATION_CUT.offset,
                    )
                    .build(),
            ],
        }
    }
}

fn standard_correlation_cuts() -> Vec<Override> {
    vec![
        Override::SetFamilyCorrelationCut {
            family: EstimatorFamily::Centrality,
            cut: CENTRALITY_CORRELATION_CUT,
        },
        Override::SetFamilyCorrelationCut {
            family: EstimatorFamily::Multiplicity,
            cut: MULTIPLICITY_CORRELATION_CUT,
        },
    ]
}

/// Every pair and triple of distinct harmonics 2..=6, pairs first
fn symmetric_cumulants() -> Vec<Vec<u32>> {
    let mut sets = Vec::new();
    for a in 2..=6 {
        for b in a + 1..=6 {
            sets.push(vec![a, b]);
        }
    }
    for a in 2..=6 {
        for b in a + 1..=6 {
            for c in b + 1..=6 {
                sets.push(vec![a, b, c]);
            }
        }
    }
    sets
}

fn kinematic_edges() -> BTreeMap<TrackQuantity, Vec<f64>> {
    BTreeMap::from([
        (TrackQuantity::Pt, PT_EDGES.to_vec()),
        (TrackQuantity::Eta, ETA_EDGES.to_vec()),
    ])
}

fn systematics() -> Vec<VariantDefinition> {
    let filter_bit = |suffix: &str, bit: u32| {
        VariantBuilder::new(suffix)
            .disable_selection(TrackQuantity::DcaZ)
            .disable_selection(TrackQuantity::DcaXy)
            .filter_bit(bit)
            .build()
    };

    vec![
        VariantBuilder::new("CenSPD")
            .centrality_estimator(CentralityEstimator::SpdTracklets)
            .build(),
        VariantBuilder::new("Vz14")
            .selection_range(EventQuantity::Z, -14.0, 14.0)
            .build(),
        VariantBuilder::new("CC1111")
            .family_correlation_cut(EstimatorFamily::Centrality, 1.1, 11.0)
            .build(),
        VariantBuilder::new("MC16350")
            .family_correlation_cut(EstimatorFamily::Multiplicity, 1.6, 350.0)
            .build(),
        VariantBuilder::new("DcaXY22")
            .selection_range(TrackQuantity::DcaXy, -2.2, 2.2)
            .build(),
        VariantBuilder::new("DcaZ24")
            .selection_range(TrackQuantity::DcaZ, -2.4, 2.4)
            .build(),
        VariantBuilder::new("Cluster60")
            .selection_range(TrackQuantity::TpcNcls, 60.0, 160.0)
            .build(),
        VariantBuilder::new("Cluster80")
            .selection_range(TrackQuantity::TpcNcls, 80.0, 160.0)
            .build(),
        filter_bit("Fb1", 1),
        filter_bit("Fb96", 96),
        filter_bit("Fb768", 768),
    ]
}

impl FromStr for Preset {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DescriptorError::UnknownPreset {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_parse() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("Systematics".parse::<Preset>().unwrap(), Preset::Systematics);
        assert_eq!(
            " High_Multiplicity_Outliers".parse::<Preset>().unwrap(),
            Preset::HighMultiplicityOutliers
        );
        assert!(matches!(
            "general".parse::<Preset>(),
            Err(DescriptorError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn systematics_order() {
        let suffixes: Vec<String> = Preset::Systematics
            .variants()
            .into_iter()
            .map(|v| v.suffix)
            .collect();
        assert_eq!(
            suffixes,
            [
                "CenSPD", "Vz14", "CC1111", "MC16350", "DcaXY22", "DcaZ24", "Cluster60",
                "Cluster80", "Fb1", "Fb96", "Fb768"
            ]
        );
    }

    #[test]
    fn systematics_baseline_is_cut() {
        let overrides = Preset::Systematics.baseline_overrides();
        assert_eq!(overrides.len(), 2);
        assert!(overrides.contains(&Override::SetFamilyCorrelationCut {
            family: EstimatorFamily::Multiplicity,
            cut: MULTIPLICITY_CORRELATION_CUT,
        }));

        let settings = Preset::Systematics.correlator_settings();
        assert_eq!(settings.symmetric_cumulants.len(), 18);
        assert_eq!(settings.kinematic_binning[&TrackQuantity::Pt], PT_EDGES);
        assert_eq!(settings.kinematic_binning[&TrackQuantity::Eta], ETA_EDGES);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn symmetric_cumulant_sets() {
        let sets = symmetric_cumulants();
        assert_eq!(sets.len(), 18);
        assert_eq!(sets[0], [2, 3]);
        assert_eq!(sets[9], [5, 6]);
        assert_eq!(sets[10], [2, 3, 4]);
        assert_eq!(sets[17], [4, 5, 6]);
    }

    #[test]
    fn bootstrap_is_a_single_task() {
        let settings = Preset::Bootstrap.correlator_settings();
        assert_eq!(settings.symmetric_cumulants, symmetric_cumulants());
        assert!(settings.correlators.is_empty());
        assert!(settings.kinematic_binning.is_empty());
        assert!(Preset::Bootstrap.variants().is_empty());
        assert!(Preset::Bootstrap.baseline_overrides().is_empty());
    }

    #[test]
    fn trending_correlators() {
        let settings = Preset::Trending.correlator_settings();
        assert_eq!(settings.correlators.len(), 6);
        assert_eq!(settings.correlators[0], [-1, 1]);
        assert_eq!(settings.correlators[5], [-6, 6]);
        assert!(settings.symmetric_cumulants.is_empty());
        assert_eq!(settings.kinematic_binning.len(), 2);
        assert!(Preset::Trending.variants().is_empty());
    }

    #[test]
    fn outlier_preset_adds_multiplicity_cut() {
        let overrides = Preset::HighMultiplicityOutliers.baseline_overrides();
        assert_eq!(
            overrides[0],
            Override::SetFamilyCorrelationCut {
                family: EstimatorFamily::Centrality,
                cut: OUTLIER_CENTRALITY_CORRELATION_CUT,
            }
        );

        let variants = Preset::HighMultiplicityOutliers.variants();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].suffix, "MulCor");
        assert!(variants[0].source.is_none());
    }

    #[test]
    fn stacked_preset_chains() {
        let variants = Preset::StackedCorrelationCuts.variants();
        assert_eq!(variants[1].source.as_deref(), Some("CENCOR"));
    }
}
