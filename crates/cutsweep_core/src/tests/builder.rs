//! Tests for the baseline configuration builder

use crate::config::{BinSpec, ConfigurationBuilder, DefaultTable, QuantityDefaults};
use crate::error::ConfigError;
use crate::model::{
    CentralityEstimator, CentralityWindow, EstimatorFamily, EstimatorPair, EventQuantity,
    MultiplicityEstimator, Toggle, TrackQuantity,
};

fn window(min: f64, max: f64) -> CentralityWindow {
    CentralityWindow::new(min, max).unwrap()
}

#[test]
fn test_baseline_name_uses_window() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();
    assert_eq!(config.name, "LHC10h_0.0-10.0");
    assert!(config.lineage.is_none());

    let config = ConfigurationBuilder::new("LHC15o", window(12.5, 37.5))
        .build()
        .unwrap();
    assert_eq!(config.name, "LHC15o_12.5-37.5");
}

#[test]
fn test_build_is_deterministic() {
    let builder = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .symmetric_cumulants(vec![vec![2, 3], vec![2, 3, 4]])
        .kinematic_binning(TrackQuantity::Pt, vec![0.2, 0.34, 0.5, 0.7, 1.0, 2.0, 5.0]);

    let a = builder.build().unwrap();
    let b = builder.build().unwrap();
    assert_eq!(a, b);
    assert!(a.differences(&b).is_empty());
}

#[test]
fn test_centrality_uses_window_exactly() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();

    let cut = config.event_cuts[&EventQuantity::Cen];
    assert_eq!((cut.min, cut.max), (0.0, 10.0));
    assert!(cut.active);

    let hist = config.event_histograms[&EventQuantity::Cen];
    assert_eq!((hist.low, hist.high), (0.0, 10.0));
    assert_eq!(hist.bins, 10);
}

#[test]
fn test_every_range_is_ordered() {
    let config = ConfigurationBuilder::new("LHC10h", window(30.0, 40.0))
        .build()
        .unwrap();

    assert_eq!(config.track_cuts.len(), TrackQuantity::ALL.len());
    assert_eq!(config.event_cuts.len(), EventQuantity::ALL.len());
    for range in config.track_cuts.values().chain(config.event_cuts.values()) {
        assert!(range.min <= range.max);
    }
    for binning in config
        .track_histograms
        .values()
        .chain(config.event_histograms.values())
    {
        assert!(binning.low <= binning.high);
        assert!(binning.bins >= 1);
    }
}

#[test]
fn test_standard_defaults() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();

    let pt = config.track_histograms[&TrackQuantity::Pt];
    assert_eq!((pt.bins, pt.low, pt.high), (480, 0.2, 5.0));
    assert_eq!(config.track_histograms[&TrackQuantity::Phi].bins, 360);
    assert_eq!(config.track_histograms[&TrackQuantity::DcaXy].bins, 48);

    assert!(!config.track_cuts[&TrackQuantity::TpcCrossedRows].active);
    assert!(config.track_cuts[&TrackQuantity::TpcNcls].active);

    assert_eq!(config.filter_bit.0, 128);
    assert_eq!(config.centrality_estimator, CentralityEstimator::V0M);
    assert!(config.toggles.primary_only);
    assert!(config.toggles.charged_only);
    assert!(!config.toggles.fill_qa_histograms);
}

#[test]
fn test_no_correlation_cuts_on_baseline() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();
    assert!(config.correlation_cuts.is_empty());
}

#[test]
fn test_qa_covers_every_estimator_pair() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();

    let k_cen = CentralityEstimator::ALL.len();
    let k_mul = MultiplicityEstimator::ALL.len();
    assert_eq!(
        config.correlation_qa.len(),
        k_cen * (k_cen - 1) / 2 + k_mul * (k_mul - 1) / 2
    );

    for family in [EstimatorFamily::Centrality, EstimatorFamily::Multiplicity] {
        for pair in family.pairs() {
            assert!(config.correlation_qa.contains_key(&pair), "missing {pair}");
        }
    }
}

#[test]
fn test_qa_axes_follow_estimator_binning() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .build()
        .unwrap();

    let cen_pair = EstimatorPair::new(CentralityEstimator::V0M, CentralityEstimator::CL1).unwrap();
    let cen_qa = config.correlation_qa[&cen_pair];
    assert_eq!(cen_qa.x, config.event_histograms[&EventQuantity::Cen]);
    assert_eq!(cen_qa.y, cen_qa.x);

    let mul_pair =
        EstimatorPair::new(MultiplicityEstimator::MulQ, MultiplicityEstimator::Mul).unwrap();
    let mul_qa = config.correlation_qa[&mul_pair];
    assert_eq!(mul_qa.x, config.event_histograms[&EventQuantity::Mul]);
    assert_eq!(mul_qa.y, config.event_histograms[&EventQuantity::MulQ]);
}

#[test]
fn test_explicit_settings_win_over_table() {
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .filter_bit(768)
        .centrality_estimator(CentralityEstimator::CL0)
        .toggle(Toggle::FillQaHistograms, true)
        .build()
        .unwrap();

    assert_eq!(config.filter_bit.0, 768);
    assert_eq!(config.centrality_estimator, CentralityEstimator::CL0);
    assert!(config.toggles.fill_qa_histograms);
}

#[test]
fn test_custom_table_entry() {
    let table = DefaultTable::standard().with_track(
        TrackQuantity::DcaZ,
        QuantityDefaults::new(-1.0, 1.0, BinSpec::Fixed(40)),
    );
    let config = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .defaults(table)
        .build()
        .unwrap();

    let dcaz = config.track_cuts[&TrackQuantity::DcaZ];
    assert_eq!((dcaz.min, dcaz.max), (-1.0, 1.0));
    assert_eq!(config.track_histograms[&TrackQuantity::DcaZ].bins, 40);
}

#[test]
fn test_missing_default_fails() {
    let mut table = DefaultTable::standard();
    table.event.remove(&EventQuantity::VPos);

    let err = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .defaults(table)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingDefault {
            quantity: "event quantity VPOS".to_string()
        }
    );
}

#[test]
fn test_inverted_default_range_fails() {
    let table = DefaultTable::standard().with_track(
        TrackQuantity::Eta,
        QuantityDefaults::new(0.8, -0.8, BinSpec::PerUnit(100.0)),
    );
    let err = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .defaults(table)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRange { ref field, .. } if field == "track.ETA"));
}

#[test]
fn test_invalid_kinematic_edges_fail() {
    let err = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .kinematic_binning(TrackQuantity::Eta, vec![0.4, -0.4])
        .build()
        .unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidBinning { ref field, .. } if field == "kinematic_binning.ETA")
    );
}

#[test]
fn test_invalid_symmetric_cumulant_fails() {
    let err = ConfigurationBuilder::new("LHC10h", window(0.0, 10.0))
        .symmetric_cumulants(vec![vec![2, 2]])
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHarmonics { .. }));
}
