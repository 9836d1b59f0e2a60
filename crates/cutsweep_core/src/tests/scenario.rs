//! End-to-end jobs: descriptor in, registered configurations out

use crate::config::{JobDescriptor, Preset, TaskDescriptor};
use crate::model::{
    AnalysisConfiguration, CentralityEstimator, CentralityWindow, EstimatorFamily, EventQuantity,
    TrackQuantity,
};
use crate::registration::DryRunManager;
use crate::setup::{add_tasks, prepare};

const JOB: &str = r#"{
    "task": {
        "BaseName": "LHC10h",
        "GridOutputFile": "AnalysisResults.root",
        "OutputTDirectory": "OutputAnalysis"
    },
    "analysis": {
        "correlators": [[-2, 2], [-3, 3]],
        "symmetric_cumulants": [[2, 3], [2, 4], [2, 3, 4]],
        "kinematic_binning": {
            "PT": [0.2, 0.34, 0.5, 0.7, 1.0, 2.0, 5.0],
            "ETA": [-0.8, -0.4, 0.0, 0.4, 0.8]
        }
    },
    "baseline": [
        { "kind": "set_correlation_cut", "pair": "V0M-CL1", "slope": 1.1, "offset": 10.0 }
    ],
    "variants": [
        { "suffix": "NoCenCor", "overrides": [
            { "kind": "clear_family_correlation_cuts", "family": "centrality" }
        ]},
        { "suffix": "TightDca", "overrides": [
            { "kind": "set_selection_range", "quantity": "DCAXY", "min": -2.2, "max": 2.2 }
        ]}
    ]
}"#;

fn window() -> CentralityWindow {
    CentralityWindow::new(0.0, 10.0).unwrap()
}

fn assert_centrality_window(config: &AnalysisConfiguration) {
    let cen = config.event_cuts[&EventQuantity::Cen];
    assert_eq!((cen.min, cen.max), (0.0, 10.0), "{}", config.name);
}

#[test]
fn test_descriptor_job_end_to_end() {
    let job = JobDescriptor::from_json_str(JOB).unwrap();
    let mut manager = DryRunManager::new();
    let registered = add_tasks(&mut manager, window(), &job).unwrap();

    let names: Vec<&str> = registered.iter().map(|r| r.task.as_str()).collect();
    assert_eq!(
        names,
        [
            "LHC10h_0.0-10.0",
            "LHC10h_0.0-10.0_NoCenCor",
            "LHC10h_0.0-10.0_TightDca"
        ]
    );
    assert!(
        registered
            .iter()
            .all(|r| r.routing == "AnalysisResults.root:OutputAnalysis")
    );

    let configs: Vec<&AnalysisConfiguration> = manager.tasks().collect();
    let (baseline, no_cen_cor, tight_dca) = (configs[0], configs[1], configs[2]);

    for config in &configs {
        assert_centrality_window(config);
        assert_eq!(config.correlator_settings.symmetric_cumulants.len(), 3);
    }

    assert_eq!(baseline.correlation_cuts.len(), 1);
    assert_eq!(
        no_cen_cor.differences(baseline),
        ["correlation_cuts.V0M-CL1"]
    );
    assert!(no_cen_cor.correlation_cuts.is_empty());

    assert_eq!(tight_dca.differences(baseline), ["track_cuts.DCAXY"]);
    let dcaxy = tight_dca.track_cuts[&TrackQuantity::DcaXy];
    assert_eq!((dcaxy.min, dcaxy.max), (-2.2, 2.2));
}

#[test]
fn test_systematics_preset() {
    let task = TaskDescriptor::new("LHC15o", "AnalysisResults.root", "SC").unwrap();
    let job = JobDescriptor::new(task).preset(Preset::Systematics);
    let configs = prepare(window(), &job).unwrap();

    assert_eq!(configs.len(), 12);
    let baseline = &configs[0];
    let find = |suffix: &str| {
        configs
            .iter()
            .find(|c| c.name == format!("LHC15o_0.0-10.0_{suffix}"))
            .unwrap()
    };

    let cen_spd = find("CenSPD");
    assert_eq!(cen_spd.centrality_estimator, CentralityEstimator::SpdTracklets);
    assert_eq!(cen_spd.differences(baseline), ["centrality_estimator"]);

    let vz = find("Vz14");
    assert_eq!(vz.event_cuts[&EventQuantity::Z].max, 14.0);

    assert_eq!(baseline.correlation_cuts.len(), 16);
    assert_eq!(baseline.correlator_settings.symmetric_cumulants.len(), 18);
    assert_eq!(baseline.correlator_settings.kinematic_binning.len(), 2);

    // outlier variants loosen the existing cuts instead of adding new ones
    let cc1111 = find("CC1111");
    assert_eq!(cc1111.correlation_cuts.len(), 16);
    let changed = cc1111.differences(baseline);
    assert_eq!(changed.len(), 6);
    assert!(changed.iter().all(|c| c.starts_with("correlation_cuts.")));
    for (_, cut) in cc1111.correlation_cuts_in(EstimatorFamily::Centrality) {
        assert_eq!((cut.slope, cut.offset), (1.1, 11.0));
    }

    let mc16350 = find("MC16350");
    assert_eq!(mc16350.correlation_cuts.len(), 16);
    assert_eq!(mc16350.differences(baseline).len(), 10);

    let fb96 = find("Fb96");
    let changed = fb96.differences(baseline);
    assert_eq!(changed.len(), 3);
    for field in ["track_cuts.DCAZ", "track_cuts.DCAXY", "filter_bit"] {
        assert!(changed.iter().any(|c| c == field), "{field} not changed");
    }
    assert!(!fb96.track_cuts[&TrackQuantity::DcaZ].active);
    assert_eq!(fb96.filter_bit.0, 96);

    for config in &configs {
        assert_centrality_window(config);
    }
}

#[test]
fn test_correlation_cut_preset() {
    let task = TaskDescriptor::new("LHC10h", "AnalysisResults.root", "Cuts").unwrap();
    let job = JobDescriptor::new(task).preset(Preset::CorrelationCuts);
    let configs = prepare(window(), &job).unwrap();

    assert_eq!(configs.len(), 4);
    assert_eq!(configs[0].correlation_cuts.len(), 16);
    assert!(configs[0].toggles.qa_histograms_only);

    assert_eq!(configs[1].correlation_cuts.len(), 10);
    assert_eq!(configs[2].correlation_cuts.len(), 6);
    assert!(configs[3].correlation_cuts.is_empty());
    assert_eq!(configs[1].differences(&configs[0]).len(), 6);
}

#[test]
fn test_single_task_presets() {
    let task = TaskDescriptor::new("LHC10h", "AnalysisResults.root", "SC").unwrap();

    let bootstrap = prepare(window(), &JobDescriptor::new(task.clone()).preset(Preset::Bootstrap))
        .unwrap();
    assert_eq!(bootstrap.len(), 1);
    assert_eq!(bootstrap[0].correlator_settings.symmetric_cumulants.len(), 18);
    assert!(bootstrap[0].correlation_cuts.is_empty());

    let trending =
        prepare(window(), &JobDescriptor::new(task).preset(Preset::Trending)).unwrap();
    assert_eq!(trending.len(), 1);
    let settings = &trending[0].correlator_settings;
    assert_eq!(settings.correlators.len(), 6);
    assert_eq!(
        settings.kinematic_binning[&TrackQuantity::Pt],
        [0.2, 0.34, 0.5, 0.7, 1.0, 2.0, 5.0]
    );
}

#[test]
fn test_outlier_preset() {
    let task = TaskDescriptor::new("LHC10h", "AnalysisResults.root", "QA").unwrap();
    let job = JobDescriptor::new(task).preset(Preset::HighMultiplicityOutliers);
    let configs = prepare(window(), &job).unwrap();

    assert_eq!(configs.len(), 2);
    let (baseline, mul_cor) = (&configs[0], &configs[1]);
    assert_eq!(mul_cor.name, "LHC10h_0.0-10.0_MulCor");
    assert!(baseline.toggles.control_histograms_only);
    assert!(baseline.toggles.qa_histograms_only);

    assert_eq!(baseline.correlation_cuts.len(), 6);
    for (_, cut) in baseline.correlation_cuts_in(EstimatorFamily::Centrality) {
        assert_eq!((cut.slope, cut.offset), (1.0, 10.0));
    }
    assert_eq!(mul_cor.correlation_cuts.len(), 16);
    assert_eq!(mul_cor.differences(baseline).len(), 10);
}

#[test]
fn test_job_analysis_layers_over_preset() {
    let json = r#"{
        "task": {"BaseName": "LHC10h", "GridOutputFile": "f.root", "OutputTDirectory": "d"},
        "preset": "systematics",
        "analysis": {
            "symmetric_cumulants": [[2, 3]],
            "kinematic_binning": {"PT": [0.2, 1.0, 5.0]}
        }
    }"#;
    let job = JobDescriptor::from_json_str(json).unwrap();
    let configs = prepare(window(), &job).unwrap();
    let settings = &configs[0].correlator_settings;

    assert_eq!(settings.symmetric_cumulants, [[2, 3]]);
    assert_eq!(settings.kinematic_binning[&TrackQuantity::Pt], [0.2, 1.0, 5.0]);
    assert_eq!(
        settings.kinematic_binning[&TrackQuantity::Eta],
        [-0.8, -0.4, 0.0, 0.4, 0.8]
    );
}

#[test]
fn test_prepare_is_deterministic() {
    let job = JobDescriptor::from_json_str(JOB).unwrap();
    assert_eq!(prepare(window(), &job).unwrap(), prepare(window(), &job).unwrap());
}

#[test]
fn test_defaults_section_patches_table() {
    let json = r#"{
        "task": {"BaseName": "LHC10h", "GridOutputFile": "f.root", "OutputTDirectory": "d"},
        "defaults": {
            "track": {"TPCCROSSEDROWS": {"min": 70.0, "max": 159.0, "binning": {"per_unit": 1.0}}},
            "filter_bit": 96
        },
        "register_source": true
    }"#;
    let job = JobDescriptor::from_json_str(json).unwrap();
    let configs = prepare(window(), &job).unwrap();

    assert_eq!(configs.len(), 1);
    assert!(configs[0].track_cuts[&TrackQuantity::TpcCrossedRows].active);
    assert_eq!(configs[0].filter_bit.0, 96);
}
