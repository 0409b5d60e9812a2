use chrono::{DateTime, Duration, TimeZone, Utc};
use gmqc::checks::{Check, CheckContext};
use gmqc::core::{
    Coordinates, Outcome, RawTrace, ScalarEvent, StandardMetadata, StationStream, StreamCollection,
    TraceState, TraceStats, Units, Verdict,
};
use gmqc::metrics::peak_motions;
use gmqc::registry::{CheckMetadata, CheckRegistry, Granularity};
use gmqc::windows::WindowError;
use gmqc::{QcConfig, QcPipeline};
use serde_json::{json, Value};

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap()
}

fn event() -> ScalarEvent {
    ScalarEvent {
        id: "ci40000000".to_string(),
        time: origin(),
        latitude: 34.5,
        longitude: -118.0,
        depth_km: 10.0,
        magnitude: 4.5,
    }
}

/// 150 s of a 1 Hz sine with the given peak, starting 20 s before origin
fn raw(station: &str, channel: &str, peak: f64) -> RawTrace {
    let data = (0..15000)
        .map(|i| peak * (2.0 * std::f64::consts::PI * i as f64 / 100.0 + 0.5).sin())
        .collect();
    RawTrace {
        stats: TraceStats {
            network: "CI".to_string(),
            station: station.to_string(),
            location: "".to_string(),
            channel: channel.to_string(),
            starttime: origin() - Duration::seconds(20),
            sampling_rate: 100.0,
            source_file: format!("{}_{}.json", station.to_lowercase(), channel),
            coordinates: Coordinates {
                latitude: 34.0,
                longitude: -118.0,
                elevation: 0.0,
            },
            standard: StandardMetadata {
                free_field: true,
                ..StandardMetadata::default()
            },
        },
        data,
    }
}

/// Accelerometer trace at `location`, in acceleration units
fn accelerometer(location: &str, channel: &str) -> RawTrace {
    let mut trace = raw("PASA", channel, 0.5);
    trace.stats.location = location.to_string();
    trace.stats.standard.units = Units::Acceleration;
    trace
}

fn scenario_config() -> Value {
    json!({
        "checks": [
            {"check_free_field": {"reject_non_free_field": true}},
            {"check_max_amplitude": {"min": 10, "max": 800000}},
            {"max_traces": {"n_max": 2}}
        ]
    })
}

fn collect(traces: Vec<RawTrace>) -> StreamCollection {
    let (collection, errors) = StreamCollection::from_traces(traces);
    assert!(errors.is_empty());
    collection
}

#[test]
fn test_duplicate_channel_fails_max_traces_for_whole_group() {
    let pipeline = QcPipeline::from_json(scenario_config()).unwrap();
    let mut collection = collect(vec![
        raw("PASA", "HHE", 500000.0),
        raw("PASA", "HHN", 500000.0),
        raw("PASA", "HHZ", 500000.0),
    ]);

    let report = pipeline.run(&mut collection, &event());
    let stream = &collection.streams()[0];
    assert_eq!(stream.len(), 3);
    assert!(!stream.passed());

    for trace in stream.traces() {
        let verdicts: Vec<(&str, &Verdict)> =
            trace.audit().iter().map(|r| (r.check.as_str(), &r.verdict)).collect();
        assert_eq!(verdicts[0], ("windowing", &Verdict::Pass));
        assert_eq!(verdicts[1], ("check_free_field", &Verdict::Pass));
        assert_eq!(verdicts[2], ("check_max_amplitude", &Verdict::Pass));
        assert_eq!(verdicts[3].0, "max_traces");
        assert_eq!(trace.failure().unwrap().0, "max_traces");
    }

    assert_eq!(report.failed_streams, ["CI.PASA..HH"]);
    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.failures[0].trace_id, "CI.PASA..HHE");
    assert_eq!(report.failures[0].source_file, "pasa_HHE.json");
}

#[test]
fn test_two_channels_pass_scenario() {
    let pipeline = QcPipeline::from_json(scenario_config()).unwrap();
    let mut collection = collect(vec![raw("PASA", "HHE", 500000.0), raw("PASA", "HHN", 500000.0)]);

    let report = pipeline.run(&mut collection, &event());
    assert!(!report.any_failed());
    assert_eq!(report.summary(), None);
    assert!(collection.streams()[0]
        .traces()
        .iter()
        .all(|t| t.state() == &TraceState::Passed));
}

#[test]
fn test_first_failure_is_kept_and_later_checks_still_run() {
    let config = json!({
        "checks": [
            {"check_max_amplitude": {"min": 10, "max": 800000}},
            {"min_sample_rate": {"min_sps": 200}},
            "check_free_field"
        ]
    });
    let pipeline = QcPipeline::from_json(config).unwrap();
    let mut collection = collect(vec![raw("PASA", "HHZ", 900000.0)]);
    pipeline.run(&mut collection, &event());

    let trace = &collection.streams()[0].traces()[0];
    let (check, reason) = trace.failure().unwrap();
    assert_eq!(check, "check_max_amplitude");
    assert!(reason.contains("exceeds"));

    assert_eq!(trace.audit().len(), 4);
    assert!(matches!(trace.audit()[2].verdict, Verdict::Fail(_)));
    assert_eq!(trace.audit()[3].verdict, Verdict::Pass);
}

#[test]
fn test_streams_are_independent() {
    let pipeline = QcPipeline::from_json(scenario_config()).unwrap();
    let mut collection = collect(vec![
        raw("PASA", "HHE", 500000.0),
        raw("ADO", "HHE", 900000.0),
        raw("PASA", "HHN", 500000.0),
    ]);

    let report = pipeline.run(&mut collection, &event());
    assert_eq!(report.passed_streams, ["CI.PASA..HH"]);
    assert_eq!(report.failed_streams, ["CI.ADO..HH"]);
    assert_eq!(collection.passed_streams().count(), 1);
    assert_eq!(collection.get("CI.PASA..HH").unwrap().len(), 2);
}

#[test]
fn test_runs_are_deterministic() {
    let config = json!({
        "checks": [
            {"check_max_amplitude": {"min": 10, "max": 800000}},
            "check_sta_lta",
            "compute_snr",
            "check_zero_crossings",
            {"max_traces": {"n_max": 2}}
        ]
    });
    let traces = vec![
        raw("PASA", "HHE", 500000.0),
        raw("PASA", "HHN", 500000.0),
        raw("PASA", "HHZ", 500000.0),
        raw("ADO", "HNZ", 0.5),
    ];

    let pipeline = QcPipeline::from_json(config.clone()).unwrap();
    let mut first = collect(traces.clone());
    let first_report = pipeline.run(&mut first, &event());

    let pipeline = QcPipeline::from_json(config).unwrap();
    let mut second = collect(traces);
    let second_report = pipeline.run(&mut second, &event());

    assert_eq!(first_report, second_report);
    assert_eq!(first_report.to_csv().unwrap(), second_report.to_csv().unwrap());
}

#[test]
fn test_empty_check_list_only_windows() {
    let pipeline = QcPipeline::from_json(json!({})).unwrap();
    let mut collection = collect(vec![raw("PASA", "HHZ", 1.0)]);
    let report = pipeline.run(&mut collection, &event());

    let trace = &collection.streams()[0].traces()[0];
    assert_eq!(trace.audit().len(), 1);
    assert!(trace.parameters().signal_windows().is_ok());
    assert!(!report.any_failed());
}

#[test]
fn test_monitor_counts_outcomes() {
    let pipeline = QcPipeline::from_json(scenario_config()).unwrap();
    let mut collection = collect(vec![
        raw("PASA", "HHE", 500000.0),
        raw("PASA", "HHN", 500000.0),
        raw("PASA", "HHZ", 500000.0),
    ]);
    pipeline.run(&mut collection, &event());

    let snapshot = pipeline.monitor().collector().snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[0].check_name, "check_free_field");
    assert_eq!(snapshot[0].passed, 3);
    assert_eq!(snapshot[2].check_name, "max_traces");
    assert_eq!(snapshot[2].failed, 3);

    let report = pipeline.monitor().generate_report();
    assert!(report.contains("[max_traces]"));
    assert!(report.contains("0 passed, 3 failed"));
}

#[test]
fn test_colocated_accelerometers_are_separate_instruments() {
    let pipeline = QcPipeline::from_json(json!({"checks": [{"max_traces": {"n_max": 3}}]})).unwrap();
    let mut collection = collect(
        ["00", "10"]
            .iter()
            .flat_map(|loc| ["HNE", "HNN", "HNZ"].map(|cha| accelerometer(loc, cha)))
            .collect(),
    );

    let report = pipeline.run(&mut collection, &event());
    assert_eq!(report.passed_streams, ["CI.PASA.00.HN", "CI.PASA.10.HN"]);
    assert!(report.failures.is_empty());
    assert_eq!(peak_motions(&collection).len(), 6);
}

#[test]
fn test_broadband_and_strong_motion_checked_independently() {
    let pipeline = QcPipeline::from_json(json!({"checks": ["check_instrument"]})).unwrap();
    let mut collection = collect(
        ["HHE", "HHN", "HHZ", "HNE", "HNN", "HNZ"]
            .iter()
            .map(|cha| accelerometer("", cha))
            .collect(),
    );
    let report = pipeline.run(&mut collection, &event());
    assert_eq!(report.passed_streams, ["CI.PASA..HH", "CI.PASA..HN"]);

    // a duplicated strong-motion channel fails only that instrument
    let mut collection = collect(
        ["HHE", "HHN", "HHZ", "HNE", "HNN", "HNZ", "HN1"]
            .iter()
            .map(|cha| accelerometer("", cha))
            .collect(),
    );
    let report = pipeline.run(&mut collection, &event());
    assert_eq!(report.passed_streams, ["CI.PASA..HH"]);
    assert_eq!(report.failed_streams, ["CI.PASA..HN"]);
    assert_eq!(report.failures.len(), 4);
    assert!(report.failures[0].reason.starts_with("More than 3 traces in stream"));

    let rows = peak_motions(&collection);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.stream_id == "CI.PASA..HH"));
}

#[test]
fn test_out_of_range_split_fails_windowing() {
    let pipeline = QcPipeline::from_json(json!({
        "windows": {"signal_split": {"method": "velocity", "vsplit": 1e-15}},
        "checks": ["compute_snr"]
    }))
    .unwrap();
    let mut collection = collect(vec![raw("PASA", "HHZ", 1.0)]);
    let report = pipeline.run(&mut collection, &event());

    let trace = &collection.streams()[0].traces()[0];
    assert_eq!(trace.failure().unwrap().0, "windowing");
    assert!(matches!(
        trace.parameters().windows,
        Some(Err(WindowError::TimeOutOfRange { .. }))
    ));
    assert!(matches!(trace.audit()[1].verdict, Verdict::DependencyFailed(_)));
    assert_eq!(report.failed_streams, ["CI.PASA..HH"]);
}

/// Stream check that only ever decides on the first trace
#[derive(Debug)]
struct FirstTraceOnly;

impl Check for FirstTraceOnly {
    fn check_stream(&self, _stream: &StationStream, _ctx: &CheckContext<'_>) -> Vec<Outcome> {
        vec![Outcome::pass()]
    }
}

fn first_trace_only(_params: &Value) -> Result<Box<dyn Check>, serde_json::Error> {
    Ok(Box::new(FirstTraceOnly))
}

#[test]
fn test_missing_outcomes_become_dependency_failures() {
    let mut registry = CheckRegistry::builtin();
    registry.register(CheckMetadata {
        name: "first_trace_only".to_string(),
        granularity: Granularity::Stream,
        description: "Decides on the first trace only".to_string(),
        parameters: Vec::new(),
        factory: first_trace_only,
    });
    let config = QcConfig::from_json(json!({"checks": ["first_trace_only"]})).unwrap();
    let pipeline = QcPipeline::with_registry(config, &registry).unwrap();

    let mut collection = collect(vec![raw("PASA", "HHE", 1.0), raw("PASA", "HHN", 1.0)]);
    let report = pipeline.run(&mut collection, &event());

    let traces = collection.streams()[0].traces();
    assert_eq!(traces[0].audit()[1].verdict, Verdict::Pass);
    assert_eq!(traces[1].audit().len(), 2);
    assert!(matches!(traces[1].audit()[1].verdict, Verdict::DependencyFailed(_)));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].check, "first_trace_only");

    let snapshot = pipeline.monitor().collector().snapshot();
    assert_eq!(snapshot[0].passed, 1);
    assert_eq!(snapshot[0].dependency_failures, 1);
}
