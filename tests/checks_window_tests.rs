use chrono::{DateTime, Duration, TimeZone, Utc};
use gmqc::core::{
    Coordinates, RawTrace, ScalarEvent, StandardMetadata, StationTrace, StreamCollection, TraceStats,
    Verdict,
};
use gmqc::QcPipeline;
use serde_json::{json, Value};

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap()
}

/// About 55.6 km north of the station: the split falls ~7.9 s after origin
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

fn noise(n: usize, amplitude: f64, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            amplitude * (2.0 * unit - 1.0)
        })
        .collect()
}

/// 150 s at 100 sps starting 20 s before origin; `signal` fills the record
/// from 28 s on
fn raw(channel: &str, start_offset: i64, signal: &[f64]) -> RawTrace {
    let mut data = noise(15000, 1.0, 42);
    for (x, s) in data[2800..].iter_mut().zip(signal) {
        *x += s;
    }
    RawTrace {
        stats: TraceStats {
            network: "CI".to_string(),
            station: "PASA".to_string(),
            location: "".to_string(),
            channel: channel.to_string(),
            starttime: origin() + Duration::seconds(start_offset),
            sampling_rate: 100.0,
            source_file: format!("pasa_{}.json", channel),
            coordinates: Coordinates {
                latitude: 34.0,
                longitude: -118.0,
                elevation: 0.0,
            },
            standard: StandardMetadata::default(),
        },
        data,
    }
}

fn strong_signal() -> Vec<f64> {
    noise(12200, 100.0, 9)
}

fn run(config: Value, traces: Vec<RawTrace>) -> StreamCollection {
    let pipeline = QcPipeline::from_json(config).unwrap();
    let (mut collection, errors) = StreamCollection::from_traces(traces);
    assert!(errors.is_empty());
    pipeline.run(&mut collection, &event());
    collection
}

fn only_trace(collection: &StreamCollection) -> &StationTrace {
    &collection.streams()[0].traces()[0]
}

fn verdict_of<'a>(trace: &'a StationTrace, check: &str) -> &'a Verdict {
    &trace
        .audit()
        .iter()
        .find(|r| r.check == check)
        .unwrap_or_else(|| panic!("{} did not run", check))
        .verdict
}

fn rms_ratio_model() -> Value {
    let mut weights = vec![0.0; 11];
    weights[2] = 5.0;
    json!({
        "feature_mean": vec![0.0; 11],
        "feature_std": vec![1.0; 11],
        "layers": [
            {"weights": [weights], "biases": [-5.0], "activation": "sigmoid"}
        ]
    })
}

fn window_checks() -> Value {
    json!({
        "checks": [
            "compute_snr",
            "check_zero_crossings",
            {"NNet_QA": {"model": rms_ratio_model()}}
        ]
    })
}

#[test]
fn test_window_checks_pass_on_clear_signal() {
    let collection = run(window_checks(), vec![raw("HHZ", -20, &strong_signal())]);
    let trace = only_trace(&collection);

    assert!(trace.passed(), "{:?}", trace.failure());
    assert_eq!(verdict_of(trace, "windowing"), &Verdict::Pass);
    assert_eq!(verdict_of(trace, "compute_snr"), &Verdict::Pass);
    assert_eq!(verdict_of(trace, "check_zero_crossings"), &Verdict::Pass);
    assert_eq!(verdict_of(trace, "NNet_QA"), &Verdict::Pass);

    let params = trace.parameters();
    let snr = params.snr.as_ref().unwrap();
    assert_eq!(snr.freqs.len(), 100);
    assert!(snr.in_band(0.2, 5.0).all(|(_, s)| s > 3.0));
    assert!(params.zero_crossing_rate.unwrap() > 10.0);
    assert!(params.nnet_score.unwrap() > 0.9);
}

#[test]
fn test_snr_fails_without_signal() {
    let collection = run(window_checks(), vec![raw("HHZ", -20, &[])]);
    let trace = only_trace(&collection);

    let (check, reason) = trace.failure().unwrap();
    assert_eq!(check, "compute_snr");
    assert!(reason.contains("does not exceed"), "{}", reason);
    // later checks still ran
    assert!(matches!(verdict_of(trace, "NNet_QA"), Verdict::Fail(_)));
    assert!(trace.parameters().nnet_score.unwrap() < 0.5);
}

#[test]
fn test_snr_annotates_only_when_check_disabled() {
    let config = json!({"checks": [{"compute_snr": {"check": false}}]});
    let collection = run(config, vec![raw("HHZ", -20, &[])]);
    let trace = only_trace(&collection);

    assert!(trace.passed());
    assert!(matches!(verdict_of(trace, "compute_snr"), Verdict::Skipped(_)));
    assert!(trace.parameters().snr.is_some());
}

#[test]
fn test_snr_band_above_nyquist_fails() {
    let config = json!({"checks": [{"compute_snr": {"min_freq": 60.0, "max_freq": 80.0}}]});
    let collection = run(config, vec![raw("HHZ", -20, &strong_signal())]);
    let (_, reason) = only_trace(&collection).failure().unwrap();
    assert!(reason.starts_with("No SNR frequencies"), "{}", reason);
}

#[test]
fn test_zero_crossings_fail_on_drift() {
    let ramp: Vec<f64> = (0..12200).map(|i| i as f64).collect();
    let config = json!({"checks": [{"check_zero_crossings": {"min_crossings": 0.1}}]});
    let collection = run(config, vec![raw("HHZ", -20, &ramp)]);
    let trace = only_trace(&collection);

    assert_eq!(trace.failure().unwrap().0, "check_zero_crossings");
    assert!(trace.parameters().zero_crossing_rate.unwrap() < 0.1);
}

#[test]
fn test_insufficient_noise_is_a_dependency_failure() {
    // record starts after the estimated arrival
    let collection = run(window_checks(), vec![raw("HHZ", 10, &strong_signal())]);
    let trace = only_trace(&collection);

    let (check, reason) = trace.failure().unwrap();
    assert_eq!(check, "windowing");
    assert!(reason.starts_with("insufficient noise window"));

    for name in ["compute_snr", "check_zero_crossings", "NNet_QA"] {
        match verdict_of(trace, name) {
            Verdict::DependencyFailed(why) => {
                assert!(why.starts_with("insufficient noise window"));
                assert!(why.ends_with("(event ci40000000)"));
            }
            other => panic!("{} gave {:?}", name, other),
        }
    }

    let params = trace.parameters();
    assert!(params.snr.is_none());
    assert!(params.zero_crossing_rate.is_none());
    assert!(params.nnet_score.is_none());
}
