use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use gmqc::core::{Coordinates, RawTrace, ScalarEvent, StandardMetadata, StreamCollection, TraceStats};
use gmqc::{PipelinePool, QcPipeline};
use serde_json::json;

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

fn raw(station: usize, channel: &str, peak: f64) -> RawTrace {
    let data = (0..12000)
        .map(|i| peak * (i as f64 * 0.37).sin() + (i % 7) as f64)
        .collect();
    RawTrace {
        stats: TraceStats {
            network: "CI".to_string(),
            station: format!("S{:02}", station),
            location: "".to_string(),
            channel: channel.to_string(),
            starttime: origin() - Duration::seconds(20),
            sampling_rate: 100.0,
            source_file: format!("s{:02}.json", station),
            coordinates: Coordinates {
                latitude: 34.0 + station as f64 * 0.01,
                longitude: -118.0,
                elevation: 0.0,
            },
            standard: StandardMetadata::default(),
        },
        data,
    }
}

fn traces() -> Vec<RawTrace> {
    (0..12)
        .flat_map(|s| {
            let peak = if s % 3 == 0 { 3.0e6 } else { 4.0e5 };
            vec![raw(s, "HHE", peak), raw(s, "HHN", peak), raw(s, "HHZ", peak)]
        })
        .collect()
}

fn pipeline() -> Arc<QcPipeline> {
    let config = json!({
        "checks": [
            "check_max_amplitude",
            "check_sta_lta",
            "compute_snr",
            {"max_traces": {"n_max": 3}}
        ],
        "pipeline": {"max_concurrent": 3}
    });
    Arc::new(QcPipeline::from_json(config).unwrap())
}

#[tokio::test]
async fn test_pool_matches_sequential_run() {
    let pipeline = pipeline();

    let (mut sequential, _) = StreamCollection::from_traces(traces());
    let expected = pipeline.run(&mut sequential, &event());

    let (collection, _) = StreamCollection::from_traces(traces());
    let pool = PipelinePool::from_pipeline(pipeline.clone());
    assert_eq!(pool.max_concurrent(), 3);
    let (processed, report) = pool.run(collection, &event()).await.unwrap();

    assert_eq!(report, expected);
    let ids: Vec<&str> = processed.streams().iter().map(|s| s.id()).collect();
    let expected_ids: Vec<&str> = sequential.streams().iter().map(|s| s.id()).collect();
    assert_eq!(ids, expected_ids);
    assert_eq!(report.failed_streams.len(), 12);
}

#[tokio::test]
async fn test_pool_with_single_worker() {
    let pool = PipelinePool::new(pipeline(), 0);
    assert_eq!(pool.max_concurrent(), 1);

    let (collection, _) = StreamCollection::from_traces(traces());
    let (processed, report) = pool.run(collection, &event()).await.unwrap();
    assert_eq!(processed.len(), 12);
    assert_eq!(report.traces.len(), 36);
}

#[tokio::test]
async fn test_pool_on_empty_collection() {
    let pool = PipelinePool::from_pipeline(pipeline());
    let (processed, report) = pool.run(StreamCollection::default(), &event()).await.unwrap();
    assert!(processed.is_empty());
    assert!(!report.any_failed());
}
