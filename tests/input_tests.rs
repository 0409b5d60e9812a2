use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use gmqc::core::{Coordinates, RawTrace, StandardMetadata, TraceStats};
use gmqc::input::read_waveforms;
use tempfile::TempDir;

fn raw(channel: &str) -> RawTrace {
    RawTrace {
        stats: TraceStats {
            network: "CI".to_string(),
            station: "PASA".to_string(),
            location: "".to_string(),
            channel: channel.to_string(),
            starttime: Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap(),
            sampling_rate: 100.0,
            source_file: String::new(),
            coordinates: Coordinates::default(),
            standard: StandardMetadata::default(),
        },
        data: vec![0.0, 1.0, 0.0],
    }
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_unreadable_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let single = write(&dir, "hnz.json", &serde_json::to_string(&raw("HNZ")).unwrap());
    let list = write(
        &dir,
        "horizontals.json",
        &serde_json::to_string(&vec![raw("HNE"), raw("HNN")]).unwrap(),
    );
    let garbage = write(&dir, "broken.json", "{ not json");
    let missing = dir.path().join("missing.json");

    let traces = read_waveforms(&[garbage, single.clone(), missing, list.clone()])
        .await
        .unwrap();

    let channels: Vec<&str> = traces.iter().map(|t| t.stats.channel.as_str()).collect();
    assert_eq!(channels, ["HNZ", "HNE", "HNN"]);
    assert_eq!(traces[0].stats.source_file, single.display().to_string());
    assert_eq!(traces[2].stats.source_file, list.display().to_string());
}

#[tokio::test]
async fn test_source_file_from_record_is_kept() {
    let dir = TempDir::new().unwrap();
    let mut trace = raw("HNZ");
    trace.stats.source_file = "PASA.V2".to_string();
    let path = write(&dir, "pasa.json", &serde_json::to_string(&trace).unwrap());

    let traces = read_waveforms(&[path]).await.unwrap();
    assert_eq!(traces[0].stats.source_file, "PASA.V2");
}

#[tokio::test]
async fn test_fails_when_nothing_loads() {
    let dir = TempDir::new().unwrap();
    let garbage = write(&dir, "broken.json", "[1, 2");

    let err = read_waveforms(&[garbage, dir.path().join("missing.json")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("None of the 2 waveform files"));
}
