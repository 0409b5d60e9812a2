//! Event and waveform files read by the `gmqc` runner.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::RawTrace;

/// A waveform file holds a single trace or a list of traces
#[derive(Deserialize)]
#[serde(untagged)]
enum WaveformFile {
    Many(Vec<RawTrace>),
    One(RawTrace),
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read every waveform file, tagging traces with their source file.
///
/// Unreadable or malformed files are logged and skipped; the run only stops
/// when none of them could be loaded.
pub async fn read_waveforms(paths: &[PathBuf]) -> Result<Vec<RawTrace>> {
    let mut traces = Vec::new();
    let mut loaded = 0;

    for path in paths {
        let file: WaveformFile = match read_json(path).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Skipping waveform file {}: {:#}", path.display(), e);
                continue;
            }
        };
        loaded += 1;

        let batch = match file {
            WaveformFile::Many(batch) => batch,
            WaveformFile::One(trace) => vec![trace],
        };
        for mut trace in batch {
            if trace.stats.source_file.is_empty() {
                trace.stats.source_file = path.display().to_string();
            }
            traces.push(trace);
        }
    }

    if loaded == 0 {
        bail!("None of the {} waveform files could be loaded", paths.len());
    }
    Ok(traces)
}
