//! Consolidated QA outcome of a run.
//!
//! Failures are collected into an ordered list of `FailureRecord`s (stream
//! order, then trace order) and only turned into CSV or JSON at the end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{StreamCollection, TraceParameters};

/// First failure of one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub source_file: String,
    pub trace_id: String,
    pub check: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub stream_id: String,
    pub trace_id: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureRecord>,
    pub parameters: TraceParameters,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QaReport {
    pub passed_streams: Vec<String>,
    pub failed_streams: Vec<String>,
    pub failures: Vec<FailureRecord>,
    pub traces: Vec<TraceSummary>,
}

impl QaReport {
    pub fn from_collection(collection: &StreamCollection) -> Self {
        let mut report = Self::default();

        for stream in collection.streams() {
            if stream.passed() {
                report.passed_streams.push(stream.id().to_string());
            } else {
                report.failed_streams.push(stream.id().to_string());
            }

            for trace in stream.traces() {
                let failure = trace.failure().map(|(check, reason)| FailureRecord {
                    source_file: trace.stats.source_file.clone(),
                    trace_id: trace.id(),
                    check: check.to_string(),
                    reason: reason.to_string(),
                });
                if let Some(record) = &failure {
                    report.failures.push(record.clone());
                }
                report.traces.push(TraceSummary {
                    stream_id: stream.id().to_string(),
                    trace_id: trace.id(),
                    passed: trace.passed(),
                    failure,
                    parameters: trace.parameters().clone(),
                });
            }
        }

        report
    }

    pub fn any_failed(&self) -> bool {
        !self.failed_streams.is_empty()
    }

    /// Number of failed traces and how often each reason occurred
    pub fn summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.failures {
            *histogram.entry(record.reason.as_str()).or_default() += 1;
        }

        let mut text = format!(
            "{} of {} traces failed QA ({} of {} streams):",
            self.failures.len(),
            self.traces.len(),
            self.failed_streams.len(),
            self.passed_streams.len() + self.failed_streams.len()
        );
        for (reason, count) in histogram {
            text.push_str(&format!("\n  {:>4}  {}", count, reason));
        }
        Some(text)
    }

    /// Failure table as CSV, header first
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        write_csv(&["source_file", "trace_id", "check", "reason"], &self.failures)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialize `rows` below `header`; the header is written even without rows
pub(crate) fn write_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
