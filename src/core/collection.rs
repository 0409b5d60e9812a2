use log::warn;
use serde::{Deserialize, Serialize};

use super::stream::StationStream;
use super::trace::{StationTrace, TraceStats};
use crate::error::InputError;

/// A trace as handed over by a format reader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrace {
    pub stats: TraceStats,
    pub data: Vec<f64>,
}

/// All streams recorded for one event, one per instrument at a station
/// (`NET.STA.LOC.BI`), so co-located sensors are checked independently.
///
/// Membership is fixed at construction; only trace state and parameters
/// change while the pipeline runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamCollection {
    streams: Vec<StationStream>,
}

impl StreamCollection {
    /// Validate raw traces and group them by instrument in first-seen order.
    ///
    /// Invalid traces are left out and returned as errors; each one is also
    /// logged with its source file.
    pub fn from_traces<I>(traces: I) -> (Self, Vec<InputError>)
    where
        I: IntoIterator<Item = RawTrace>,
    {
        let mut streams: Vec<StationStream> = Vec::new();
        let mut errors = Vec::new();

        for raw in traces {
            let trace = StationTrace::new(raw.stats, raw.data);
            if let Err(e) = validate(&trace) {
                warn!("Excluding trace from {}: {}", e.source_file(), e);
                errors.push(e);
                continue;
            }

            let stream_id = trace.instrument_id();
            match streams.iter_mut().find(|s| s.id() == stream_id) {
                Some(stream) => stream.push(trace),
                None => {
                    let mut stream = StationStream::new(stream_id);
                    stream.push(trace);
                    streams.push(stream);
                }
            }
        }

        (Self { streams }, errors)
    }

    pub(crate) fn from_streams(streams: Vec<StationStream>) -> Self {
        Self { streams }
    }

    pub(crate) fn into_streams(self) -> Vec<StationStream> {
        self.streams
    }

    pub fn streams(&self) -> &[StationStream] {
        &self.streams
    }

    pub fn streams_mut(&mut self) -> std::slice::IterMut<'_, StationStream> {
        self.streams.iter_mut()
    }

    pub fn get(&self, id: &str) -> Option<&StationStream> {
        self.streams.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn passed_streams(&self) -> impl Iterator<Item = &StationStream> {
        self.streams.iter().filter(|s| s.passed())
    }

    pub fn failed_streams(&self) -> impl Iterator<Item = &StationStream> {
        self.streams.iter().filter(|s| !s.passed())
    }
}

fn validate(trace: &StationTrace) -> Result<(), InputError> {
    let source_file = trace.stats.source_file.clone();
    let trace_id = trace.id();
    let channel = &trace.stats.channel;

    if channel.len() != 3 || !channel.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(InputError::MalformedChannel {
            source_file,
            trace_id,
            channel: channel.clone(),
        });
    }
    let sampling_rate = trace.stats.sampling_rate;
    if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
        return Err(InputError::InvalidSamplingRate {
            source_file,
            trace_id,
            sampling_rate,
        });
    }
    if trace.data.is_empty() {
        return Err(InputError::EmptyData { source_file, trace_id });
    }
    if trace.data.iter().any(|x| !x.is_finite()) {
        return Err(InputError::NonFiniteSamples { source_file, trace_id });
    }
    Ok(())
}
