//! Signal/noise windowing.
//!
//! Runs once per stream before any check. The split time and the end of
//! the signal are shared by all traces of a stream; each trace converts them
//! to its own sample indices and is checked against the minimum durations.

pub mod config;
pub mod types;

pub use config::{EndMethod, SplitMethod, WindowChecks, WindowConfig};
pub use types::{SignalWindows, WindowError};

use chrono::{DateTime, Utc};
use log::warn;

use crate::core::trace::offset_by_seconds;
use crate::core::{ScalarEvent, StationStream, StationTrace};
use crate::dsp::sta_lta::{classic_sta_lta, first_trigger};
use crate::dsp::stats::demean;

/// Signal duration (s) by magnitude, interpolated linearly between rows
const MAGNITUDE_DURATIONS: [(f64, f64); 4] = [(1.5, 20.0), (3.0, 60.0), (4.5, 180.0), (6.0, 600.0)];

/// Fallback phase velocity (km/s) when the picker does not trigger
const FALLBACK_VSPLIT: f64 = 7.0;

/// Windows for every trace of `stream`, in trace order
pub fn compute_windows(
    stream: &StationStream,
    event: &ScalarEvent,
    config: &WindowConfig,
) -> Vec<Result<SignalWindows, WindowError>> {
    if let Err(reason) = event.validate() {
        return stream
            .traces()
            .iter()
            .map(|_| Err(WindowError::InvalidEvent(reason.clone())))
            .collect();
    }

    let coordinates = stream.coordinates().unwrap_or_default();
    let distance = event.epicentral_distance_km(&coordinates);
    let bounds = estimate_split(stream, event, distance, &config.signal_split)
        .and_then(|split| Ok((split, estimate_end(event, distance, &config.signal_end)?)));
    let ((split_time, split_method), end_time) = match bounds {
        Ok(bounds) => bounds,
        Err(e) => return stream.traces().iter().map(|_| Err(e.clone())).collect(),
    };

    stream
        .traces()
        .iter()
        .map(|trace| window_trace(trace, split_time, end_time, split_method, &config.window_checks))
        .collect()
}

pub fn magnitude_duration(magnitude: f64) -> f64 {
    let first = MAGNITUDE_DURATIONS[0];
    let last = MAGNITUDE_DURATIONS[MAGNITUDE_DURATIONS.len() - 1];
    if magnitude <= first.0 {
        return first.1;
    }
    for pair in MAGNITUDE_DURATIONS.windows(2) {
        let ((m0, d0), (m1, d1)) = (pair[0], pair[1]);
        if magnitude <= m1 {
            return d0 + (d1 - d0) * (magnitude - m0) / (m1 - m0);
        }
    }
    last.1
}

fn after_origin(event: &ScalarEvent, what: &str, seconds: f64) -> Result<DateTime<Utc>, WindowError> {
    offset_by_seconds(event.time, seconds).ok_or_else(|| WindowError::TimeOutOfRange {
        what: what.to_string(),
        offset_s: seconds,
    })
}

fn estimate_split(
    stream: &StationStream,
    event: &ScalarEvent,
    distance: f64,
    method: &SplitMethod,
) -> Result<(DateTime<Utc>, &'static str), WindowError> {
    match method {
        SplitMethod::Velocity { vsplit } => {
            Ok((after_origin(event, "split time", distance / vsplit)?, "velocity"))
        }
        SplitMethod::StaLta { sta_length, lta_length, threshold } => {
            let onset = stream
                .traces()
                .iter()
                .filter_map(|trace| {
                    let sr = trace.stats.sampling_rate;
                    let nsta = (sta_length * sr).round().max(1.0) as usize;
                    let nlta = (lta_length * sr).round().max(1.0) as usize;
                    let ratio = classic_sta_lta(&demean(&trace.data), nsta, nlta);
                    first_trigger(&ratio, *threshold).and_then(|i| trace.time_at(i))
                })
                .min();

            match onset {
                Some(time) => Ok((time, "sta_lta")),
                None => {
                    warn!(
                        "No STA/LTA trigger for {}, using {} km/s velocity split",
                        stream.id(),
                        FALLBACK_VSPLIT
                    );
                    Ok((after_origin(event, "split time", distance / FALLBACK_VSPLIT)?, "velocity"))
                }
            }
        }
    }
}

/// `None` means the end of each record
fn estimate_end(
    event: &ScalarEvent,
    distance: f64,
    method: &EndMethod,
) -> Result<Option<DateTime<Utc>>, WindowError> {
    match method {
        EndMethod::Velocity { vmin, floor } => {
            after_origin(event, "signal end", floor.max(distance / vmin)).map(Some)
        }
        EndMethod::Magnitude => {
            after_origin(event, "signal end", magnitude_duration(event.magnitude)).map(Some)
        }
        EndMethod::None => Ok(None),
    }
}

fn window_trace(
    trace: &StationTrace,
    split_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    split_method: &str,
    checks: &WindowChecks,
) -> Result<SignalWindows, WindowError> {
    let npts = trace.npts();
    let delta = trace.stats.delta();
    let last = npts.saturating_sub(1) as f64;

    let split_index = trace.position_of(split_time).round().clamp(0.0, npts as f64) as usize;
    let end_pos = end_time.map_or(last, |t| trace.position_of(t)).min(last);
    let end_index = if end_pos < 0.0 {
        0
    } else {
        (end_pos.round() as usize + 1).min(npts)
    };

    let (min_noise, min_signal) = if checks.enabled {
        (checks.min_noise_duration, checks.min_signal_duration)
    } else {
        (0.0, 0.0)
    };

    let noise_seconds = split_index as f64 * delta;
    if split_index == 0 || noise_seconds < min_noise {
        return Err(WindowError::InsufficientNoise {
            available: noise_seconds,
            required: min_noise,
        });
    }

    let signal_seconds = end_index.saturating_sub(split_index) as f64 * delta;
    if end_index <= split_index || signal_seconds < min_signal {
        return Err(WindowError::InsufficientSignal {
            available: signal_seconds,
            required: min_signal,
        });
    }

    Ok(SignalWindows {
        split_time,
        end_time: trace.time_at(end_index - 1),
        split_method: split_method.to_string(),
        split_index,
        end_index,
    })
}
