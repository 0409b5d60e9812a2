use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::outcome::{CheckRecord, Outcome, Verdict};
use super::params::TraceParameters;
use super::state::TraceState;
use crate::windows::{SignalWindows, WindowError};

/// Physical units of the sample values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "counts")]
    Counts,
    #[serde(rename = "acc")]
    Acceleration,
    #[serde(rename = "vel")]
    Velocity,
    #[serde(rename = "disp")]
    Displacement,
}

/// Reader-independent metadata attached to every trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardMetadata {
    pub units: Units,
    pub free_field: bool,
    pub instrument: String,
    pub source_format: String,
}

impl Default for StandardMetadata {
    fn default() -> Self {
        Self {
            units: Units::Counts,
            free_field: true,
            instrument: String::new(),
            source_format: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
}

/// Header of a single-channel recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStats {
    pub network: String,
    pub station: String,
    #[serde(default)]
    pub location: String,
    pub channel: String,
    pub starttime: DateTime<Utc>,
    pub sampling_rate: f64,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub standard: StandardMetadata,
}

impl TraceStats {
    /// Sample interval in seconds
    pub fn delta(&self) -> f64 {
        1.0 / self.sampling_rate
    }
}

/// One continuous single-channel time series plus its QC bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct StationTrace {
    pub stats: TraceStats,
    pub data: Vec<f64>,
    parameters: TraceParameters,
    state: TraceState,
    audit: Vec<CheckRecord>,
}

impl StationTrace {
    pub fn new(stats: TraceStats, data: Vec<f64>) -> Self {
        Self {
            stats,
            data,
            parameters: TraceParameters::default(),
            state: TraceState::Unchecked,
            audit: Vec::new(),
        }
    }

    /// `NET.STA.LOC.CHA`
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.stats.network, self.stats.station, self.stats.location, self.stats.channel
        )
    }

    pub fn npts(&self) -> usize {
        self.data.len()
    }

    /// Time spanned from the first to the last sample, in seconds
    pub fn duration(&self) -> f64 {
        self.npts().saturating_sub(1) as f64 * self.stats.delta()
    }

    /// `None` when the end falls outside the representable time range
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        offset_by_seconds(self.stats.starttime, self.duration())
    }

    pub fn time_at(&self, index: usize) -> Option<DateTime<Utc>> {
        offset_by_seconds(self.stats.starttime, index as f64 * self.stats.delta())
    }

    /// Fractional sample position of `time`; negative before the first sample
    pub fn position_of(&self, time: DateTime<Utc>) -> f64 {
        seconds_between(self.stats.starttime, time) * self.stats.sampling_rate
    }

    /// SEED instrument code (second character of the channel code)
    pub fn instrument_code(&self) -> Option<char> {
        self.stats.channel.chars().nth(1)
    }

    /// Band and instrument code, e.g. `HN` for `HNZ`
    pub fn instrument_prefix(&self) -> &str {
        let channel = self.stats.channel.as_str();
        channel.get(..2).unwrap_or(channel)
    }

    /// `NET.STA.LOC.BI`: the traces of one instrument at one site
    pub fn instrument_id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.stats.network,
            self.stats.station,
            self.stats.location,
            self.instrument_prefix()
        )
    }

    /// Accelerometers (instrument code `N`) are strong-motion sensors
    pub fn is_strong_motion(&self) -> bool {
        self.instrument_code() == Some('N')
    }

    pub fn is_horizontal(&self) -> bool {
        !matches!(self.stats.channel.chars().nth(2), Some('Z') | None)
    }

    pub fn parameters(&self) -> &TraceParameters {
        &self.parameters
    }

    pub fn state(&self) -> &TraceState {
        &self.state
    }

    pub fn audit(&self) -> &[CheckRecord] {
        &self.audit
    }

    pub fn passed(&self) -> bool {
        !self.state.is_failed()
    }

    /// First failure as (check, reason)
    pub fn failure(&self) -> Option<(&str, &str)> {
        match &self.state {
            TraceState::Failed { check, reason } => Some((check, reason)),
            _ => None,
        }
    }

    /// Mark the trace failed. Returns false when an earlier failure is kept.
    pub fn fail(&mut self, check: &str, reason: impl Into<String>) -> bool {
        let target = TraceState::Failed {
            check: check.to_string(),
            reason: reason.into(),
        };
        if !self.state.can_transition_to(&target) {
            return false;
        }
        if let TraceState::Failed { reason, .. } = &target {
            debug!("{} failed {}: {}", self.id(), check, reason);
        }
        self.state = target;
        true
    }

    pub(crate) fn set_windows(&mut self, windows: Result<SignalWindows, WindowError>) {
        self.parameters.windows = Some(windows);
    }

    /// Apply a check outcome: store its annotation, advance the state and
    /// append it to the audit trail
    pub fn record(&mut self, check: &str, outcome: Outcome) {
        let Outcome { verdict, annotation } = outcome;

        if let Some(annotation) = annotation {
            self.parameters.apply(annotation);
        }

        match &verdict {
            Verdict::Pass => {
                if self.state.can_transition_to(&TraceState::Passed) {
                    self.state = TraceState::Passed;
                }
            }
            Verdict::Fail(reason) | Verdict::DependencyFailed(reason) => {
                self.fail(check, reason.clone());
            }
            Verdict::Skipped(_) => {}
        }

        self.audit.push(CheckRecord {
            check: check.to_string(),
            verdict,
        });
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let elapsed = to - from;
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => elapsed.num_milliseconds() as f64 / 1e3,
    }
}

/// `time` shifted by `seconds`; `None` on overflow or a non-finite offset
pub(crate) fn offset_by_seconds(time: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    // float to int casts saturate, and i64::MAX us is still a valid delta
    time.checked_add_signed(Duration::microseconds((seconds * 1e6).round() as i64))
}
