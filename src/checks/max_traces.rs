use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Outcome, StationStream};

/// Guards against duplicated channels: more than `n_max` traces of one
/// instrument (same location, band and instrument code, e.g. four `HN?`
/// channels at location `00`) fails that whole group.
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "max_traces",
    granularity = "stream",
    description = "Fail instrument groups with more than n_max traces"
)]
#[serde(default, deny_unknown_fields)]
pub struct MaxTracesCheck {
    #[param(default = "3", min = 1.0)]
    pub n_max: usize,
}

impl Default for MaxTracesCheck {
    fn default() -> Self {
        Self { n_max: 3 }
    }
}

impl Check for MaxTracesCheck {
    fn check_stream(&self, stream: &StationStream, _ctx: &CheckContext<'_>) -> Vec<Outcome> {
        let mut outcomes = vec![Outcome::pass(); stream.len()];
        for (instrument, indices) in stream.instrument_groups() {
            if indices.len() <= self.n_max {
                continue;
            }
            let reason = format!(
                "More than {} traces for instrument {} ({} found).",
                self.n_max,
                instrument,
                indices.len()
            );
            for i in indices {
                outcomes[i] = Outcome::fail(reason.clone());
            }
        }
        outcomes
    }
}
