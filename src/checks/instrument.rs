use anyhow::{bail, Result};
use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Outcome, StationStream};

/// Stream completeness: trace count bounds and, optionally, two horizontals
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_instrument",
    granularity = "stream",
    description = "Fail streams with too few or too many traces, or missing horizontal components"
)]
#[serde(default, deny_unknown_fields)]
pub struct InstrumentCheck {
    #[param(default = "3", min = 1.0)]
    pub n_max: usize,

    #[param(default = "2", min = 1.0)]
    pub n_min: usize,

    #[param(default = "false")]
    pub require_two_horiz: bool,
}

impl Default for InstrumentCheck {
    fn default() -> Self {
        Self {
            n_max: 3,
            n_min: 2,
            require_two_horiz: false,
        }
    }
}

impl InstrumentCheck {
    fn failure(&self, stream: &StationStream) -> Option<String> {
        let n = stream.len();
        if n > self.n_max {
            return Some(format!("More than {} traces in stream ({} found).", self.n_max, n));
        }
        if n < self.n_min {
            return Some(format!("Fewer than {} traces in stream ({} found).", self.n_min, n));
        }
        if self.require_two_horiz {
            let horizontals = stream.traces().iter().filter(|tr| tr.is_horizontal()).count();
            if horizontals != 2 {
                return Some(format!(
                    "Stream needs two horizontal components ({} found).",
                    horizontals
                ));
            }
        }
        None
    }
}

impl Check for InstrumentCheck {
    fn prepare(&mut self) -> Result<()> {
        if self.n_min > self.n_max {
            bail!("n_min ({}) must not exceed n_max ({})", self.n_min, self.n_max);
        }
        Ok(())
    }

    fn check_stream(&self, stream: &StationStream, _ctx: &CheckContext<'_>) -> Vec<Outcome> {
        let outcome = match self.failure(stream) {
            Some(reason) => Outcome::fail(reason),
            None => Outcome::pass(),
        };
        vec![outcome; stream.len()]
    }
}
