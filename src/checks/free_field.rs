use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Outcome, StationTrace};

/// Rejects sensors installed in structures when configured to do so
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_free_field",
    granularity = "trace",
    description = "Fail traces that were not recorded by a free-field sensor"
)]
#[serde(default, deny_unknown_fields)]
pub struct FreeFieldCheck {
    #[param(default = "false")]
    pub reject_non_free_field: bool,
}

impl Default for FreeFieldCheck {
    fn default() -> Self {
        Self {
            reject_non_free_field: false,
        }
    }
}

impl Check for FreeFieldCheck {
    fn check_trace(&self, trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        if self.reject_non_free_field && !trace.stats.standard.free_field {
            Outcome::fail("Failed free field sensor check.")
        } else {
            Outcome::pass()
        }
    }
}
