use serde::{Deserialize, Serialize};

/// QC state of a single trace
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TraceState {
    #[default]
    Unchecked,
    Passed,
    Failed {
        check: String,
        reason: String,
    },
}

impl TraceState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &TraceState) -> bool {
        use TraceState::*;

        matches!(
            (self, target),
            // From Unchecked
            (Unchecked, Passed) |
            (Unchecked, Failed { .. }) |

            // From Passed
            (Passed, Passed) |
            (Passed, Failed { .. })

            // Failed is terminal: the first recorded reason is kept
        )
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Unchecked => "Unchecked",
            Self::Passed => "Passed",
            Self::Failed { .. } => "Failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
