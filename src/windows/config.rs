use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the signal onset is estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case", deny_unknown_fields)]
pub enum SplitMethod {
    /// Arrival of a phase travelling at `vsplit` km/s from the epicenter
    Velocity {
        #[serde(default = "default_vsplit")]
        vsplit: f64,
    },
    /// Earliest STA/LTA trigger across the stream's traces
    StaLta {
        #[serde(default = "default_picker_sta")]
        sta_length: f64,
        #[serde(default = "default_picker_lta")]
        lta_length: f64,
        #[serde(default = "default_picker_threshold")]
        threshold: f64,
    },
}

impl Default for SplitMethod {
    fn default() -> Self {
        Self::Velocity {
            vsplit: default_vsplit(),
        }
    }
}

/// How the end of the signal window is estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case", deny_unknown_fields)]
pub enum EndMethod {
    /// `origin + max(floor, distance / vmin)`
    Velocity {
        #[serde(default = "default_vmin")]
        vmin: f64,
        #[serde(default = "default_floor")]
        floor: f64,
    },
    /// Duration interpolated from the event magnitude
    Magnitude,
    /// Use the whole record after the split
    None,
}

impl Default for EndMethod {
    fn default() -> Self {
        Self::Velocity {
            vmin: default_vmin(),
            floor: default_floor(),
        }
    }
}

/// Minimum window durations in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowChecks {
    pub enabled: bool,
    pub min_noise_duration: f64,
    pub min_signal_duration: f64,
}

impl Default for WindowChecks {
    fn default() -> Self {
        Self {
            enabled: true,
            min_noise_duration: 1.0,
            min_signal_duration: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub signal_split: SplitMethod,
    pub signal_end: EndMethod,
    pub window_checks: WindowChecks,
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidWindows(msg));

        match &self.signal_split {
            SplitMethod::Velocity { vsplit } if !(*vsplit > 0.0) => {
                return invalid(format!("vsplit must be positive, got {}", vsplit));
            }
            SplitMethod::StaLta { sta_length, lta_length, threshold } => {
                if !(*sta_length > 0.0 && sta_length < lta_length) {
                    return invalid(format!(
                        "picker needs 0 < sta_length < lta_length, got {} and {}",
                        sta_length, lta_length
                    ));
                }
                if !(*threshold > 0.0) {
                    return invalid(format!("picker threshold must be positive, got {}", threshold));
                }
            }
            _ => {}
        }

        if let EndMethod::Velocity { vmin, floor } = &self.signal_end {
            if !(*vmin > 0.0) {
                return invalid(format!("vmin must be positive, got {}", vmin));
            }
            if !(*floor >= 0.0) {
                return invalid(format!("floor must not be negative, got {}", floor));
            }
        }

        let checks = &self.window_checks;
        if !(checks.min_noise_duration >= 0.0 && checks.min_signal_duration >= 0.0) {
            return invalid("window durations must not be negative".to_string());
        }

        Ok(())
    }
}

fn default_vsplit() -> f64 {
    7.0
}

fn default_picker_sta() -> f64 {
    1.0
}

fn default_picker_lta() -> f64 {
    20.0
}

fn default_picker_threshold() -> f64 {
    3.0
}

fn default_vmin() -> f64 {
    1.0
}

fn default_floor() -> f64 {
    120.0
}
