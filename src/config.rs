//! Run configuration: windowing, the ordered check list and pool settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::windows::WindowConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// Streams processed at the same time by `PipelinePool`
    pub max_concurrent: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Complete QC configuration, immutable once a pipeline is built from it.
///
/// `checks` is an ordered list; each entry is either a bare check name or a
/// single-key object mapping the name to its parameters:
///
/// ```json
/// {"checks": ["check_free_field", {"check_max_amplitude": {"max": 800000}}]}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QcConfig {
    pub windows: WindowConfig,
    pub checks: Vec<Value>,
    pub pipeline: PipelineSettings,
}

impl QcConfig {
    pub fn from_json(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.windows.validate()?;
        if self.pipeline.max_concurrent == 0 {
            return Err(ConfigError::InvalidParameter {
                check: "pipeline".to_string(),
                message: "max_concurrent must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Check names with their parameters, in configured order
    pub fn steps(&self) -> Result<Vec<(String, Value)>, ConfigError> {
        self.checks
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::String(name) => Ok((name.clone(), Value::Null)),
                Value::Object(map) if map.len() == 1 => {
                    let (name, params) = map.iter().next().ok_or_else(|| ConfigError::MalformedStep {
                        index,
                        message: "empty object".to_string(),
                    })?;
                    Ok((name.clone(), params.clone()))
                }
                Value::Object(map) => Err(ConfigError::MalformedStep {
                    index,
                    message: format!("expected exactly one check name, found {}", map.len()),
                }),
                other => Err(ConfigError::MalformedStep {
                    index,
                    message: format!("expected a check name or object, found {}", other),
                }),
            })
            .collect()
    }
}
