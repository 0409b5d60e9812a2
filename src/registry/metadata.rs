use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::checks::Check;
use crate::error::ConfigError;

/// Whether a check decides per trace or over a whole stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Trace,
    Stream,
}

/// Schema for a configurable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Factory function type for creating configured check instances
pub type CheckFactory = fn(&Value) -> Result<Box<dyn Check>, serde_json::Error>;

/// Complete metadata for a check type
#[derive(Clone)]
pub struct CheckMetadata {
    pub name: String,
    pub granularity: Granularity,
    pub description: String,
    pub parameters: Vec<ParameterSchema>,
    pub factory: CheckFactory,
}

impl std::fmt::Debug for CheckMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckMetadata")
            .field("name", &self.name)
            .field("granularity", &self.granularity)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl CheckMetadata {
    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Validate `params` against the schema, build the check and prepare it
    pub fn create_instance(&self, params: &Value) -> Result<Box<dyn Check>, ConfigError> {
        let params = match params {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => params.clone(),
            _ => {
                return Err(ConfigError::MalformedParameters {
                    check: self.name.clone(),
                })
            }
        };

        if let Value::Object(map) = &params {
            for schema in &self.parameters {
                match map.get(&schema.name) {
                    None if schema.required => {
                        return Err(ConfigError::MissingParameter {
                            check: self.name.clone(),
                            param: schema.name.clone(),
                        });
                    }
                    Some(value) => self.check_range(schema, value)?,
                    None => {}
                }
            }
        }

        let mut check = (self.factory)(&params).map_err(|source| ConfigError::InvalidParameters {
            check: self.name.clone(),
            source,
        })?;

        check.prepare().map_err(|e| ConfigError::InvalidParameter {
            check: self.name.clone(),
            message: format!("{:#}", e),
        })?;

        Ok(check)
    }

    fn check_range(&self, schema: &ParameterSchema, value: &Value) -> Result<(), ConfigError> {
        let Some(number) = value.as_f64() else {
            return Ok(());
        };
        let below = schema.min.is_some_and(|min| number < min);
        let above = schema.max.is_some_and(|max| number > max);
        if below || above {
            return Err(ConfigError::OutOfRange {
                check: self.name.clone(),
                param: schema.name.clone(),
                value: number,
                min: schema.min,
                max: schema.max,
            });
        }
        Ok(())
    }
}

/// Implemented by `#[derive(QcCheck)]`
pub trait DescribeCheck {
    fn metadata() -> CheckMetadata;
}

// Factory type for creating check metadata at runtime
pub type CheckMetadataFactory = fn() -> CheckMetadata;

// Wrapper for inventory collection
pub struct CheckMetadataFactoryWrapper(pub CheckMetadataFactory);

// Inventory submission type
inventory::collect!(CheckMetadataFactoryWrapper);
