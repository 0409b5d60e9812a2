pub mod metadata;

pub use metadata::{
    CheckFactory, CheckMetadata, CheckMetadataFactory, CheckMetadataFactoryWrapper, DescribeCheck,
    Granularity, ParameterSchema,
};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::checks::{self, Check};
use crate::error::ConfigError;

/// Registry of available checks, keyed by configuration name
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    checks: BTreeMap<String, CheckMetadata>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builtin checks plus anything else submitted through `inventory`
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for metadata in checks::builtin_metadata() {
            registry.register(metadata);
        }
        for wrapper in inventory::iter::<CheckMetadataFactoryWrapper> {
            let metadata = (wrapper.0)();
            if !registry.contains(&metadata.name) {
                registry.register(metadata);
            }
        }
        registry
    }

    /// Add or replace a check type
    pub fn register(&mut self, metadata: CheckMetadata) {
        self.checks.insert(metadata.name.clone(), metadata);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CheckMetadata> {
        self.checks.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.checks.keys().cloned().collect()
    }

    pub fn create(&self, name: &str, params: &Value) -> Result<Box<dyn Check>, ConfigError> {
        self.checks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCheck(name.to_string()))?
            .create_instance(params)
    }
}
