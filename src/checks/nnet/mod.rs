//! `NNet_QA`: scores each trace with a small dense network over engineered
//! waveform features and rejects traces scoring below the acceptance
//! threshold.
//!
//! The model is given inline (`model`) or as a JSON file (`model_path`); it
//! is loaded and shape-checked once when the pipeline is built.

mod features;
mod model;

pub use features::{qa_features, FEATURE_COUNT, SNR_BANDS};
pub use model::{Activation, LayerSpec, ModelSpec, QaNetwork};

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use gmqc_macros::QcCheck;
use log::info;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Annotation, Outcome, StationTrace};

#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "NNet_QA",
    granularity = "trace",
    description = "Fail traces whose neural-network quality score is below acceptance_threshold"
)]
#[serde(default, deny_unknown_fields)]
pub struct NnetQaCheck {
    #[param(default = "0.5", min = 0.0, max = 1.0)]
    pub acceptance_threshold: f64,

    #[param(default = "null")]
    pub model_path: Option<PathBuf>,

    #[param(default = "null")]
    pub model: Option<ModelSpec>,

    #[serde(skip)]
    network: Option<QaNetwork>,
}

impl Default for NnetQaCheck {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.5,
            model_path: None,
            model: None,
            network: None,
        }
    }
}

impl NnetQaCheck {
    fn load_spec(&self) -> Result<ModelSpec> {
        match (&self.model, &self.model_path) {
            (Some(spec), None) => Ok(spec.clone()),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read model file {}", path.display()))?;
                let spec = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse model file {}", path.display()))?;
                info!("Loaded NNet model from {}", path.display());
                Ok(spec)
            }
            (Some(_), Some(_)) => bail!("give either model or model_path, not both"),
            (None, None) => bail!("either model or model_path is required"),
        }
    }
}

impl Check for NnetQaCheck {
    fn prepare(&mut self) -> Result<()> {
        let spec = self.load_spec()?;
        self.network = Some(QaNetwork::from_spec(&spec)?);
        Ok(())
    }

    fn check_trace(&self, trace: &StationTrace, ctx: &CheckContext<'_>) -> Outcome {
        let windows = match ctx.windows(trace) {
            Ok(windows) => windows,
            Err(dependency) => return dependency,
        };
        let Some(network) = &self.network else {
            return Outcome::dependency_failed("NNet model is not loaded");
        };

        let score = network.score(&qa_features(trace, windows));
        let outcome = if score < self.acceptance_threshold {
            Outcome::fail(format!(
                "NNet score of {:.3} is below the acceptance threshold of {}.",
                score, self.acceptance_threshold
            ))
        } else {
            Outcome::pass()
        };
        outcome.with_annotation(Annotation::NnetScore(score))
    }
}
