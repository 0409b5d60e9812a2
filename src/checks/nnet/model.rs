use anyhow::{bail, ensure, Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Linear => x,
        }
    }
}

/// One dense layer as stored in JSON: `weights[out][in]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

/// Serialized QA model: feature standardization followed by dense layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub feature_mean: Vec<f64>,
    pub feature_std: Vec<f64>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

/// Feed-forward network ready for scoring
#[derive(Debug, Clone)]
pub struct QaNetwork {
    mean: Array1<f64>,
    std: Array1<f64>,
    layers: Vec<DenseLayer>,
}

impl QaNetwork {
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        ensure!(
            spec.feature_mean.len() == FEATURE_COUNT && spec.feature_std.len() == FEATURE_COUNT,
            "feature_mean and feature_std need {} entries, got {} and {}",
            FEATURE_COUNT,
            spec.feature_mean.len(),
            spec.feature_std.len()
        );
        if spec.feature_std.iter().any(|s| !(*s > 0.0)) {
            bail!("feature_std entries must be positive");
        }
        ensure!(!spec.layers.is_empty(), "model has no layers");

        let mut width = FEATURE_COUNT;
        let mut layers = Vec::with_capacity(spec.layers.len());
        for (i, layer) in spec.layers.iter().enumerate() {
            let rows = layer.weights.len();
            ensure!(
                rows == layer.biases.len(),
                "layer {}: {} weight rows but {} biases",
                i,
                rows,
                layer.biases.len()
            );
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                bail!("layer {}: expected {} inputs per row, got {}", i, width, row.len());
            }

            let flat: Vec<f64> = layer.weights.iter().flatten().copied().collect();
            let weights = Array2::from_shape_vec((rows, width), flat)
                .with_context(|| format!("layer {}: bad weight shape", i))?;
            layers.push(DenseLayer {
                weights,
                biases: Array1::from(layer.biases.clone()),
                activation: layer.activation,
            });
            width = rows;
        }
        ensure!(width == 1, "model must have a single output, got {}", width);

        Ok(Self {
            mean: Array1::from(spec.feature_mean.clone()),
            std: Array1::from(spec.feature_std.clone()),
            layers,
        })
    }

    pub fn score(&self, features: &[f64]) -> f64 {
        let input = Array1::from(features.to_vec());
        let mut x = (&input - &self.mean) / &self.std;
        for layer in &self.layers {
            let activation = layer.activation;
            x = (layer.weights.dot(&x) + &layer.biases).mapv(|v| activation.apply(v));
        }
        x.first().copied().unwrap_or(0.0)
    }
}
