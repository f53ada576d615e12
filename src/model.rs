//! Concrete inference bindings behind the [`crate::policy`] capability
//! traits: a standardization scaler and a small dense feed-forward
//! classifier, both loaded from JSON files exported by the offline
//! training pipeline. The game only ever calls `transform` and `predict`;
//! architecture and training live outside this crate.

use crate::policy::{FEATURE_COUNT, FeatureScaler, JumpClassifier};
use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Per-column standardization: `(x - mean) / scale`, with the statistics
/// fitted offline.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening scaler file {}", path.display()))?;
        let scaler: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing scaler file {}", path.display()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.mean.len() == FEATURE_COUNT && self.scale.len() == FEATURE_COUNT,
            "scaler must carry {FEATURE_COUNT} means and scales, got {} and {}",
            self.mean.len(),
            self.scale.len()
        );
        ensure!(
            self.scale.iter().all(|s| *s != 0.0 && s.is_finite()),
            "scaler contains a zero or non-finite scale"
        );
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: [f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT]> {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// One dense layer: `weights` is row-major, one row of input weights per
/// output unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.bias.len());
        for (row, bias) in self.weights.iter().zip(&self.bias) {
            ensure!(
                row.len() == input.len(),
                "weight row expects {} inputs, got {}",
                row.len(),
                input.len()
            );
            let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
            out.push(self.activation.apply(z));
        }
        Ok(out)
    }

    fn output_size(&self) -> usize {
        self.bias.len()
    }
}

/// A feed-forward binary classifier with a single sigmoid output unit.
#[derive(Debug, Clone, Deserialize)]
pub struct MlpClassifier {
    layers: Vec<DenseLayer>,
}

impl MlpClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening model file {}", path.display()))?;
        let model: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing model file {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.layers.is_empty(), "model has no layers");
        let mut width = FEATURE_COUNT;
        for (i, layer) in self.layers.iter().enumerate() {
            ensure!(
                layer.bias.len() == layer.weights.len(),
                "layer {i}: {} bias terms for {} units",
                layer.bias.len(),
                layer.weights.len()
            );
            for row in &layer.weights {
                ensure!(
                    row.len() == width,
                    "layer {i}: weight row of width {}, expected {width}",
                    row.len()
                );
            }
            width = layer.output_size();
        }
        let last = self.layers.last().expect("checked non-empty");
        ensure!(
            last.output_size() == 1 && last.activation == Activation::Sigmoid,
            "final layer must be a single sigmoid unit"
        );
        Ok(())
    }
}

impl JumpClassifier for MlpClassifier {
    fn predict(&self, features: [f64; FEATURE_COUNT]) -> Result<f64> {
        let mut activations = features.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer
                .forward(&activations)
                .with_context(|| format!("forward pass through layer {i}"))?;
        }
        match activations.as_slice() {
            [probability] => Ok(*probability),
            other => bail!("classifier produced {} outputs, expected 1", other.len()),
        }
    }
}
