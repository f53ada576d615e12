//! Per-frame jump/no-jump decisions for the AI bird.
//!
//! Two interchangeable backends: a gap-center heuristic and a trained
//! classifier behind a feature scaler. The backend is chosen once at
//! session setup; a runtime inference failure downgrades to the heuristic
//! for that frame only, so the AI can never stall the game loop.

use crate::config::Difficulty;
use anyhow::Result;
use log::warn;

pub const FEATURE_COUNT: usize = 7;

/// The 7-dimensional state snapshot fed to the AI and to the recorder,
/// in the fixed order of the training-data columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub bird_y: f64,
    pub gap_top: f64,
    pub gap_bottom: f64,
    pub pipe_x: f64,
    pub distance_to_pipe: f64,
    pub gap_center: f64,
    pub gap_size: f64,
}

impl Features {
    /// Build the vector from raw state; the derived columns (distance,
    /// gap center, gap size) are computed here so every caller agrees.
    pub fn new(bird_y: f64, gap_top: f64, gap_bottom: f64, pipe_x: f64, bird_x: f64) -> Self {
        Self {
            bird_y,
            gap_top,
            gap_bottom,
            pipe_x,
            distance_to_pipe: pipe_x - bird_x,
            gap_center: (gap_top + gap_bottom) / 2.0,
            gap_size: gap_bottom - gap_top,
        }
    }

    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        [
            self.bird_y,
            self.gap_top,
            self.gap_bottom,
            self.pipe_x,
            self.distance_to_pipe,
            self.gap_center,
            self.gap_size,
        ]
    }
}

/// A fitted affine feature normalizer. Consumed, never computed, by the
/// game; concrete inference bindings implement this.
pub trait FeatureScaler {
    fn transform(&self, features: [f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT]>;
}

/// A trained binary model mapping a scaled feature vector to a jump
/// probability in [0, 1].
pub trait JumpClassifier {
    fn predict(&self, features: [f64; FEATURE_COUNT]) -> Result<f64>;
}

/// Which decision machinery the session runs with. Selected once at
/// startup and never re-probed mid-game.
pub enum AiBackend {
    Heuristic,
    Model {
        scaler: Box<dyn FeatureScaler>,
        classifier: Box<dyn JumpClassifier>,
    },
}

pub struct DecisionPolicy {
    backend: AiBackend,
    difficulty: Difficulty,
}

impl DecisionPolicy {
    pub fn heuristic(difficulty: Difficulty) -> Self {
        Self {
            backend: AiBackend::Heuristic,
            difficulty,
        }
    }

    pub fn with_model(
        scaler: Box<dyn FeatureScaler>,
        classifier: Box<dyn JumpClassifier>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            backend: AiBackend::Model { scaler, classifier },
            difficulty,
        }
    }

    pub fn is_model_backed(&self) -> bool {
        matches!(self.backend, AiBackend::Model { .. })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Decide whether the AI bird jumps this frame. Never fails: a model
    /// error falls back to the heuristic for this frame and is logged.
    pub fn decide(&self, features: &Features) -> bool {
        match &self.backend {
            AiBackend::Heuristic => self.heuristic_decision(features),
            AiBackend::Model { scaler, classifier } => {
                match infer(scaler.as_ref(), classifier.as_ref(), features) {
                    Ok(probability) => probability > self.difficulty.threshold(),
                    Err(err) => {
                        warn!("model inference failed ({err:#}); using heuristic this frame");
                        self.heuristic_decision(features)
                    }
                }
            }
        }
    }

    fn heuristic_decision(&self, features: &Features) -> bool {
        features.bird_y > features.gap_center + self.difficulty.margin()
    }
}

fn infer(
    scaler: &dyn FeatureScaler,
    classifier: &dyn JumpClassifier,
    features: &Features,
) -> Result<f64> {
    let scaled = scaler.transform(features.to_array())?;
    classifier.predict(scaled)
}
