//! Pre-trained risk classifier.
//!
//! The artifact is a JSON export of a standard-scaled logistic regression
//! (feature names, scaler mean/scale, coefficients, intercept). It is loaded
//! once at startup and shared read-only for the process lifetime. A missing
//! or corrupt artifact is a serving degradation, not a fatal error: the
//! server keeps running and every score falls back to 0.0 / label 0.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

#[derive(Error, Debug)]
pub enum ModelArtifactError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("artifact does not match the expected feature schema: {0}")]
    Schema(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskModel {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl RiskModel {
    /// Attempts to load the artifact. Any failure is logged and yields
    /// `None`; callers must then score as 0.0 / label 0 and keep serving.
    pub fn load(path: &Path) -> Option<RiskModel> {
        match Self::from_file(path) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load risk model, serving degraded scores");
                None
            }
        }
    }

    fn from_file(path: &Path) -> Result<RiskModel, ModelArtifactError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<RiskModel, ModelArtifactError> {
        let model: RiskModel = serde_json::from_str(contents)?;
        model.check_schema()?;
        Ok(model)
    }

    fn check_schema(&self) -> Result<(), ModelArtifactError> {
        if self.feature_names.len() != FEATURE_COUNT
            || self.mean.len() != FEATURE_COUNT
            || self.scale.len() != FEATURE_COUNT
            || self.coefficients.len() != FEATURE_COUNT
        {
            return Err(ModelArtifactError::Schema(format!(
                "expected {FEATURE_COUNT} features, artifact has {}",
                self.feature_names.len()
            )));
        }
        if let Some(mismatch) = self
            .feature_names
            .iter()
            .zip(FEATURE_NAMES)
            .find(|(got, want)| got.as_str() != *want)
        {
            return Err(ModelArtifactError::Schema(format!(
                "feature {:?} does not match expected {:?}",
                mismatch.0, mismatch.1
            )));
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ModelArtifactError::Schema(
                "scaler contains a zero or non-finite scale".to_string(),
            ));
        }
        Ok(())
    }

    /// Probability mass assigned to the positive (risky) class, in [0, 1].
    /// Deterministic for a fixed artifact and vector.
    pub fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let x = features.to_array();
        let z = self
            .coefficients
            .iter()
            .zip(x.iter())
            .zip(self.mean.iter().zip(self.scale.iter()))
            .fold(self.intercept, |acc, ((coef, value), (mean, scale))| {
                acc + coef * (value - mean) / scale
            });
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
