use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ArtifactError;
use crate::catalog::{FeatureVector, FEATURE_DIM};

/// Per-feature standardization: `(x - mean) / std`.
///
/// Normally deserialized from a trained artifact; `fit` exists as the
/// degraded fallback when the artifact cannot be loaded. Query vectors and
/// catalog vectors must go through the same instance or distances are
/// meaningless.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

/// Where the scaler in use came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalerSource {
    Artifact,
    FittedFromCatalog,
}

impl StandardScaler {
    pub fn from_moments(mean: Vec<f64>, std: Vec<f64>) -> Result<StandardScaler, ArtifactError> {
        if mean.len() != FEATURE_DIM || std.len() != FEATURE_DIM {
            return Err(ArtifactError::DimensionMismatch {
                expected: FEATURE_DIM,
                actual: mean.len().max(std.len()),
            });
        }
        Ok(StandardScaler { mean, std })
    }

    /// Fits mean and population standard deviation per feature column.
    pub fn fit(rows: &[FeatureVector]) -> StandardScaler {
        let mut mean = vec![0.0; FEATURE_DIM];
        let mut std = vec![0.0; FEATURE_DIM];
        if rows.is_empty() {
            return StandardScaler { mean, std };
        }

        let n = rows.len() as f64;
        for row in rows {
            for i in 0..FEATURE_DIM {
                mean[i] += row[i];
            }
        }
        for value in &mut mean {
            *value /= n;
        }
        for row in rows {
            for i in 0..FEATURE_DIM {
                let delta = row[i] - mean[i];
                std[i] += delta * delta;
            }
        }
        for value in &mut std {
            *value = (*value / n).sqrt();
        }
        StandardScaler { mean, std }
    }

    pub fn load(path: &Path) -> Result<StandardScaler, ArtifactError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let scaler: StandardScaler =
            serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        StandardScaler::from_moments(scaler.mean, scaler.std)
    }

    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_DIM];
        for i in 0..FEATURE_DIM {
            // A constant column scales by 1.0 instead of dividing by zero.
            let divisor = if self.std[i] > 0.0 { self.std[i] } else { 1.0 };
            out[i] = (vector[i] - self.mean[i]) / divisor;
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
