use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ArtifactError;
use crate::catalog::FeatureVector;

/// A fitted KMeans model, consumed for prediction only. Centroids live in
/// the normalized feature space, so only normalized vectors may be assigned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KMeansModel {
    centroids: Vec<FeatureVector>,
}

fn squared_euclidean(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut sum = 0.0;
    for i in 0..a.len() {
        let delta = a[i] - b[i];
        sum += delta * delta;
    }
    sum
}

impl KMeansModel {
    pub fn new(centroids: Vec<FeatureVector>) -> KMeansModel {
        assert!(
            !centroids.is_empty(),
            "a KMeans model needs at least one centroid"
        );
        KMeansModel { centroids }
    }

    pub fn load(path: &Path) -> Result<KMeansModel, ArtifactError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let model: KMeansModel =
            serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if model.centroids.is_empty() {
            return Err(ArtifactError::EmptyModel {
                path: path.display().to_string(),
            });
        }
        Ok(model)
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Nearest centroid by squared Euclidean distance; ties go to the lowest
    /// centroid index, so assignment is deterministic.
    pub fn predict(&self, vector: &FeatureVector) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, centroid) in self.centroids.iter().enumerate() {
            let distance = squared_euclidean(vector, centroid);
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        best
    }

    pub fn predict_all(&self, rows: &[FeatureVector]) -> Vec<usize> {
        rows.par_iter().map(|row| self.predict(row)).collect()
    }
}
