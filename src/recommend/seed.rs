use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{FeatureVector, SongCatalog, FEATURE_DIM};

/// A seed song as supplied by the caller. Duplicates are permitted and
/// weigh the centroid accordingly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedSong {
    pub name: String,
    pub year: i32,
}

#[derive(Debug)]
pub struct ResolvedSeeds {
    /// Column-wise mean of the resolved seeds' feature vectors.
    pub centroid: FeatureVector,
    /// Names of the seeds with no catalog match, in request order.
    pub missing: Vec<String>,
}

/// Resolves every seed by exact (name, year) lookup and aggregates the hits
/// into a centroid. Returns `None` when no seed matches the catalog.
pub fn resolve_seeds(seeds: &[SeedSong], catalog: &SongCatalog) -> Option<ResolvedSeeds> {
    let mut resolved: Vec<&FeatureVector> = Vec::with_capacity(seeds.len());
    let mut missing = Vec::new();

    for seed in seeds {
        match catalog.find(&seed.name, seed.year) {
            Some(song) => resolved.push(&song.features),
            None => {
                debug!("Seed \"{}\" ({}) not found in the catalog", seed.name, seed.year);
                missing.push(seed.name.clone());
            }
        }
    }

    if resolved.is_empty() {
        return None;
    }

    let mut centroid = [0.0; FEATURE_DIM];
    for features in &resolved {
        for i in 0..FEATURE_DIM {
            centroid[i] += features[i];
        }
    }
    for value in &mut centroid {
        *value /= resolved.len() as f64;
    }

    Some(ResolvedSeeds { centroid, missing })
}
