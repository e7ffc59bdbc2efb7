mod distance;
mod engine;
mod kmeans;
mod models;
mod scaler;
mod seed;

use thiserror::Error;

pub use distance::{cosine_distance, rank_rows, MAX_COSINE_DISTANCE};
pub use engine::{Recommender, DEFAULT_RESULT_COUNT};
pub use kmeans::KMeansModel;
pub use models::{
    RecommendOutcome, RecommendedSong, CODE_BAD_REQUEST, CODE_INTERNAL, CODE_NOT_FOUND,
    CODE_PARTIAL,
};
pub use scaler::{ScalerSource, StandardScaler};
pub use seed::{resolve_seeds, ResolvedSeeds, SeedSong};

/// Failure to consume a trained artifact from disk.
///
/// Never fatal for the process: a broken scaler artifact falls back to an
/// in-process fit and a broken KMeans artifact disables clustering.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("artifact has {actual} feature dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model at {path} holds no centroids")]
    EmptyModel { path: String },
}
