use serde::{Deserialize, Serialize};

/// Number of numeric features describing each song.
pub const FEATURE_DIM: usize = 15;

/// Fixed order of the numeric feature columns. Every feature vector, scaler
/// artifact and KMeans centroid follows this order.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIM] = [
    "valence",
    "year",
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "explicit",
    "instrumentalness",
    "key",
    "liveness",
    "loudness",
    "mode",
    "popularity",
    "speechiness",
    "tempo",
];

pub type FeatureVector = [f64; FEATURE_DIM];

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Song {
    pub name: String,
    pub year: i32,
    pub artists: Vec<String>,
    pub features: FeatureVector,
}
