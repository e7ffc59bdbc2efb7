use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{FeatureVector, SongCatalog};

use super::distance::rank_rows;
use super::kmeans::KMeansModel;
use super::models::{
    RecommendOutcome, RecommendedSong, CODE_BAD_REQUEST, CODE_NOT_FOUND,
};
use super::scaler::{ScalerSource, StandardScaler};
use super::seed::{resolve_seeds, SeedSong};

pub const DEFAULT_RESULT_COUNT: usize = 10;

/// The recommendation engine.
///
/// Everything it holds is immutable after construction: the catalog, the
/// scaler, the optional KMeans model and the catalog features normalized
/// once with that scaler. Requests only read, so the engine is freely
/// shareable across request handlers.
pub struct Recommender {
    catalog: Arc<SongCatalog>,
    scaler: StandardScaler,
    scaler_source: ScalerSource,
    kmeans: Option<KMeansModel>,
    /// Normalized catalog features, row-parallel with the catalog.
    normalized: Vec<FeatureVector>,
}

/// Which rows a request gets ranked against.
enum CandidateSet {
    Cluster(Vec<usize>),
    FullCatalog,
}

impl Recommender {
    /// Loads both trained artifacts and builds the engine.
    ///
    /// Artifact problems are never fatal here: a missing or broken scaler
    /// falls back to fitting one on the catalog (degraded quality, logged),
    /// a missing or broken KMeans model disables clustering.
    pub fn initialize(
        catalog: Arc<SongCatalog>,
        scaler_path: &Path,
        kmeans_path: &Path,
    ) -> Recommender {
        let (scaler, scaler_source) = match StandardScaler::load(scaler_path) {
            Ok(scaler) => {
                info!("Loaded scaler artifact from {}", scaler_path.display());
                (scaler, ScalerSource::Artifact)
            }
            Err(err) => {
                warn!(
                    "Could not load the scaler artifact ({err}), fitting one on the catalog instead. Recommendation quality may differ from the trained pipeline."
                );
                let features: Vec<FeatureVector> =
                    catalog.songs().iter().map(|song| song.features).collect();
                (StandardScaler::fit(&features), ScalerSource::FittedFromCatalog)
            }
        };

        let kmeans = match KMeansModel::load(kmeans_path) {
            Ok(model) => {
                info!(
                    "Loaded KMeans model from {} ({} clusters)",
                    kmeans_path.display(),
                    model.n_clusters()
                );
                Some(model)
            }
            Err(err) => {
                warn!("Could not load the KMeans model ({err}), clustering is disabled");
                None
            }
        };

        Recommender::from_parts(catalog, scaler, scaler_source, kmeans)
    }

    pub fn from_parts(
        catalog: Arc<SongCatalog>,
        scaler: StandardScaler,
        scaler_source: ScalerSource,
        kmeans: Option<KMeansModel>,
    ) -> Recommender {
        let normalized = catalog
            .songs()
            .iter()
            .map(|song| scaler.transform(&song.features))
            .collect();
        Recommender {
            catalog,
            scaler,
            scaler_source,
            kmeans,
            normalized,
        }
    }

    pub fn scaler_source(&self) -> ScalerSource {
        self.scaler_source
    }

    pub fn clustering_available(&self) -> bool {
        self.kmeans.is_some()
    }

    pub fn catalog(&self) -> &Arc<SongCatalog> {
        &self.catalog
    }

    /// Recommends up to `result_count` songs closest to the seeds' centroid.
    ///
    /// Songs sharing a name with any seed are excluded regardless of year,
    /// matching the observable behavior of the reference system. With
    /// `use_clusters` the search is restricted to the centroid's cluster
    /// unless that cluster cannot yield `result_count` eligible songs, in
    /// which case the whole catalog is searched instead.
    pub fn recommend(
        &self,
        seeds: &[SeedSong],
        result_count: usize,
        use_clusters: bool,
    ) -> RecommendOutcome {
        if seeds.is_empty() {
            return RecommendOutcome::failure(CODE_BAD_REQUEST, "No songs provided");
        }

        let resolved = match resolve_seeds(seeds, &self.catalog) {
            Some(resolved) => resolved,
            None => {
                return RecommendOutcome::failure(
                    CODE_NOT_FOUND,
                    "None of the songs exist in the dataset",
                )
            }
        };
        let query = self.scaler.transform(&resolved.centroid);

        let seed_names: HashSet<&str> = seeds.iter().map(|seed| seed.name.as_str()).collect();

        let candidates = if use_clusters {
            self.cluster_candidates(&query, result_count, &seed_names)
        } else {
            CandidateSet::FullCatalog
        };

        let ranked = match &candidates {
            CandidateSet::Cluster(rows) => rank_rows(&query, &self.normalized, rows),
            CandidateSet::FullCatalog => {
                let all: Vec<usize> = (0..self.catalog.len()).collect();
                rank_rows(&query, &self.normalized, &all)
            }
        };

        let mut data = Vec::with_capacity(result_count.min(ranked.len()));
        for (row, _distance) in ranked {
            if data.len() == result_count {
                break;
            }
            let song = &self.catalog.songs()[row];
            if seed_names.contains(song.name.as_str()) {
                continue;
            }
            data.push(RecommendedSong {
                name: song.name.clone(),
                year: song.year,
                artists: song.artists.clone(),
            });
        }

        if resolved.missing.is_empty() {
            RecommendOutcome::ok(data)
        } else {
            RecommendOutcome::partial(data, &resolved.missing)
        }
    }

    /// Picks the candidate rows for a clustered request. Falls through to the
    /// full catalog whenever the cluster cannot serve the request, which is
    /// never an error for the caller.
    fn cluster_candidates(
        &self,
        query: &FeatureVector,
        result_count: usize,
        seed_names: &HashSet<&str>,
    ) -> CandidateSet {
        let Some(kmeans) = &self.kmeans else {
            debug!("Clustering requested but no model is loaded, searching the full catalog");
            return CandidateSet::FullCatalog;
        };

        let cluster = kmeans.predict(query);
        let labels = self
            .catalog
            .cluster_labels_or_init(|| kmeans.predict_all(&self.normalized));

        let rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cluster)
            .map(|(row, _)| row)
            .collect();

        let eligible = rows
            .iter()
            .filter(|&&row| !seed_names.contains(self.catalog.songs()[row].name.as_str()))
            .count();
        if eligible < result_count {
            info!(
                "Cluster {cluster} only has {eligible} eligible songs, falling back to the full catalog"
            );
            return CandidateSet::FullCatalog;
        }

        debug!("Restricting the search to cluster {cluster} ({} songs)", rows.len());
        CandidateSet::Cluster(rows)
    }
}
