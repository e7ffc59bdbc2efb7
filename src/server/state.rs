use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::SongCatalog;
use crate::recommend::Recommender;

use super::ServerConfig;

pub type SharedCatalog = Arc<SongCatalog>;
pub type SharedRecommender = Arc<Recommender>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: SharedCatalog,
    pub recommender: SharedRecommender,
}

impl FromRef<ServerState> for SharedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for SharedRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
