use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

use crate::recommend::{
    RecommendOutcome, SeedSong, CODE_BAD_REQUEST, CODE_INTERNAL, DEFAULT_RESULT_COUNT,
};

use super::state::{ServerState, SharedRecommender};

#[derive(Deserialize, Debug)]
struct SeedSongBody {
    name: String,
    /// Integer or numeric string, both accepted by the reference API.
    year: Value,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum RecommendationType {
    Quick,
    Advanced,
    Both,
}

impl Default for RecommendationType {
    fn default() -> Self {
        Self::Quick
    }
}

#[derive(Deserialize, Debug)]
struct RecommendBody {
    #[serde(default)]
    songs: Vec<SeedSongBody>,
    #[serde(default)]
    recommendation_type: RecommendationType,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    DEFAULT_RESULT_COUNT
}

/// `quick` = full-catalog search, `advanced` = cluster-restricted search.
/// Only the requested variants are present in the response.
#[derive(Serialize)]
struct RecommendResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    quick: Option<RecommendOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced: Option<RecommendOutcome>,
}

fn parse_year(raw: &Value) -> Option<i32> {
    match raw {
        Value::Number(number) => number.as_i64().map(|year| year as i32),
        Value::String(text) => text.trim().parse::<i32>().ok(),
        _ => None,
    }
}

async fn post_recommend(
    State(recommender): State<SharedRecommender>,
    Json(body): Json<RecommendBody>,
) -> Response {
    if body.songs.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(RecommendOutcome::failure(
                CODE_BAD_REQUEST,
                "No songs provided",
            )),
        )
            .into_response();
    }

    let mut seeds = Vec::with_capacity(body.songs.len());
    for song in &body.songs {
        match parse_year(&song.year) {
            Some(year) => seeds.push(SeedSong {
                name: song.name.clone(),
                year,
            }),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(RecommendOutcome::failure(
                        CODE_BAD_REQUEST,
                        format!("Invalid year format for song: {}", song.name),
                    )),
                )
                    .into_response()
            }
        }
    }

    // Outermost orchestration boundary: a panicking pipeline becomes a 500
    // envelope for this request, the process keeps serving.
    let run = |use_clusters: bool| -> RecommendOutcome {
        catch_unwind(AssertUnwindSafe(|| {
            recommender.recommend(&seeds, body.count, use_clusters)
        }))
        .unwrap_or_else(|_| {
            error!("Recommendation pipeline panicked");
            RecommendOutcome::failure(CODE_INTERNAL, "Error generating recommendations")
        })
    };

    let response = RecommendResponse {
        quick: matches!(
            body.recommendation_type,
            RecommendationType::Quick | RecommendationType::Both
        )
        .then(|| run(false)),
        advanced: matches!(
            body.recommendation_type,
            RecommendationType::Advanced | RecommendationType::Both
        )
        .then(|| run(true)),
    };
    Json(response).into_response()
}

pub fn make_recommend_routes(state: ServerState) -> Router {
    Router::new()
        .route("/recommend", post(post_recommend))
        .with_state(state)
}
