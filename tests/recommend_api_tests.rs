mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recommendify_server::server::{make_app, ServerConfig};

fn app() -> Router {
    let catalog = common::fixture_catalog();
    let recommender = common::fixture_recommender(catalog.clone());
    make_app(ServerConfig::default(), catalog, recommender)
}

async fn post_recommend(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommend")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_seed_list_is_rejected_up_front() {
    let (status, body) = post_recommend(app(), json!({ "songs": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error_code"], json!(400));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn non_numeric_year_is_rejected_naming_the_song() {
    let (status, body) = post_recommend(
        app(),
        json!({ "songs": [{ "name": "Shape of You", "year": "20x7" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], json!(400));
    assert!(body["error_message"]
        .as_str()
        .unwrap()
        .contains("Shape of You"));
}

#[tokio::test]
async fn year_as_numeric_string_is_accepted() {
    let (status, body) = post_recommend(
        app(),
        json!({ "songs": [{ "name": "Shape of You", "year": "2017" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let quick = &body["quick"];
    assert_eq!(quick["success"], json!(true));
    assert_eq!(quick["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn both_returns_quick_and_advanced_side_by_side() {
    let (status, body) = post_recommend(
        app(),
        json!({
            "songs": [
                { "name": "Shape of You", "year": 2017 },
                { "name": "Rolling in the Deep", "year": 2011 },
                { "name": "Blinding Lights", "year": 2020 }
            ],
            "recommendation_type": "both"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quick"]["success"], json!(true));
    // No KMeans model is loaded, so the advanced path transparently falls
    // back to full-catalog search instead of failing.
    assert_eq!(body["advanced"]["success"], json!(true));
    assert_eq!(body["quick"]["data"], body["advanced"]["data"]);

    for recommended in body["quick"]["data"].as_array().unwrap() {
        let name = recommended["name"].as_str().unwrap();
        assert_ne!(name, "Shape of You");
        assert_ne!(name, "Rolling in the Deep");
        assert_ne!(name, "Blinding Lights");
    }
}

#[tokio::test]
async fn quick_only_omits_the_advanced_key() {
    let (status, body) = post_recommend(
        app(),
        json!({
            "songs": [{ "name": "Shape of You", "year": 2017 }],
            "recommendation_type": "quick"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("quick").is_some());
    assert!(body.get("advanced").is_none());
}

#[tokio::test]
async fn unknown_seeds_yield_a_not_found_envelope() {
    let (status, body) = post_recommend(
        app(),
        json!({ "songs": [{ "name": "Ghost Song", "year": 1970 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let quick = &body["quick"];
    assert_eq!(quick["success"], json!(false));
    assert_eq!(quick["error_code"], json!(404));
    assert_eq!(quick["data"], json!([]));
}

#[tokio::test]
async fn partially_resolved_seeds_carry_the_partial_qualifier() {
    let (status, body) = post_recommend(
        app(),
        json!({
            "songs": [
                { "name": "Shape of You", "year": 2017 },
                { "name": "Blinding Lights", "year": 1999 }
            ],
            "count": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let quick = &body["quick"];
    assert_eq!(quick["success"], json!(true));
    assert_eq!(quick["error_code"], json!(206));
    assert_eq!(
        quick["error_message"],
        json!("Some songs were not found: Blinding Lights")
    );
    assert!(!quick["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn home_reports_server_stats() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["songs"], json!(16));
    assert_eq!(body["clustering_available"], json!(false));
    assert!(body["uptime"].as_str().is_some());
}
