pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::scoring::handlers as scoring;
use crate::state::AppState;
use crate::verification::handlers as verification;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/verify", post(verification::handle_verify))
        .route("/api/v1/scores", post(scoring::handle_calculate_score))
        .route(
            "/api/v1/scores/:wallet_address/latest",
            get(scoring::handle_latest_score),
        )
        .route(
            "/api/v1/scores/:wallet_address/history",
            get(scoring::handle_score_history),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::scoring::calculator::calculate_total_score;
    use crate::scoring::store::{MemoryScoreStore, ScoreStore};
    use crate::verification::pipeline::tests::fixture_verifier;

    const WALLET: &str = "0xAbCdEf0123456789abcdef0123456789ABCDEF01";

    fn app() -> Router {
        app_with_store(Arc::new(MemoryScoreStore::new()))
    }

    fn app_with_store(store: Arc<dyn ScoreStore>) -> Router {
        build_router(AppState {
            store,
            verifier: Arc::new(fixture_verifier()),
        })
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "proofscore-api");
    }

    #[tokio::test]
    async fn test_extract_rejects_blank_resume() {
        let (status, body) = send(
            &app(),
            post_json("/api/v1/extract", json!({ "resume_text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_returns_skills() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/extract",
                json!({ "resume_text": "Senior engineer with Rust and Solidity experience." }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let skills: Vec<&str> = body["extracted"]["skills"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(skills.contains(&"Rust"));
        assert!(skills.contains(&"Solidity"));
        assert!(body["preliminary_score"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_verify_rejects_bad_wallet() {
        let (status, _) = send(
            &app(),
            post_json(
                "/api/v1/verify",
                json!({ "wallet_address": "not-a-wallet", "extracted": {
                    "skills": [], "projects": [], "experience": [],
                    "education": [], "certifications": []
                }}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verify_with_fixtures() {
        let (status, body) = send(
            &app(),
            post_json(
                "/api/v1/verify",
                json!({
                    "wallet_address": WALLET,
                    "github_username": "octocat",
                    "extracted": {
                        "skills": ["Solidity"],
                        "projects": ["DeFi Protocol"],
                        "experience": [], "education": [], "certifications": []
                    }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["github"]["username"], "octocat");
        assert_eq!(body["skills"][0]["skill"], "Solidity");
        assert_eq!(body["skills"][0]["source"], "github");
        assert_eq!(body["projects"][0]["is_verified"], true);
        assert_eq!(body["poaps"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_score_flow_records_and_compares() {
        let app = app();

        let (status, _) = send(&app, get(&format!("/api/v1/scores/{WALLET}/latest"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let first = json!({
            "wallet_address": WALLET,
            "skills": [{ "skill": "Rust", "is_verified": true, "source": "github" }]
        });
        let (status, body) = send(&app, post_json("/api/v1/scores", first)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["persisted"], true);
        assert!(body["comparison"].is_null());
        let first_total = body["score"]["total_score"].as_u64().unwrap();

        let second = json!({
            "wallet_address": WALLET.to_lowercase(),
            "skills": [
                { "skill": "Rust", "is_verified": true, "source": "github" },
                { "skill": "Solidity", "is_verified": true, "source": "onChain" }
            ]
        });
        let (_, body) = send(&app, post_json("/api/v1/scores", second)).await;
        assert_eq!(body["comparison"]["previous_score"].as_u64().unwrap(), first_total);
        assert_eq!(body["comparison"]["is_improvement"], true);

        let (status, latest) = send(&app, get(&format!("/api/v1/scores/{WALLET}/latest"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["total_score"], body["score"]["total_score"]);

        let (_, history) = send(
            &app,
            get(&format!("/api/v1/scores/{WALLET}/history?limit=1")),
        )
        .await;
        assert_eq!(history.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_rejects_path_like_github_username() {
        let app = app();
        for username in ["../user", "../orgs/acme", "octo/cat"] {
            let (status, body) = send(
                &app,
                post_json(
                    "/api/v1/verify",
                    json!({
                        "wallet_address": WALLET,
                        "github_username": username,
                        "extracted": {
                            "skills": [], "projects": [], "experience": [],
                            "education": [], "certifications": []
                        }
                    }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{username}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_history_limit_is_clamped() {
        let store = Arc::new(MemoryScoreStore::new());
        let wallet = WALLET.to_lowercase();
        for _ in 0..25 {
            store
                .save(&wallet, &calculate_total_score(&[], &[], &[]))
                .await
                .unwrap();
        }
        let app = app_with_store(store);
        let history_len = |query: &'static str| {
            let app = app.clone();
            async move {
                let (status, body) = send(
                    &app,
                    get(&format!("/api/v1/scores/{WALLET}/history{query}")),
                )
                .await;
                assert_eq!(status, StatusCode::OK);
                body.as_array().unwrap().len()
            }
        };

        assert_eq!(history_len("").await, 20);
        assert_eq!(history_len("?limit=0").await, 1);
        assert_eq!(history_len("?limit=-5").await, 1);
        assert_eq!(history_len("?limit=1000").await, 25);
        assert_eq!(history_len("?limit=7").await, 7);
    }
}
