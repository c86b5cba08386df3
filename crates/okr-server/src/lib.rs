//! # okr-server
//!
//! HTTP surface for the goal engine: a JSON API over axum with uniform
//! `{ success, data | error, meta }` envelopes.
//!
//! The server owns no business rules. Handlers translate requests into
//! [`GoalService`](okr_engine::GoalService) calls and engine errors into
//! HTTP statuses; authorization claims arrive as headers (`x-actor-id`,
//! `x-can-approve`) set by whatever fronts this service.

pub mod envelope;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use okr_engine::GoalService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GoalService>,
}

/// Build the API router.
pub fn router(service: Arc<GoalService>) -> Router {
    let state = AppState { service };
    Router::new()
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        // Static segments, so they never collide with "/goals/{id}".
        .route("/goals/templates", get(handlers::list_templates))
        .route("/goals/templates/{id}", get(handlers::get_template))
        .route("/goals/alignment", get(handlers::alignment))
        .route(
            "/goals/{id}",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/goals/{id}/submit", post(handlers::submit_goal))
        .route("/goals/{id}/approve", post(handlers::approve_goal))
        .route("/goals/{id}/reject", post(handlers::reject_goal))
        .route("/goals/{id}/progress", patch(handlers::update_progress))
        .route(
            "/goals/{id}/key-results",
            get(handlers::list_key_results).post(handlers::add_key_result),
        )
        .route(
            "/goals/{id}/key-results/{kr_id}",
            put(handlers::update_key_result).delete(handlers::delete_key_result),
        )
        .route("/goals/{id}/history", get(handlers::goal_history))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use okr_core::{MemoryOwnerDirectory, MemoryStore, OwnerSummary};
    use okr_engine::MemoryTemplateCatalog;

    fn test_router() -> (Router, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let owners = Arc::new(MemoryOwnerDirectory::new());
        let owner = OwnerSummary {
            id: Uuid::new_v4(),
            first_name: "Maya".into(),
            last_name: "Chen".into(),
            email: None,
            job_title: None,
            avatar_url: None,
        };
        let owner_id = owner.id;
        owners.insert(owner).unwrap();
        let templates = Arc::new(MemoryTemplateCatalog::new());
        let service = Arc::new(GoalService::new(store, owners, templates));
        (router(service), owner_id)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_body(owner_id: Uuid) -> Value {
        json!({
            "title": "Launch X",
            "type": "team",
            "owner_id": owner_id,
            "due_date": "2026-12-31T00:00:00Z",
        })
    }

    #[tokio::test]
    async fn create_returns_201_with_envelope() {
        let (router, owner_id) = test_router();
        let response = router
            .oneshot(post_json("/goals", create_body(owner_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["status"], json!("draft"));
        assert_eq!(body["data"]["type"], json!("team"));
        assert!(body["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn validation_failure_is_422_with_field_details() {
        let (router, owner_id) = test_router();
        let mut body = create_body(owner_id);
        body["title"] = json!("   ");
        let response = router.oneshot(post_json("/goals", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["error"]["details"]["field"], json!("title"));
    }

    #[tokio::test]
    async fn unknown_goal_is_404() {
        let (router, _) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/goals/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn list_carries_pagination_meta() {
        let (router, owner_id) = test_router();
        router
            .clone()
            .oneshot(post_json("/goals", create_body(owner_id)))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/goals?per_page=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["meta"]["pagination"]["page"], json!(1));
        assert_eq!(body["meta"]["pagination"]["total_items"], json!(1));
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approve_requires_capability_header() {
        let (router, owner_id) = test_router();
        let created = body_json(
            router
                .clone()
                .oneshot(post_json("/goals", create_body(owner_id)))
                .await
                .unwrap(),
        )
        .await;
        let goal_id = created["data"]["id"].as_str().unwrap().to_string();

        router
            .clone()
            .oneshot(post_json(
                &format!("/goals/{goal_id}/key-results"),
                json!({"title": "Ship it", "target_value": 10}),
            ))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(post_json(&format!("/goals/{goal_id}/submit"), json!({})))
            .await
            .unwrap();

        // Without the header: conflict.
        let denied = router
            .clone()
            .oneshot(post_json(&format!("/goals/{goal_id}/approve"), json!({})))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::CONFLICT);

        let mut approve = post_json(&format!("/goals/{goal_id}/approve"), json!({}));
        approve
            .headers_mut()
            .insert("x-can-approve", "true".parse().unwrap());
        let approved = router.oneshot(approve).await.unwrap();
        assert_eq!(approved.status(), StatusCode::OK);
        let body = body_json(approved).await;
        assert_eq!(body["data"]["status"], json!("active"));
    }

    #[tokio::test]
    async fn delete_draft_is_204() {
        let (router, owner_id) = test_router();
        let created = body_json(
            router
                .clone()
                .oneshot(post_json("/goals", create_body(owner_id)))
                .await
                .unwrap(),
        )
        .await;
        let goal_id = created["data"]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/goals/{goal_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn alignment_route_is_not_shadowed_by_goal_id() {
        let (router, _) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/goals/alignment")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn templates_list_is_empty_by_default() {
        let (router, _) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/goals/templates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
