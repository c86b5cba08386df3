// handlers.rs — Route handlers: thin translation between HTTP and the
// engine. Each handler extracts its inputs, calls one GoalService
// operation, and wraps the result in an envelope; no business rules live
// here.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use okr_core::{
    GoalCreateRequest, GoalKind, GoalProgressRequest, GoalUpdateRequest, KeyResultCreateRequest,
    KeyResultUpdateRequest,
};
use okr_engine::{Capabilities, GoalQuery};

use crate::envelope::{success, success_page, ApiFailure};
use crate::AppState;

/// The acting user, from the `x-actor-id` header. Absent or malformed
/// falls back to the goal owner inside the engine.
fn actor_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-actor-id")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Capability claims, from the `x-can-approve` header. Deciding them is
/// the deployment's concern (a gateway or auth proxy), not the engine's.
fn capabilities(headers: &HeaderMap) -> Capabilities {
    let can_approve = headers
        .get("x-can-approve")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    Capabilities { can_approve }
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<GoalQuery>,
) -> Result<Response, ApiFailure> {
    let page = state.service.list(&query)?;
    Ok(success_page(&page))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(req): Json<GoalCreateRequest>,
) -> Result<Response, ApiFailure> {
    let detail = state.service.create(&req)?;
    Ok(success(StatusCode::CREATED, &detail))
}

pub async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let detail = state.service.get(id)?;
    Ok(success(StatusCode::OK, &detail))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GoalUpdateRequest>,
) -> Result<Response, ApiFailure> {
    let detail = state.service.update(id, &req)?;
    Ok(success(StatusCode::OK, &detail))
}

/// Drafts are removed, pending/active goals soft-cancelled; either way
/// the caller gets 204.
pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    state.service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let detail = state.service.submit(id)?;
    Ok(success(StatusCode::OK, &detail))
}

pub async fn approve_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ApiFailure> {
    let detail = state.service.approve(id, capabilities(&headers))?;
    Ok(success(StatusCode::OK, &detail))
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

pub async fn reject_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<RejectRequest>,
) -> Result<Response, ApiFailure> {
    let comment = req.comment.as_deref().unwrap_or("");
    let detail = state.service.reject(id, comment, capabilities(&headers))?;
    Ok(success(StatusCode::OK, &detail))
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<GoalProgressRequest>,
) -> Result<Response, ApiFailure> {
    let update = state
        .service
        .update_progress(id, &req, actor_id(&headers))?;
    Ok(success(StatusCode::OK, &update))
}

pub async fn list_key_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let key_results = state.service.key_results(id)?;
    Ok(success(StatusCode::OK, &key_results))
}

pub async fn add_key_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<KeyResultCreateRequest>,
) -> Result<Response, ApiFailure> {
    let kr = state
        .service
        .add_key_result(id, &req, actor_id(&headers))?;
    Ok(success(StatusCode::CREATED, &kr))
}

pub async fn update_key_result(
    State(state): State<AppState>,
    Path((id, kr_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(req): Json<KeyResultUpdateRequest>,
) -> Result<Response, ApiFailure> {
    let kr = state
        .service
        .update_key_result(id, kr_id, &req, actor_id(&headers))?;
    Ok(success(StatusCode::OK, &kr))
}

pub async fn delete_key_result(
    State(state): State<AppState>,
    Path((id, kr_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiFailure> {
    state.service.delete_key_result(id, kr_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

pub async fn goal_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiFailure> {
    let page = state.service.history(
        id,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(20),
    )?;
    Ok(success_page(&page))
}

#[derive(Debug, Default, Deserialize)]
pub struct AlignmentQuery {
    /// Restrict the tree to this goal's subtree; absent means every
    /// non-cancelled root.
    #[serde(default)]
    pub root: Option<Uuid>,
}

pub async fn alignment(
    State(state): State<AppState>,
    Query(query): Query<AlignmentQuery>,
) -> Result<Response, ApiFailure> {
    let tree = state.service.alignment_tree(query.root)?;
    Ok(success(StatusCode::OK, &tree))
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    #[serde(default, rename = "type")]
    pub kind: Option<GoalKind>,
    #[serde(default)]
    pub category: Option<String>,
    /// Defaults to showing only active templates.
    #[serde(default)]
    pub active_only: Option<bool>,
}

pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Response, ApiFailure> {
    let templates = state.service.list_templates(
        query.kind,
        query.category.as_deref(),
        query.active_only.unwrap_or(true),
    )?;
    Ok(success(StatusCode::OK, &templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiFailure> {
    let template = state.service.template(id)?;
    Ok(success(StatusCode::OK, &template))
}
