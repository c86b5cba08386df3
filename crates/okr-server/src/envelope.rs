// envelope.rs — JSON response envelopes and error-to-status mapping.
//
// Every response carries the same shape: `{ success, data | error, meta }`,
// with `meta.timestamp` always present and `meta.pagination` on paged
// reads. Engine error categories map one-to-one onto HTTP statuses, so
// handlers stay a thin translation layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use okr_core::EngineError;
use okr_engine::Page;

pub fn status_for(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A success envelope with the given status.
pub fn success<T: Serialize>(status: StatusCode, data: &T) -> Response {
    let body = json!({
        "success": true,
        "data": data,
        "meta": { "timestamp": Utc::now() },
    });
    (status, Json(body)).into_response()
}

/// A success envelope for one page of results; pagination facts ride in
/// `meta` rather than wrapping the items.
pub fn success_page<T: Serialize>(page: &Page<T>) -> Response {
    let body = json!({
        "success": true,
        "data": page.items,
        "meta": {
            "timestamp": Utc::now(),
            "pagination": {
                "page": page.page,
                "per_page": page.per_page,
                "total_items": page.total_items,
                "total_pages": page.total_pages,
            },
        },
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// Engine error carried out of a handler via `?`.
pub struct ApiFailure(pub EngineError);

impl From<EngineError> for ApiFailure {
    fn from(err: EngineError) -> Self {
        ApiFailure(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(&err);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "request failed");
        }
        let mut error = json!({
            "code": err.code(),
            "message": err.to_string(),
        });
        if let EngineError::Validation {
            field: Some(field), ..
        } = &err
        {
            error["details"] = json!({ "field": field });
        }
        let body = json!({
            "success": false,
            "error": error,
            "meta": { "timestamp": Utc::now() },
        });
        (status, Json(body)).into_response()
    }
}
