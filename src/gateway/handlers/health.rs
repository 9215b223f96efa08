//! Health check handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::gateway::response::ApiResponse;
use crate::gateway::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Pings the store; unhealthy reports 503 without internal detail.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, (StatusCode, Json<serde_json::Value>)> {
    match state.db.health_check().await {
        Ok(()) => Ok(Json(ApiResponse::success(HealthResponse { status: "ok" }))),
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": {
                        "code": "SERVICE_UNAVAILABLE",
                        "message": "Service is unavailable",
                    },
                })),
            ))
        }
    }
}
