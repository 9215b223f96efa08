//! Wire envelope: `{success: true, data}` on success,
//! `{success: false, error: {code, message}}` on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::ledger::error::WalletError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Store failures keep their detail in the logs, not on the wire.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        } else {
            tracing::warn!(error = %self, code = self.code(), "Request rejected");
            self.to_string()
        };

        let body = json!({
            "success": false,
            "error": { "code": self.code(), "message": message },
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success(json!({"ok": 1}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["ok"], 1);
    }

    #[tokio::test]
    async fn test_domain_error_keeps_message() {
        let response = WalletError::UserNotFound(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "USER_NOT_FOUND");
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("User not found"));
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let response = WalletError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(value["error"]["message"], "An internal error occurred");
    }
}
