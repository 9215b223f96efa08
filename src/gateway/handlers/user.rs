//! User account endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::clamp_page;
use crate::gateway::response::ApiResponse;
use crate::gateway::state::AppState;
use crate::ledger::error::WalletError;
use crate::user::{NewUser, User, UserPage, UserService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), WalletError> {
    let user = UserService::create(state.db.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, WalletError> {
    let user = UserService::get_by_id(state.db.pool(), id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<UserPage>>, WalletError> {
    let (limit, offset) = clamp_page(query.limit, query.offset);
    let page = UserService::list(state.db.pool(), limit, offset).await?;
    Ok(Json(ApiResponse::success(page)))
}
