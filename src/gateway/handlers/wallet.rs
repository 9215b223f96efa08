//! Wallet endpoints: key issuance, the three mutations, and reads.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clamp_page, idempotency_key_from};
use crate::gateway::response::ApiResponse;
use crate::gateway::state::AppState;
use crate::ledger::amount::Amount;
use crate::ledger::engine::Operation;
use crate::ledger::error::WalletError;
use crate::ledger::idempotency::IdempotencyRegistry;
use crate::ledger::queries::LedgerQueries;
use crate::ledger::types::{
    IssuedKey, JournalEntryView, TransactionPage, TransactionReceipt, TransactionType,
    WalletBalance,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub user_id: Uuid,
    pub asset_name: String,
    pub amount: String,
    pub transaction_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRequest {
    pub user_id: Uuid,
    pub asset_name: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub user_id: Uuid,
    pub asset_name: String,
    pub amount: String,
    pub reference_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub user_id: Uuid,
    pub wallets: Vec<WalletBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub asset_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub wallet_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn issue_idempotency_key(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<IssuedKey>>), WalletError> {
    let issued = IdempotencyRegistry::issue(state.db.pool()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(issued))))
}

pub async fn top_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TopUpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionReceipt>>), WalletError> {
    let key = idempotency_key_from(&headers)?;
    tracing::info!(
        user_id = %req.user_id,
        asset_name = %req.asset_name,
        amount = %req.amount,
        idempotency_key = %key,
        "Top-up request received"
    );

    let amount = Amount::parse(&req.amount)?;
    let receipt = state
        .engine
        .apply_operation(
            req.user_id,
            &req.asset_name,
            &amount,
            key,
            Operation::TopUp {
                transaction_id: req.transaction_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}

pub async fn bonus(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BonusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionReceipt>>), WalletError> {
    let key = idempotency_key_from(&headers)?;
    tracing::info!(
        user_id = %req.user_id,
        asset_name = %req.asset_name,
        amount = %req.amount,
        idempotency_key = %key,
        "Bonus request received"
    );

    let amount = Amount::parse(&req.amount)?;
    let receipt = state
        .engine
        .apply_operation(req.user_id, &req.asset_name, &amount, key, Operation::Bonus)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}

pub async fn purchase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionReceipt>>), WalletError> {
    let key = idempotency_key_from(&headers)?;
    tracing::info!(
        user_id = %req.user_id,
        asset_name = %req.asset_name,
        amount = %req.amount,
        idempotency_key = %key,
        "Purchase request received"
    );

    let amount = Amount::parse(&req.amount)?;
    let receipt = state
        .engine
        .apply_operation(
            req.user_id,
            &req.asset_name,
            &amount,
            key,
            Operation::Purchase {
                reference_id: req.reference_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<ApiResponse<BalanceResponse>>, WalletError> {
    let wallets =
        LedgerQueries::get_balance(state.db.pool(), user_id, query.asset_name.as_deref()).await?;
    Ok(Json(ApiResponse::success(BalanceResponse {
        user_id,
        wallets,
    })))
}

pub async fn get_transaction_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<TransactionPage>>, WalletError> {
    let (limit, offset) = clamp_page(query.limit, query.offset);
    let page = LedgerQueries::get_transaction_history(
        state.db.pool(),
        query.wallet_id,
        query.transaction_type,
        limit,
        offset,
    )
    .await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_transaction_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JournalEntryView>>, WalletError> {
    let entry = LedgerQueries::get_transaction_by_id(state.db.pool(), id)
        .await?
        .ok_or(WalletError::TransactionNotFound)?;
    Ok(Json(ApiResponse::success(entry)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_dtos_are_camel_case() {
        let req: TopUpRequest = serde_json::from_str(
            r#"{
                "userId": "00000000-0000-0000-0000-000000000001",
                "assetName": "GOLD",
                "amount": "500",
                "transactionId": "00000000-0000-0000-0000-000000000002"
            }"#,
        )
        .unwrap();
        assert_eq!(req.asset_name, "GOLD");
        assert_eq!(req.amount, "500");
    }

    #[test]
    fn test_history_query_type_filter() {
        let query: HistoryQuery = serde_json::from_str(
            r#"{"walletId": "00000000-0000-0000-0000-000000000001", "type": "TOPUP"}"#,
        )
        .unwrap();
        assert_eq!(query.transaction_type, Some(TransactionType::Topup));
        assert!(query.limit.is_none());
    }
}
