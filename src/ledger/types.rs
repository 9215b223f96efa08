//! Core ledger types and wire DTOs.

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of balance mutation recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Topup,
    Bonus,
    Purchase,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Topup => "TOPUP",
            TransactionType::Bonus => "BONUS",
            TransactionType::Purchase => "PURCHASE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TOPUP" => Some(TransactionType::Topup),
            "BONUS" => Some(TransactionType::Bonus),
            "PURCHASE" => Some(TransactionType::Purchase),
            _ => None,
        }
    }

    /// TOPUP and BONUS credit the wallet; PURCHASE debits it.
    pub fn direction(&self) -> Direction {
        match self {
            TransactionType::Topup | TransactionType::Bonus => Direction::Credit,
            TransactionType::Purchase => Direction::Debit,
        }
    }
}

/// Sign of a journal entry relative to the wallet balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "CREDIT",
            Direction::Debit => "DEBIT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREDIT" => Some(Direction::Credit),
            "DEBIT" => Some(Direction::Debit),
            _ => None,
        }
    }
}

/// Lifecycle of a single-use idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdempotencyStatus {
    Pending,
    Processed,
}

impl IdempotencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdempotencyStatus::Pending => "PENDING",
            IdempotencyStatus::Processed => "PROCESSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(IdempotencyStatus::Pending),
            "PROCESSED" => Some(IdempotencyStatus::Processed),
            _ => None,
        }
    }
}

/// Resolved asset catalog row. Immutable once created.
#[derive(Debug, Clone)]
pub struct AssetType {
    pub id: Uuid,
    pub code: String,
}

/// Per-(user, asset) balance row.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub asset_id: Uuid,
    pub balance: BigInt,
}

/// Snapshot of a wallet row while its FOR UPDATE lock is held.
#[derive(Debug)]
pub struct LockedWallet {
    pub id: Uuid,
    pub balance: BigInt,
}

/// Response for a freshly issued idempotency key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedKey {
    pub idempotency_key: Uuid,
    pub status: IdempotencyStatus,
    pub created_at: DateTime<Utc>,
}

/// Echo of a successful ledger operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub ledger_entry_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: IdempotencyStatus,
    pub amount: String,
    pub asset_name: String,
    pub wallet_id: Uuid,
    pub idempotency_key: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Journal entry as returned by the read-side queries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: IdempotencyStatus,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub asset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
    pub direction: Direction,
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

/// Balance view for one wallet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub asset_name: String,
    pub balance: String,
}

/// Offset pagination envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

/// One page of transaction history.
#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<JournalEntryView>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_roundtrip() {
        for t in [
            TransactionType::Topup,
            TransactionType::Bonus,
            TransactionType::Purchase,
        ] {
            assert_eq!(TransactionType::parse(t.as_str()), Some(t));
        }
        assert_eq!(TransactionType::parse("REFUND"), None);
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(TransactionType::Topup.direction(), Direction::Credit);
        assert_eq!(TransactionType::Bonus.direction(), Direction::Credit);
        assert_eq!(TransactionType::Purchase.direction(), Direction::Debit);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(Direction::parse("CREDIT"), Some(Direction::Credit));
        assert_eq!(Direction::parse("DEBIT"), Some(Direction::Debit));
        assert_eq!(Direction::parse("credit"), None);
    }

    #[test]
    fn test_idempotency_status_roundtrip() {
        assert_eq!(
            IdempotencyStatus::parse("PENDING"),
            Some(IdempotencyStatus::Pending)
        );
        assert_eq!(
            IdempotencyStatus::parse("PROCESSED"),
            Some(IdempotencyStatus::Processed)
        );
        assert_eq!(IdempotencyStatus::parse(""), None);
    }

    #[test]
    fn test_pagination_has_more() {
        assert!(Pagination::new(100, 20, 0).has_more);
        assert!(Pagination::new(100, 20, 79).has_more);
        assert!(!Pagination::new(100, 20, 80).has_more);
        assert!(!Pagination::new(0, 20, 0).has_more);
        assert!(!Pagination::new(5, 20, 0).has_more);
    }

    #[test]
    fn test_receipt_wire_shape() {
        let receipt = TransactionReceipt {
            ledger_entry_id: Uuid::nil(),
            transaction_type: TransactionType::Topup,
            status: IdempotencyStatus::Processed,
            amount: "500".to_string(),
            asset_name: "GOLD".to_string(),
            wallet_id: Uuid::nil(),
            idempotency_key: Uuid::nil(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["type"], "TOPUP");
        assert_eq!(json["status"], "PROCESSED");
        assert_eq!(json["amount"], "500");
        assert!(json.get("ledgerEntryId").is_some());
        assert!(json.get("assetName").is_some());
        assert!(json.get("walletId").is_some());
        assert!(json.get("idempotencyKey").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_entry_view_omits_empty_correlation() {
        let view = JournalEntryView {
            id: Uuid::nil(),
            transaction_type: TransactionType::Bonus,
            status: IdempotencyStatus::Processed,
            wallet_id: Uuid::nil(),
            user_id: Uuid::nil(),
            asset_name: "GOLD".to_string(),
            transaction_id: None,
            reference_id: None,
            direction: Direction::Credit,
            amount: "10".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("transactionId").is_none());
        assert!(json.get("referenceId").is_none());
        assert_eq!(json["direction"], "CREDIT");
    }
}
