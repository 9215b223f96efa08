//! Domain and infrastructure errors with stable wire codes.
//!
//! Domain errors surface directly to the caller and are never retried.
//! Unclassified store errors are logged and told to the caller as a
//! generic internal error.

use num_bigint::BigInt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Insufficient balance in wallet {wallet_id}. Requested: {requested}, Available: {available}")]
    InsufficientBalance {
        wallet_id: Uuid,
        requested: BigInt,
        available: BigInt,
    },

    #[error("Invalid idempotency key")]
    InvalidIdempotencyKey,

    #[error("Idempotency key has already been used")]
    IdempotencyKeyAlreadyUsed,

    #[error("This transaction has already been processed. Please retry to get the result")]
    DuplicateTransaction,

    #[error("Transaction failed due to concurrent modification. Please retry")]
    ConcurrencyConflict,

    #[error("Asset type not found: {0}")]
    AssetNotFound(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    EmailExists(String),

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Amount must be a positive integer string: '{0}'")]
    InvalidAmount(String),

    #[error("Corrupt row in store: {0}")]
    CorruptRow(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WalletError {
    /// Stable machine-readable code surfaced on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            WalletError::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            WalletError::IdempotencyKeyAlreadyUsed => "IDEMPOTENCY_KEY_ALREADY_USED",
            WalletError::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            WalletError::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            WalletError::AssetNotFound(_) => "ASSET_NOT_FOUND",
            WalletError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            WalletError::UserNotFound(_) => "USER_NOT_FOUND",
            WalletError::EmailExists(_) => "USER_EMAIL_EXISTS",
            WalletError::TransactionNotFound => "NOT_FOUND",
            WalletError::InvalidAmount(_) => "INVALID_AMOUNT",
            WalletError::CorruptRow(_) | WalletError::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for the gateway layer.
    pub fn http_status(&self) -> u16 {
        match self {
            WalletError::InsufficientBalance { .. }
            | WalletError::InvalidIdempotencyKey
            | WalletError::InvalidAmount(_) => 400,
            WalletError::AssetNotFound(_)
            | WalletError::WalletNotFound(_)
            | WalletError::UserNotFound(_)
            | WalletError::TransactionNotFound => 404,
            WalletError::IdempotencyKeyAlreadyUsed
            | WalletError::DuplicateTransaction
            | WalletError::ConcurrencyConflict
            | WalletError::EmailExists(_) => 409,
            WalletError::CorruptRow(_) | WalletError::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_codes() {
        assert_eq!(
            WalletError::InvalidIdempotencyKey.code(),
            "INVALID_IDEMPOTENCY_KEY"
        );
        assert_eq!(
            WalletError::IdempotencyKeyAlreadyUsed.code(),
            "IDEMPOTENCY_KEY_ALREADY_USED"
        );
        assert_eq!(
            WalletError::DuplicateTransaction.code(),
            "DUPLICATE_TRANSACTION"
        );
        assert_eq!(
            WalletError::ConcurrencyConflict.code(),
            "CONCURRENCY_CONFLICT"
        );
        assert_eq!(
            WalletError::AssetNotFound("GOLD".into()).code(),
            "ASSET_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_statuses() {
        assert_eq!(WalletError::InvalidIdempotencyKey.http_status(), 400);
        assert_eq!(WalletError::IdempotencyKeyAlreadyUsed.http_status(), 409);
        assert_eq!(WalletError::UserNotFound(Uuid::nil()).http_status(), 404);
        assert_eq!(WalletError::TransactionNotFound.http_status(), 404);
        assert_eq!(
            WalletError::Database(sqlx::Error::PoolTimedOut).http_status(),
            500
        );
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = WalletError::InsufficientBalance {
            wallet_id: Uuid::nil(),
            requested: BigInt::from(2000),
            available: BigInt::from(1500),
        };
        let msg = err.to_string();
        assert!(msg.contains("Requested: 2000"));
        assert!(msg.contains("Available: 1500"));
        assert_eq!(err.http_status(), 400);
    }
}
