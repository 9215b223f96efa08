//! Ledger transaction engine.
//!
//! One credit/debit is a single PostgreSQL transaction: lock the
//! idempotency key, lock the wallet, validate the balance, append a
//! journal entry, write the new balance, consume the key, commit.
//! Anything escaping before commit rolls the whole unit of work back;
//! a journal entry without its balance update is never observable.

use num_bigint::Sign;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::Database;

use super::amount::Amount;
use super::assets::AssetRegistry;
use super::error::WalletError;
use super::idempotency::IdempotencyRegistry;
use super::journal::{Journal, NewEntry};
use super::retry::{execute_with_retry, RetryPolicy};
use super::types::{AssetType, Direction, IdempotencyStatus, TransactionReceipt};
use super::wallet_store::WalletStore;

/// One requested ledger operation with its correlation payload.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Credits purchased with real money; correlates to the payment.
    TopUp { transaction_id: Uuid },
    /// Free credits (referral bonus, rewards). Carries no correlation.
    Bonus,
    /// Spend; correlates to the external order.
    Purchase { reference_id: Uuid },
}

impl Operation {
    pub fn transaction_type(&self) -> super::types::TransactionType {
        match self {
            Operation::TopUp { .. } => super::types::TransactionType::Topup,
            Operation::Bonus => super::types::TransactionType::Bonus,
            Operation::Purchase { .. } => super::types::TransactionType::Purchase,
        }
    }
}

pub struct LedgerEngine {
    db: Arc<Database>,
    retry: RetryPolicy,
    lock_timeout: Duration,
}

impl LedgerEngine {
    pub fn new(db: Arc<Database>, retry: RetryPolicy, lock_timeout: Duration) -> Self {
        Self {
            db,
            retry,
            lock_timeout,
        }
    }

    /// Apply one credit/debit exactly once for the given key.
    ///
    /// The atomic unit of work runs through the retry coordinator;
    /// locks are never held across attempts because each attempt is its
    /// own transaction.
    pub async fn apply_operation(
        &self,
        user_id: Uuid,
        asset_code: &str,
        amount: &Amount,
        idempotency_key: Uuid,
        operation: Operation,
    ) -> Result<TransactionReceipt, WalletError> {
        let asset = AssetRegistry::resolve(self.db.pool(), asset_code).await?;

        execute_with_retry(&self.retry, || {
            self.apply_once(&asset, user_id, amount, idempotency_key, operation)
        })
        .await
        .map_err(map_unique_violation)
    }

    async fn apply_once(
        &self,
        asset: &AssetType,
        user_id: Uuid,
        amount: &Amount,
        idempotency_key: Uuid,
        operation: Operation,
    ) -> Result<TransactionReceipt, WalletError> {
        let mut tx = self.db.pool().begin().await?;

        // Bounded lock-wait window; hitting it surfaces 55P03, which the
        // retry coordinator treats as transient.
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout.as_millis()
        ))
        .execute(&mut *tx)
        .await?;

        IdempotencyRegistry::assert_available(&mut tx, idempotency_key).await?;

        let wallet = WalletStore::get_or_create(&mut tx, user_id, asset.id).await?;
        let locked = WalletStore::lock_for_update(&mut tx, wallet.id).await?;

        let transaction_type = operation.transaction_type();
        let direction = transaction_type.direction();
        let new_balance = match direction {
            Direction::Credit => &locked.balance + amount.as_bigint(),
            Direction::Debit => &locked.balance - amount.as_bigint(),
        };

        if new_balance.sign() == Sign::Minus {
            // Rolls back on drop; the key stays PENDING so the caller
            // may retry with the same key once the cause is resolved.
            return Err(WalletError::InsufficientBalance {
                wallet_id: locked.id,
                requested: amount.as_bigint().clone(),
                available: locked.balance,
            });
        }

        let (transaction_id, reference_id) = match operation {
            Operation::TopUp { transaction_id } => (Some(transaction_id), None),
            Operation::Bonus => (None, None),
            Operation::Purchase { reference_id } => (None, Some(reference_id)),
        };

        let (entry_id, created_at) = Journal::append(
            &mut tx,
            NewEntry {
                wallet_id: locked.id,
                asset_id: asset.id,
                transaction_type,
                direction,
                amount,
                transaction_id,
                reference_id,
            },
        )
        .await?;

        WalletStore::set_balance(&mut tx, locked.id, &new_balance).await?;
        IdempotencyRegistry::mark_processed(&mut tx, idempotency_key).await?;

        tx.commit().await?;

        tracing::info!(
            ledger_entry_id = %entry_id,
            wallet_id = %locked.id,
            transaction_type = transaction_type.as_str(),
            direction = direction.as_str(),
            amount = %amount,
            "Ledger operation committed"
        );

        Ok(TransactionReceipt {
            ledger_entry_id: entry_id,
            transaction_type,
            status: IdempotencyStatus::Processed,
            amount: amount.to_string(),
            asset_name: asset.code.clone(),
            wallet_id: locked.id,
            idempotency_key,
            created_at,
        })
    }
}

/// Two attempts slipping past the lock check can still collide on a
/// unique constraint at commit; the loser is told the operation already
/// happened.
fn map_unique_violation(err: WalletError) -> WalletError {
    match &err {
        WalletError::Database(sqlx::Error::Database(db))
            if db.code().as_deref() == Some("23505") =>
        {
            WalletError::DuplicateTransaction
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TransactionType;

    #[test]
    fn test_operation_transaction_types() {
        let topup = Operation::TopUp {
            transaction_id: Uuid::nil(),
        };
        let purchase = Operation::Purchase {
            reference_id: Uuid::nil(),
        };
        assert_eq!(topup.transaction_type(), TransactionType::Topup);
        assert_eq!(Operation::Bonus.transaction_type(), TransactionType::Bonus);
        assert_eq!(purchase.transaction_type(), TransactionType::Purchase);
    }

    #[test]
    fn test_correlation_direction_pairing() {
        let topup = Operation::TopUp {
            transaction_id: Uuid::nil(),
        };
        assert_eq!(topup.transaction_type().direction(), Direction::Credit);
        let purchase = Operation::Purchase {
            reference_id: Uuid::nil(),
        };
        assert_eq!(purchase.transaction_type().direction(), Direction::Debit);
    }
}
