//! Wallet row storage: lazy creation, exclusive locking, balance writes.

use num_bigint::BigInt;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use super::error::WalletError;
use super::types::{LockedWallet, Wallet};

pub struct WalletStore;

impl WalletStore {
    /// Fetch the wallet for (user, asset), creating it at balance 0 on
    /// first use.
    ///
    /// A concurrent create racing on the unique (user_id, asset_id)
    /// constraint resolves to a re-read rather than a failure.
    pub async fn get_or_create(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        asset_id: Uuid,
    ) -> Result<Wallet, WalletError> {
        let inserted = sqlx::query(
            r#"INSERT INTO wallets_tb (id, user_id, asset_id, balance)
               VALUES ($1, $2, $3, 0)
               ON CONFLICT (user_id, asset_id) DO NOTHING"#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(asset_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_user_fk(e, user_id))?;

        if inserted.rows_affected() > 0 {
            tracing::info!(%user_id, %asset_id, "Created new wallet");
        }

        let row = sqlx::query(
            r#"SELECT id, user_id, asset_id, balance::text AS balance
               FROM wallets_tb
               WHERE user_id = $1 AND asset_id = $2"#,
        )
        .bind(user_id)
        .bind(asset_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(Wallet {
            id: row.get("id"),
            user_id: row.get("user_id"),
            asset_id: row.get("asset_id"),
            balance: parse_numeric(row.get("balance"))?,
        })
    }

    /// Acquire an exclusive row lock on the wallet.
    ///
    /// The lock is held for the duration of the enclosing transaction;
    /// other writers of the same row block until commit or rollback.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
    ) -> Result<LockedWallet, WalletError> {
        let row = sqlx::query(
            "SELECT id, balance::text AS balance FROM wallets_tb WHERE id = $1 FOR UPDATE",
        )
        .bind(wallet_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(WalletError::WalletNotFound(wallet_id))?;

        Ok(LockedWallet {
            id: row.get("id"),
            balance: parse_numeric(row.get("balance"))?,
        })
    }

    /// Unconditional balance write. Only valid while the lock from
    /// [`WalletStore::lock_for_update`] is held.
    pub async fn set_balance(
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
        balance: &BigInt,
    ) -> Result<(), WalletError> {
        sqlx::query("UPDATE wallets_tb SET balance = $1::numeric, updated_at = NOW() WHERE id = $2")
            .bind(balance.to_string())
            .bind(wallet_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

/// Wallet rows reference `users_tb`; a violated FK means the caller
/// named a user that does not exist.
fn map_user_fk(err: sqlx::Error, user_id: Uuid) -> WalletError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23503") {
            return WalletError::UserNotFound(user_id);
        }
    }
    WalletError::Database(err)
}

/// Decode a NUMERIC fetched through `::text`.
pub(crate) fn parse_numeric(text: String) -> Result<BigInt, WalletError> {
    match text.parse() {
        Ok(value) => Ok(value),
        Err(_) => Err(WalletError::CorruptRow(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("0".to_string()).unwrap(), BigInt::from(0));
        assert_eq!(
            parse_numeric("1000000000".to_string()).unwrap(),
            BigInt::from(1_000_000_000u64)
        );
        assert!(parse_numeric("12.5".to_string()).is_err());
        assert!(parse_numeric("".to_string()).is_err());
    }
}
