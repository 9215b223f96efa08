//! Asset catalog lookups.

use sqlx::{PgPool, Row};

use super::error::WalletError;
use super::types::AssetType;

/// Read-only registry over `asset_types_tb`.
///
/// The catalog is effectively static, so resolution runs outside any
/// transaction and takes no locks.
pub struct AssetRegistry;

impl AssetRegistry {
    /// Resolve a symbolic asset code (e.g. "GOLD") to its catalog row.
    pub async fn resolve(pool: &PgPool, code: &str) -> Result<AssetType, WalletError> {
        let row = sqlx::query("SELECT id, code FROM asset_types_tb WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(AssetType {
                id: row.get("id"),
                code: row.get("code"),
            }),
            None => Err(WalletError::AssetNotFound(code.to_string())),
        }
    }
}
