pub mod health;
pub mod user;
pub mod wallet;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::ledger::error::WalletError;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Pre-issued key from the `idempotency-key` request header. Missing or
/// malformed values get the same rejection as an unissued key.
fn idempotency_key_from(headers: &HeaderMap) -> Result<Uuid, WalletError> {
    headers
        .get("idempotency-key")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(WalletError::InvalidIdempotencyKey)
}

fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_extraction() {
        let mut headers = HeaderMap::new();
        let key = Uuid::new_v4();
        headers.insert(
            "idempotency-key",
            HeaderValue::from_str(&key.to_string()).unwrap(),
        );
        assert_eq!(idempotency_key_from(&headers).unwrap(), key);
    }

    #[test]
    fn test_missing_or_malformed_header_rejected() {
        let empty = HeaderMap::new();
        assert!(matches!(
            idempotency_key_from(&empty),
            Err(WalletError::InvalidIdempotencyKey)
        ));

        let mut bad = HeaderMap::new();
        bad.insert("idempotency-key", HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            idempotency_key_from(&bad),
            Err(WalletError::InvalidIdempotencyKey)
        ));
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(clamp_page(None, None), (20, 0));
        assert_eq!(clamp_page(Some(500), Some(-5)), (100, 0));
        assert_eq!(clamp_page(Some(0), Some(40)), (1, 40));
        assert_eq!(clamp_page(Some(50), Some(10)), (50, 10));
    }
}
