//! Unbounded integer amounts.
//!
//! Monetary values travel as decimal strings and are stored as NUMERIC;
//! inside the process they are num-bigint integers, never floats.

use num_bigint::{BigInt, Sign};
use std::fmt;

use super::error::WalletError;

/// A strictly positive, arbitrary-precision integer amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(BigInt);

impl Amount {
    /// Parse a decimal-string amount.
    ///
    /// Accepts ASCII digits only: no sign, no decimal point, no zero.
    pub fn parse(s: &str) -> Result<Self, WalletError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WalletError::InvalidAmount(s.to_string()));
        }
        let value: BigInt = s
            .parse()
            .map_err(|_| WalletError::InvalidAmount(s.to_string()))?;
        if value.sign() != Sign::Plus {
            return Err(WalletError::InvalidAmount(s.to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_amounts() {
        assert_eq!(Amount::parse("1").unwrap().to_string(), "1");
        assert_eq!(Amount::parse("500").unwrap().to_string(), "500");
        // Well beyond u128
        let huge = "123456789012345678901234567890123456789012345678901234567890";
        assert_eq!(Amount::parse(huge).unwrap().to_string(), huge);
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!(Amount::parse("0").is_err());
        assert!(Amount::parse("000").is_err());
    }

    #[test]
    fn test_parse_rejects_signs_and_decimals() {
        assert!(Amount::parse("-5").is_err());
        assert!(Amount::parse("+5").is_err());
        assert!(Amount::parse("1.5").is_err());
        assert!(Amount::parse("1e3").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("abc").is_err());
        assert!(Amount::parse("12 3").is_err());
    }
}
