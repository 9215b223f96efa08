//! User accounts. Wallets hang off users; system accounts (treasury,
//! revenue) are ordinary users with `account_type = SYSTEM`.

mod service;

pub use service::UserService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    User,
    System,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::User => "USER",
            AccountType::System => "SYSTEM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(AccountType::User),
            "SYSTEM" => Some(AccountType::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<AccountType>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: crate::ledger::types::Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_round_trip() {
        assert_eq!(AccountType::parse("USER"), Some(AccountType::User));
        assert_eq!(AccountType::parse("SYSTEM"), Some(AccountType::System));
        assert_eq!(AccountType::parse("user"), None);
        assert_eq!(AccountType::System.as_str(), "SYSTEM");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: Uuid::nil(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            account_type: AccountType::User,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["type"], "USER");
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("account_type").is_none());
    }

    #[test]
    fn test_new_user_defaults() {
        let input: NewUser =
            serde_json::from_str(r#"{"email":"a@b.c","name":"A"}"#).unwrap();
        assert!(input.account_type.is_none());
        assert!(input.is_active.is_none());
    }
}
