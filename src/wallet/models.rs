use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ValidationError;

/// Persisted wallet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,
    /// Smallest currency unit, never negative once committed
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Fresh zero-balance wallet
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    /// Sign the amount for `apply_delta`: credit for deposits, debit for withdrawals
    pub fn signed_delta(self, amount: i64) -> i64 {
        match self {
            OperationType::Deposit => amount,
            OperationType::Withdraw => -amount,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "DEPOSIT"),
            OperationType::Withdraw => write!(f, "WITHDRAW"),
        }
    }
}

impl FromStr for OperationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(OperationType::Deposit),
            "WITHDRAW" => Ok(OperationType::Withdraw),
            other => Err(ValidationError::UnknownOperationType(other.to_string())),
        }
    }
}

/// Client-submitted operation, as decoded off the wire.
///
/// `operation_type` stays a raw literal so the service can reject unknown
/// values itself, after the amount check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletOperationRequest {
    pub wallet_id: Uuid,
    /// "DEPOSIT" or "WITHDRAW"
    #[serde(default)]
    #[schema(example = "DEPOSIT")]
    pub operation_type: String,
    /// Smallest currency unit, must be positive
    #[serde(default)]
    #[schema(example = 1000)]
    pub amount: i64,
}

impl WalletOperationRequest {
    pub fn new(wallet_id: Uuid, operation_type: impl Into<String>, amount: i64) -> Self {
        Self {
            wallet_id,
            operation_type: operation_type.into(),
            amount,
        }
    }
}
