//! Gateway request/response types and error mapping
//!
//! - Response DTOs for the wallet endpoints
//! - `ApiError`: every failure the gateway can return, rendered as `{"error": msg}`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::wallet::{ValidationError, WalletError};

// ============================================================================
// Response DTOs
// ============================================================================

/// Returned when an operation is committed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OperationResponse {
    #[schema(example = "success")]
    pub status: String,
}

impl OperationResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Wallet balance
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub wallet_id: Uuid,
    #[schema(example = 1000)]
    pub balance: i64,
}

/// Error body for every non-2xx response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Insufficient funds")]
    pub error: String,
}

/// Health check response data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Ledger store backing this instance
    #[schema(example = "Postgres")]
    pub store: String,
}

// ============================================================================
// ApiError
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InvalidRequestBody,
    InvalidWalletId,
    NonPositiveAmount,
    InvalidOperationType,
    InsufficientFunds,
    WalletNotFound,
    ServiceUnavailable,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequestBody
            | ApiError::InvalidWalletId
            | ApiError::NonPositiveAmount
            | ApiError::InvalidOperationType
            | ApiError::InsufficientFunds => StatusCode::BAD_REQUEST,
            ApiError::WalletNotFound => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; never carries internal detail
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidRequestBody => "Invalid request body",
            ApiError::InvalidWalletId => "Invalid wallet ID",
            ApiError::NonPositiveAmount => "Amount must be positive",
            ApiError::InvalidOperationType => "Operation type must be DEPOSIT or WITHDRAW",
            ApiError::InsufficientFunds => "Insufficient funds",
            ApiError::WalletNotFound => "Wallet not found",
            ApiError::ServiceUnavailable => "Service unavailable",
            ApiError::Internal => "Internal server error",
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Validation(ValidationError::NonPositiveAmount) => {
                ApiError::NonPositiveAmount
            }
            WalletError::Validation(ValidationError::UnknownOperationType(_)) => {
                ApiError::InvalidOperationType
            }
            WalletError::InsufficientFunds(_) => ApiError::InsufficientFunds,
            WalletError::NotFound(_) => ApiError::WalletNotFound,
            WalletError::Storage(err) => {
                tracing::error!(error = %err, "Ledger store failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (self.status(), body).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
