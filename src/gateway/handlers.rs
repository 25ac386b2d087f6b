//! HTTP handlers for the wallet API
//!
//! Handlers only check syntax (JSON shape, UUID format) and leave business
//! validation to [`WalletService`](crate::wallet::WalletService). Operation
//! bodies are decoded as JSON whatever `Content-Type` the client sent.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::state::AppState;
use super::types::{
    ApiError, ApiResult, BalanceResponse, ErrorResponse, HealthResponse, OperationResponse,
};
use crate::wallet::WalletOperationRequest;

/// Submit a deposit or withdrawal
///
/// POST /api/v1/wallet
#[utoipa::path(
    post,
    path = "/api/v1/wallet",
    request_body = WalletOperationRequest,
    responses(
        (status = 200, description = "Operation committed", body = OperationResponse),
        (status = 400, description = "Invalid body, non-positive amount, unknown operation type or insufficient funds", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Wallet"
)]
pub async fn submit_operation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<OperationResponse> {
    let req: WalletOperationRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected wallet operation body");
        ApiError::InvalidRequestBody
    })?;

    let wallet_id = req.wallet_id;
    state
        .wallet_service
        .process_operation(req)
        .await
        .map_err(|e| {
            tracing::info!(wallet_id = %wallet_id, code = e.code(), "Wallet operation failed");
            ApiError::from(e)
        })?;

    Ok(Json(OperationResponse::success()))
}

/// Get wallet balance
///
/// GET /api/v1/wallets/{wallet_id}
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}",
    params(
        ("wallet_id" = String, Path, description = "Wallet UUID")
    ),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 400, description = "Malformed wallet ID", body = ErrorResponse),
        (status = 404, description = "Wallet never used", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Wallet"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
) -> ApiResult<BalanceResponse> {
    let wallet_id = Uuid::parse_str(&wallet_id).map_err(|_| ApiError::InvalidWalletId)?;

    let balance = state.wallet_service.get_balance(wallet_id).await?;

    Ok(Json(BalanceResponse { wallet_id, balance }))
}

/// Health check endpoint
///
/// Pings the ledger store; failure detail goes to the log, not the response.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Service unavailable", body = ErrorResponse)
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<HealthResponse>), ApiError> {
    let service = &state.wallet_service;
    if let Err(e) = service.health_check().await {
        tracing::error!(error = %e, "[HEALTH] Ledger store check failed");
        return Err(ApiError::ServiceUnavailable);
    }

    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            store: service.store_name().to_string(),
        }),
    ))
}
