//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::types::{BalanceResponse, ErrorResponse, HealthResponse, OperationResponse};
use crate::wallet::WalletOperationRequest;

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Ledger API",
        version = "1.0.0",
        description = "Deposit, withdraw and query wallet balances. Balances are kept in the smallest currency unit and never go negative.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::submit_operation,
        crate::gateway::handlers::get_balance,
        crate::gateway::handlers::health_check,
    ),
    components(
        schemas(
            WalletOperationRequest,
            OperationResponse,
            BalanceResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Wallet", description = "Wallet operations and balance queries"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
