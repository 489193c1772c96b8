//! API Routes
//!
//! HTTP endpoint definitions.

use std::future::Future;
use std::time::Duration;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Customer, CustomerStatus, OperationContext, TransactionId};
use crate::error::AppError;
use crate::handlers::{
    AccountOpener, OpenAccountCommand, PostTransactionCommand, TransactionPoster,
};
use crate::store::{BankStore, StoreError};

/// Shared router state
#[derive(Debug, Clone)]
pub struct AppState<S> {
    pub store: S,
    /// Upper bound for every storage interaction made by a request
    pub store_timeout: Duration,
}

impl<S: BankStore> AppState<S> {
    pub fn new(store: S, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AppError::storage_timeout()),
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CustomersQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAccountRequest {
    pub account_type: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OpenAccountResponse {
    pub account_id: AccountId,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRequestBody {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub transaction_type: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub new_balance: Decimal,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router<S: BankStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/customers", get(list_customers::<S>))
        .route("/customers/:customer_id", get(get_customer::<S>))
        .route("/customers/:customer_id/account", post(open_account::<S>))
        .route(
            "/customers/:customer_id/transaction",
            post(post_transaction::<S>),
        )
}

// =========================================================================
// GET /customers
// =========================================================================

/// List customers, optionally filtered by status
async fn list_customers<S: BankStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<CustomersQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CustomerStatus>)
        .transpose()?;

    let customers = state.bounded(state.store.list_customers(status)).await?;

    Ok(Json(customers))
}

// =========================================================================
// GET /customers/:customer_id
// =========================================================================

async fn get_customer<S: BankStore>(
    State(state): State<AppState<S>>,
    Path(customer_id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .bounded(state.store.find_customer(&customer_id))
        .await?
        .ok_or_else(AppError::customer_not_found)?;

    Ok(Json(customer))
}

// =========================================================================
// POST /customers/:customer_id/account
// =========================================================================

/// Open a new account with an opening deposit
async fn open_account<S: BankStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<OperationContext>,
    Path(customer_id): Path<String>,
    Json(request): Json<OpenAccountRequest>,
) -> Result<(StatusCode, Json<OpenAccountResponse>), AppError> {
    let handler = AccountOpener::new(state.store.clone(), state.store_timeout);

    let command = OpenAccountCommand::new(customer_id, request.account_type, request.amount);
    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(OpenAccountResponse {
            account_id: result.account_id,
        }),
    ))
}

// =========================================================================
// POST /customers/:customer_id/transaction
// =========================================================================

/// Post a deposit or withdrawal.
///
/// The path customer ID only routes the request; the posting is keyed by the
/// account ID in the body.
async fn post_transaction<S: BankStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<OperationContext>,
    Path(customer_id): Path<String>,
    Json(request): Json<TransactionRequestBody>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    tracing::debug!(
        customer_id = %customer_id,
        account_id = %request.account_id,
        correlation_id = ?context.correlation_id,
        "Posting transaction"
    );

    let handler = TransactionPoster::new(state.store.clone(), state.store_timeout);

    let command =
        PostTransactionCommand::new(request.account_id, request.amount, request.transaction_type);
    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction_id: result.transaction_id,
            new_balance: result.resulting_balance,
        }),
    ))
}
