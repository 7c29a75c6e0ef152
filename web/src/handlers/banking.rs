//! Banking endpoints.
//!
//! Handlers only translate HTTP to [`BankingService`] calls; validation,
//! persistence and telemetry all happen in the service.
//!
//! [`BankingService`]: banking_core::BankingService

use crate::error::AppError;
use crate::extractors::{Authenticated, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use banking_core::{
    BalanceResponse, LoginRequest, LoginResponse, LogoutResponse, TransactionFilter,
    TransactionsResponse, TransferRequest, TransferResponse,
};
use serde::Deserialize;

/// Query string of `GET /balance`.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Account kind, defaults to `checking`
    pub account: Option<String>,
}

/// `POST /login`
///
/// # Errors
///
/// 401 `INVALID_CREDENTIALS` when the username or password is wrong.
pub async fn login(
    State(state): State<AppState>,
    CorrelationId(ctx): CorrelationId,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.service.login(&ctx, request).await?))
}

/// `POST /transfer`
///
/// # Errors
///
/// 400 on validation failures, 401 without a valid session.
pub async fn transfer(
    State(state): State<AppState>,
    CorrelationId(ctx): CorrelationId,
    Authenticated(principal): Authenticated,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    Ok(Json(
        state.service.transfer(&ctx, &principal, request).await?,
    ))
}

/// `GET /balance?account=`
///
/// # Errors
///
/// 400 `INVALID_ACCOUNT` for an unknown account kind, 401 without a valid
/// session.
pub async fn balance(
    State(state): State<AppState>,
    CorrelationId(ctx): CorrelationId,
    Authenticated(principal): Authenticated,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = query
        .account
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("checking");
    Ok(Json(
        state.service.balance(&ctx, &principal, account).await?,
    ))
}

/// `GET /transactions?accountType=&startDate=&endDate=`
///
/// # Errors
///
/// 401 without a valid session.
pub async fn transactions(
    State(state): State<AppState>,
    CorrelationId(ctx): CorrelationId,
    Authenticated(principal): Authenticated,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<TransactionsResponse>, AppError> {
    Ok(Json(
        state
            .service
            .transactions(&ctx, &principal, &filter)
            .await?,
    ))
}

/// `POST /logout`
///
/// # Errors
///
/// 401 without a valid session.
pub async fn logout(
    State(state): State<AppState>,
    CorrelationId(ctx): CorrelationId,
    Authenticated(principal): Authenticated,
) -> Result<Json<LogoutResponse>, AppError> {
    Ok(Json(state.service.logout(&ctx, &principal).await?))
}
