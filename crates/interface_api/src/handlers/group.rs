//! Group handlers

use axum::{extract::State, Json};

use crate::dto::group::{BalanceResponse, FundHealthResponse, GroupResponse};
use crate::AppState;

/// Group snapshot with balance, members, the transaction log and the
/// latest fund health
pub async fn get_group(State(state): State<AppState>) -> Json<GroupResponse> {
    let group = state.service.group().await;
    let health = state.service.latest_health().await;
    Json(GroupResponse::new(&group, health))
}

pub async fn get_balance(State(state): State<AppState>) -> Json<BalanceResponse> {
    Json(state.service.pool_balance().await.into())
}

/// Refreshes the fund health prediction
pub async fn fund_health(State(state): State<AppState>) -> Json<FundHealthResponse> {
    Json(state.service.fund_health().await.into())
}
