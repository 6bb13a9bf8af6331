//! Contribution handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::dto::claims::{ContributionRequest, TransactionResponse};
use crate::{error::ApiError, AppState};

pub async fn record_contribution(
    State(state): State<AppState>,
    Json(request): Json<ContributionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    request.validate()?;

    let tx = state
        .service
        .record_contribution(request.member_id, request.amount)
        .await?;
    let group = state.service.group().await;
    Ok((StatusCode::CREATED, Json(TransactionResponse::new(tx, &group))))
}
