//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::ClaimId;

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Files a claim; responds once the assessment attempt has finished
pub async fn file_claim(
    State(state): State<AppState>,
    Json(request): Json<FileClaimRequest>,
) -> Result<(StatusCode, Json<FiledClaimResponse>), ApiError> {
    request.validate()?;

    let filed = state
        .service
        .file_claim(request.member_id, &request.description, request.amount)
        .await?;
    let group = state.service.group().await;

    Ok((
        StatusCode::CREATED,
        Json(FiledClaimResponse {
            claim: ClaimResponse::new(&filed.claim, &group),
            notice: filed.notice,
        }),
    ))
}

/// Lists claims, newest first
pub async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<ClaimListQuery>,
) -> Json<Vec<ClaimResponse>> {
    let group = state.service.group().await;
    let claims = group
        .claims()
        .iter()
        .filter(|c| query.status.map_or(true, |s| c.status() == s))
        .filter(|c| query.member_id.map_or(true, |m| c.claimant_id() == m))
        .map(|c| ClaimResponse::new(c, &group))
        .collect();
    Json(claims)
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<ClaimId>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let group = state.service.group().await;
    let claim = group
        .claim(id)
        .ok_or_else(|| ApiError::NotFound(format!("Claim {id} not found")))?;
    Ok(Json(ClaimResponse::new(claim, &group)))
}

/// Casts a vote; ineligible votes come back with `recorded: false`
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<ClaimId>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let result = state.service.cast_vote(id, request.member_id, request.choice).await?;
    let group = state.service.group().await;
    Ok(Json(VoteResponse::new(result.outcome, ClaimResponse::new(&result.claim, &group))))
}

/// Pays out an approved claim
pub async fn settle_claim(
    State(state): State<AppState>,
    Path(id): Path<ClaimId>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let tx = state.service.settle_claim(id).await?;
    let group = state.service.group().await;
    Ok((StatusCode::CREATED, Json(TransactionResponse::new(tx, &group))))
}
