//! USSD channel handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::ussd::{UssdRequest, UssdResponse};
use crate::{error::ApiError, AppState};

/// Runs one menu turn for a session
pub async fn turn(
    State(state): State<AppState>,
    Json(request): Json<UssdRequest>,
) -> Result<Json<UssdResponse>, ApiError> {
    request.validate()?;

    let screen = state
        .sessions
        .turn(&request.session_id, request.member_id, &request.text)
        .await?;
    Ok(Json(screen.into()))
}

/// Ends a session
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.end(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {session_id} not found")))
    }
}
