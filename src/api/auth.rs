//! Sign-in, sign-up and sign-out endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{DemoAccountInfo, Profile, Role, SessionResponse, SignInRequest, SignUpRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::validate_required;

/// Current session, `profile: null` when signed out
#[derive(Debug, Serialize)]
pub struct CurrentSessionResponse {
    pub profile: Option<Profile>,
}

/// Sign in with email and password
///
/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("email", validate_required(&req.email, "Email"));
    errors.check("password", validate_required(&req.password, "Password"));
    errors.finish()?;

    let profile = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(SessionResponse { profile }))
}

/// Create a local account and sign it in
///
/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let role: Role = req
        .role
        .parse()
        .map_err(|e: String| ApiError::validation_field("role", e))?;

    let profile = state
        .auth
        .sign_up(&req.email, &req.password, &req.full_name, role)
        .await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { profile })))
}

/// End the current session
///
/// POST /api/auth/sign-out
pub async fn sign_out(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.auth.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session
pub async fn session(State(state): State<Arc<AppState>>) -> Json<CurrentSessionResponse> {
    Json(CurrentSessionResponse {
        profile: state.auth.current(),
    })
}

/// Built-in accounts listed on the sign-in surface
///
/// GET /api/auth/demo-accounts
pub async fn demo_accounts(State(state): State<Arc<AppState>>) -> Json<&'static [DemoAccountInfo]> {
    Json(state.auth.demo_accounts())
}
