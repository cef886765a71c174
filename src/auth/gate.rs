//! Role gate for the dashboard routes.
//!
//! This is UX gating, not authorization. The profile it checks is
//! fabricated from the local store, so anyone who can edit that store can
//! claim any role. It decides which surface to show; it must never stand in
//! for server-side access control over real data.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::api::error::ApiError;
use crate::models::{Profile, Role};
use crate::AppState;

/// What a gated view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No profile: show the sign-in surface
    SignIn,
    /// Profile present but its role is not allowed here
    Denied { role: Role },
    /// Render the protected content for this profile
    Granted(Profile),
}

pub fn evaluate(profile: Option<&Profile>, allowed: &[Role]) -> GateDecision {
    match profile {
        None => GateDecision::SignIn,
        Some(p) if allowed.contains(&p.role) => GateDecision::Granted(p.clone()),
        Some(p) => GateDecision::Denied { role: p.role },
    }
}

impl GateDecision {
    pub fn into_result(self) -> Result<Profile, ApiError> {
        match self {
            GateDecision::Granted(profile) => Ok(profile),
            GateDecision::SignIn => Err(ApiError::unauthorized("Please sign in")),
            GateDecision::Denied { role } => Err(ApiError::forbidden(format!(
                "Access denied: {} accounts cannot open this page",
                role
            ))),
        }
    }
}

async fn gate(state: &AppState, allowed: &[Role], mut request: Request, next: Next) -> Result<Response, ApiError> {
    let decision = evaluate(state.auth.current().as_ref(), allowed);
    debug!(path = %request.uri().path(), ?decision, "Role gate");

    let profile = decision.into_result()?;
    request.extensions_mut().insert(profile);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, &[Role::Admin], request, next).await
}

pub async fn require_doctor(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, &[Role::Doctor], request, next).await
}

pub async fn require_patient(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, &[Role::Patient], request, next).await
}

/// The gated profile, or the current one outside gated routes.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Profile {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if let Some(profile) = parts.extensions.get::<Profile>() {
            return Ok(profile.clone());
        }
        state
            .auth
            .current()
            .ok_or_else(|| ApiError::unauthorized("Please sign in"))
    }
}
