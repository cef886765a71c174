//! Top-level role switch and the admin overview.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::clinic::AdminSummary;
use crate::models::{DemoAccountInfo, Profile, Role};
use crate::AppState;

/// Which surface the client should render
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardResponse {
    SignIn {
        demo_accounts: &'static [DemoAccountInfo],
    },
    Dashboard {
        dashboard: Role,
        profile: Profile,
        sections: &'static [&'static str],
    },
}

pub fn sections(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &["overview", "appointments", "doctors", "patients", "billing"],
        Role::Doctor => &["agenda", "patients", "prescriptions"],
        Role::Patient => &["doctors", "appointments", "records"],
    }
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let response = match state.auth.current() {
        None => DashboardResponse::SignIn {
            demo_accounts: state.auth.demo_accounts(),
        },
        Some(profile) => DashboardResponse::Dashboard {
            dashboard: profile.role,
            sections: sections(profile.role),
            profile,
        },
    };
    Json(response)
}

/// GET /api/admin/summary
pub async fn admin_summary(State(state): State<Arc<AppState>>) -> Json<AdminSummary> {
    Json(state.clinic.summary(&state.config.billing.currency).await)
}
