pub mod api;
pub mod auth;
pub mod cli;
pub mod clinic;
pub mod config;
pub mod models;
pub mod storage;

use anyhow::{Context, Result};

use auth::AuthContext;
use clinic::ClinicState;
use config::Config;
use storage::LocalStore;

pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    pub auth: AuthContext,
    pub clinic: ClinicState,
}

impl AppState {
    /// Restore the stored session and load the clinic collections.
    pub async fn new(config: Config, store: LocalStore) -> Result<Self> {
        let auth = AuthContext::restored(store.clone(), config.auth.clone())
            .await
            .context("Failed to restore demo session")?;
        let clinic = ClinicState::load(store.clone(), config.storage.seed_demo_data)
            .await
            .context("Failed to load clinic data")?;

        Ok(Self {
            config,
            store,
            auth,
            clinic,
        })
    }
}
