//! Demo sessions backed by the local store.
//!
//! The current profile is fabricated from the `demo_user` record. Nothing
//! here authenticates anyone: whoever can write the local store can become
//! any role. See [`gate`] for how dashboards use the profile.

pub mod gate;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use parking_lot::RwLock;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::validation::validate_email;
use crate::config::AuthConfig;
use crate::models::{DemoAccountInfo, LocalAccount, Profile, Role, StoredSession};
use crate::storage::{LocalStore, StoreError, DEMO_USERS_KEY, DEMO_USER_KEY};

pub static DEMO_ACCOUNTS: [DemoAccountInfo; 3] = [
    DemoAccountInfo {
        email: "admin@demo.test",
        password: "admin123",
        role: Role::Admin,
        full_name: "Admin Demo",
    },
    DemoAccountInfo {
        email: "doctor@demo.test",
        password: "doctor123",
        role: Role::Doctor,
        full_name: "Dr. Demo",
    },
    DemoAccountInfo {
        email: "patient@demo.test",
        password: "patient123",
        role: Role::Patient,
        full_name: "Patient Demo",
    },
];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

impl AuthError {
    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug)]
pub struct AuthContext {
    store: LocalStore,
    config: AuthConfig,
    current: RwLock<Option<Profile>>,
    /// Serializes read-modify-write of `demo_users`
    signups: Mutex<()>,
}

impl AuthContext {
    pub fn new(store: LocalStore, config: AuthConfig) -> Self {
        Self {
            store,
            config,
            current: RwLock::new(None),
            signups: Mutex::new(()),
        }
    }

    /// Build a context and restore any stored session.
    pub async fn restored(store: LocalStore, config: AuthConfig) -> Result<Self, AuthError> {
        let auth = Self::new(store, config);
        auth.restore().await?;
        Ok(auth)
    }

    pub fn current(&self) -> Option<Profile> {
        self.current.read().clone()
    }

    /// Built-in accounts offered on the sign-in surface (empty when disabled).
    pub fn demo_accounts(&self) -> &'static [DemoAccountInfo] {
        if self.config.demo_accounts_enabled {
            &DEMO_ACCOUNTS
        } else {
            &[]
        }
    }

    /// Re-read `demo_user`. Malformed data counts as signed out.
    pub async fn restore(&self) -> Result<Option<Profile>, AuthError> {
        let profile = match self.store.read_json::<StoredSession>(DEMO_USER_KEY).await? {
            Some(session) if !session.email.trim().is_empty() => Some(Profile::fabricate(
                &session.email,
                session.role,
                session.full_name.as_deref(),
                now_millis(),
            )),
            Some(_) => {
                warn!("Stored session has no email, ignoring it");
                None
            }
            None => None,
        };

        match profile {
            Some(ref p) => info!(email = %p.email, role = %p.role, "Restored demo session"),
            None => debug!("No stored session"),
        }

        *self.current.write() = profile.clone();
        Ok(profile)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let email = normalize_email(email);

        let session = match self.find_demo_account(&email, password) {
            Some(account) => Some(StoredSession {
                email: account.email.to_string(),
                role: account.role,
                full_name: Some(account.full_name.to_string()),
            }),
            None => self
                .local_accounts()
                .await?
                .into_iter()
                .find(|account| account.email == email && verify_password(password, &account.password_hash))
                .map(|account| StoredSession {
                    email: account.email,
                    role: account.role,
                    full_name: Some(account.full_name),
                }),
        };

        let Some(session) = session else {
            warn!(email = %email, "Sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let profile = self.start_session(&session).await?;
        info!(email = %profile.email, role = %profile.role, "Signed in");
        Ok(profile)
    }

    /// Register a local account and sign it in.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str, role: Role) -> Result<Profile, AuthError> {
        let email = normalize_email(email);
        let full_name = full_name.trim();

        if full_name.is_empty() {
            return Err(AuthError::validation("full_name", "Full name is required"));
        }
        validate_email(&email).map_err(|message| AuthError::validation("email", message))?;
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::validation(
                "password",
                format!(
                    "Password must be at least {} characters",
                    self.config.min_password_length
                ),
            ));
        }

        let _guard = self.signups.lock().await;

        let mut accounts = self.local_accounts().await?;
        let taken = DEMO_ACCOUNTS.iter().any(|a| a.email == email) || accounts.iter().any(|a| a.email == email);
        if taken {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;
        accounts.push(LocalAccount {
            email: email.clone(),
            password_hash,
            role,
            full_name: full_name.to_string(),
        });
        self.store.write_json(DEMO_USERS_KEY, &accounts).await?;

        let profile = self
            .start_session(&StoredSession {
                email,
                role,
                full_name: Some(full_name.to_string()),
            })
            .await?;
        info!(email = %profile.email, role = %profile.role, "Signed up");
        Ok(profile)
    }

    /// Forget the current session. Local sign-ups are kept.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.remove_item(DEMO_USER_KEY).await?;
        if let Some(profile) = self.current.write().take() {
            info!(email = %profile.email, role = %profile.role, "Signed out");
        }
        Ok(())
    }

    fn find_demo_account(&self, email: &str, password: &str) -> Option<&'static DemoAccountInfo> {
        self.demo_accounts().iter().find(|account| {
            let expected = account.password.as_bytes();
            let provided = password.as_bytes();
            account.email == email && expected.len() == provided.len() && bool::from(expected.ct_eq(provided))
        })
    }

    async fn local_accounts(&self) -> Result<Vec<LocalAccount>, AuthError> {
        Ok(self
            .store
            .read_json::<Vec<LocalAccount>>(DEMO_USERS_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn start_session(&self, session: &StoredSession) -> Result<Profile, AuthError> {
        self.store.write_json(DEMO_USER_KEY, session).await?;
        let profile = Profile::fabricate(&session.email, session.role, session.full_name.as_deref(), now_millis());
        *self.current.write() = Some(profile.clone());
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn context() -> AuthContext {
        let store = LocalStore::in_memory().await.unwrap();
        AuthContext::new(store, AuthConfig::default())
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-pass", "not-a-hash"));
    }

    #[tokio::test]
    async fn test_demo_accounts_sign_in_with_their_role() {
        let auth = context().await;
        for account in DEMO_ACCOUNTS.iter() {
            let profile = auth.sign_in(account.email, account.password).await.unwrap();
            assert_eq!(profile.role, account.role);
            assert_eq!(profile.email, account.email);
            assert_eq!(profile.full_name, account.full_name);
            assert!(profile.id.starts_with(&format!("demo-{}-{}-", account.role, account.email)));
            assert_eq!(auth.current(), Some(profile));
        }
    }

    #[tokio::test]
    async fn test_sign_in_normalizes_email() {
        let auth = context().await;
        let profile = auth.sign_in("  Doctor@Demo.Test ", "doctor123").await.unwrap();
        assert_eq!(profile.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let auth = context().await;
        let err = auth.sign_in("admin@demo.test", "admin124").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(auth.current().is_none());

        // another account's password
        assert!(auth.sign_in("admin@demo.test", "doctor123").await.is_err());
        assert!(auth.sign_in("nobody@demo.test", "admin123").await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_demo_accounts() {
        let store = LocalStore::in_memory().await.unwrap();
        let auth = AuthContext::new(
            store,
            AuthConfig {
                demo_accounts_enabled: false,
                ..AuthConfig::default()
            },
        );
        assert!(auth.demo_accounts().is_empty());
        assert!(auth.sign_in("admin@demo.test", "admin123").await.is_err());
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = context().await;
        let profile = auth
            .sign_up("New.Patient@Example.com", "hunter22", "New Patient", Role::Patient)
            .await
            .unwrap();
        assert_eq!(profile.email, "new.patient@example.com");
        assert_eq!(profile.role, Role::Patient);
        assert_eq!(auth.current().map(|p| p.email), Some(profile.email.clone()));

        auth.sign_out().await.unwrap();
        assert!(auth.current().is_none());

        let again = auth.sign_in("new.patient@example.com", "hunter22").await.unwrap();
        assert_eq!(again.role, Role::Patient);
        assert_eq!(again.full_name, "New Patient");
    }

    #[tokio::test]
    async fn test_passwords_are_not_stored_in_plaintext() {
        let auth = context().await;
        auth.sign_up("a@example.com", "plain-text-pw", "A", Role::Doctor)
            .await
            .unwrap();

        let raw = auth.store.get_item(DEMO_USERS_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("plain-text-pw"));
        assert!(raw.contains("passwordHash"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = context().await;
        auth.sign_up("dup@example.com", "password", "Dup", Role::Patient)
            .await
            .unwrap();

        let err = auth
            .sign_up("DUP@example.com", "password", "Dup Again", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let err = auth
            .sign_up("admin@demo.test", "password", "Admin", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let accounts: Vec<LocalAccount> = auth.store.read_json(DEMO_USERS_KEY).await.unwrap().unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let auth = context().await;

        let err = auth.sign_up("x@example.com", "password", "  ", Role::Patient).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "full_name", .. }));

        let err = auth.sign_up("not-an-email", "password", "X", Role::Patient).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "email", .. }));

        let err = auth.sign_up("x@example.com", "12345", "X", Role::Patient).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { field: "password", .. }));

        assert!(auth.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_keeps_sign_ups() {
        let auth = context().await;
        auth.sign_up("keep@example.com", "password", "Keep", Role::Patient)
            .await
            .unwrap();
        auth.sign_out().await.unwrap();

        assert!(auth.store.get_item(DEMO_USER_KEY).await.unwrap().is_none());
        assert!(auth.store.get_item(DEMO_USERS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_restore_session() {
        let store = LocalStore::in_memory().await.unwrap();
        let auth = AuthContext::new(store.clone(), AuthConfig::default());
        auth.sign_in("doctor@demo.test", "doctor123").await.unwrap();

        let restored = AuthContext::restored(store, AuthConfig::default()).await.unwrap();
        let profile = restored.current().unwrap();
        assert_eq!(profile.email, "doctor@demo.test");
        assert_eq!(profile.role, Role::Doctor);
        assert_eq!(profile.full_name, "Dr. Demo");
    }

    #[tokio::test]
    async fn test_restore_falls_back_to_email_local_part() {
        let store = LocalStore::in_memory().await.unwrap();
        store
            .set_item(DEMO_USER_KEY, r#"{"email":"jane@example.com","role":"patient"}"#)
            .await
            .unwrap();

        let auth = AuthContext::restored(store, AuthConfig::default()).await.unwrap();
        assert_eq!(auth.current().unwrap().full_name, "jane");
    }

    #[tokio::test]
    async fn test_malformed_session_restores_as_signed_out() {
        for raw in [
            "not json",
            "[]",
            r#"{"email":"x@example.com"}"#,
            r#"{"email":"x@example.com","role":"superuser"}"#,
            r#"{"email":"  ","role":"admin"}"#,
        ] {
            let store = LocalStore::in_memory().await.unwrap();
            store.set_item(DEMO_USER_KEY, raw).await.unwrap();

            let auth = AuthContext::restored(store, AuthConfig::default()).await.unwrap();
            assert!(auth.current().is_none(), "{raw}");
        }
    }
}
