//! Profile, role and session models.

use serde::{Deserialize, Serialize};

/// Clinic roles. A profile's role is fixed when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The signed-in user as seen by every dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub full_name: String,
}

impl Profile {
    /// Build the locally fabricated profile for a demo session.
    pub fn fabricate(email: &str, role: Role, full_name: Option<&str>, now_millis: i64) -> Self {
        Self {
            id: format!("demo-{}-{}-{}", role, email, now_millis),
            email: email.to_string(),
            role,
            full_name: full_name
                .map(str::to_string)
                .unwrap_or_else(|| email_local_part(email).to_string()),
        }
    }
}

/// Part of an email address before the `@`.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Session record persisted under `demo_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Account created through sign-up, persisted under `demo_users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
}

/// Built-in demo account as listed on the sign-in surface.
#[derive(Debug, Clone, Serialize)]
pub struct DemoAccountInfo {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub full_name: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Doctor".parse::<Role>(), Ok(Role::Doctor));
        assert_eq!(" PATIENT ".parse::<Role>(), Ok(Role::Patient));
        assert!("nurse".parse::<Role>().is_err());

        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_fabricated_profile() {
        let profile = Profile::fabricate("doctor@demo.test", Role::Doctor, Some("Dr. Demo"), 42);
        assert_eq!(profile.id, "demo-doctor-doctor@demo.test-42");
        assert_eq!(profile.full_name, "Dr. Demo");

        let profile = Profile::fabricate("jane@clinic.test", Role::Patient, None, 1);
        assert_eq!(profile.full_name, "jane");
    }

    #[test]
    fn test_stored_session_wire_format() {
        let session: StoredSession =
            serde_json::from_str(r#"{"email":"a@b.c","role":"admin","fullName":"A"}"#).unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.full_name.as_deref(), Some("A"));

        let session: StoredSession = serde_json::from_str(r#"{"email":"a@b.c","role":"patient"}"#).unwrap();
        assert_eq!(session.full_name, None);

        assert!(serde_json::from_str::<StoredSession>(r#"{"email":"a@b.c","role":"root"}"#).is_err());
        assert!(serde_json::from_str::<StoredSession>(r#"{"role":"admin"}"#).is_err());
    }
}
