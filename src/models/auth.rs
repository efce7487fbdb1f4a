use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Viewer,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Viewer => "Viewer",
        }
    }

    pub const fn all() -> [Self; 2] {
        [Self::Viewer, Self::Admin]
    }
}

impl std::str::FromStr for Role {
    type Err = crate::models::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(crate::models::error::AppError::Validation(format!(
                "Unknown role: {s}"
            ))),
        }
    }
}

/// Denormalized profile kept next to the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

/// A logged-in session: opaque bearer token plus the profile it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub client_tz: Option<String>,
}

impl From<LoginResponse> for Session {
    fn from(r: LoginResponse) -> Self {
        Self {
            token: r.token,
            user: r.user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForgotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response to a forgot-password request. The backend only returns the
/// token itself when running in development mode.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ForgotResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reset_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentUser {
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_backend_payload() {
        let json = r#"{
            "token": "eyJhbGciOi.abc.def",
            "user": {"username": "alice", "role": "admin"},
            "expires_at": "2025-10-04T08:00:00.123456+00:00",
            "expires_at_local": "2025-10-04T09:00:00.123456+01:00",
            "client_tz": "Europe/London"
        }"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.role, Role::Admin);
        assert!(response.expires_at.is_some());

        let session = Session::from(response);
        assert_eq!(session.token, "eyJhbGciOi.abc.def");
        assert_eq!(session.user.username, "alice");
    }

    #[test]
    fn register_request_omits_missing_email() {
        let body = serde_json::to_value(RegisterRequest {
            username: "bob".to_string(),
            password: "secret1".to_string(),
            email: None,
            role: Role::Viewer,
        })
        .unwrap();

        assert!(body.get("email").is_none());
        assert_eq!(body["role"], "viewer");
    }

    #[test]
    fn role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }
}
