use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as returned by the session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name to show in the UI: the username when one is set, otherwise the
    /// part of the email before the `@`.
    pub fn display_name(&self) -> &str {
        if let Some(username) = self.username.as_deref() {
            if !username.is_empty() {
                return username;
            }
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Response to signup and signin.
///
/// The token also arrives in an HTTP-only cookie, which is what the session
/// endpoints authenticate with; the copy here is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AuthResponse {
    pub token: String,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}
