//! Credentials presented to the lists backend.
//!
//! Signing in happens outside this crate; what reaches the backend is an access
//! token obtained from the identity provider, sent as a `Bearer` header.

use anyhow::Result;

/// # User Credential
///
/// Carries the access token for the signed-in user. Every backend call takes one,
/// even when the backend (such as the in-memory one) ignores it.
///
/// The token is never logged in full; use [`Credential::token_preview`].
#[derive(Debug, Clone, Default)]
pub struct Credential {
    /// Display name of the signed-in user
    username: String,
    /// Access token, empty when signed out
    token: Option<String>,
}

impl Credential {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            username: username.into(),
            token: (!token.is_empty()).then_some(token),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token_preview(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(|t| format!("{}...", t.chars().take(10).collect::<String>()))
    }

    pub fn auth_header(&self) -> Result<String> {
        match (self.token.as_deref(), self.token_preview()) {
            (Some(token), Some(preview)) => {
                tracing::debug!("Using authentication token: {}", preview);
                Ok(format!("Bearer {}", token))
            }
            _ => {
                tracing::error!("Attempted to make authenticated request without valid token");
                anyhow::bail!("Not authenticated - please sign in and provide an access token")
            }
        }
    }
}
