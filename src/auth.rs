//! HTTP login against the authentication service.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Opaque identifier proving who the local player is.
///
/// Issued by the login endpoint and attached to every protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct PlayerCredential(String);

impl PlayerCredential {
    /// Wraps a raw player identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    privy_jwt_token: &'a str,
}

/// Client for the login endpoint.
#[derive(Debug, Clone)]
pub struct Authenticator {
    /// Full URL of the login endpoint.
    login_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl Authenticator {
    /// Creates an authenticator for the given login URL.
    #[instrument(skip_all, fields(login_url = %login_url.as_ref()))]
    pub fn new(login_url: impl AsRef<str>) -> Self {
        debug!("Creating authenticator");
        Self {
            login_url: login_url.as_ref().to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Exchanges a JWT for the player's credential.
    #[instrument(skip(self, token), fields(login_url = %self.login_url))]
    pub async fn login(&self, token: &str) -> Result<PlayerCredential, AuthError> {
        info!("Sending login request");

        let response = self
            .client
            .post(&self.login_url)
            .json(&LoginRequest {
                privy_jwt_token: token,
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Login request failed");
                AuthError::new(format!("Error making POST request: {}", e))
            })?;

        let status = response.status();
        debug!(status = %status, "Received login response");

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::new(format!("Login failed: {}", body)));
        }

        let body: serde_json::Map<String, serde_json::Value> =
            response.json().await.map_err(|e| {
                AuthError::new(format!("Error decoding response: {}", e))
            })?;

        let player_id = body
            .get("player_privy_did")
            .and_then(|value| value.as_str())
            .ok_or_else(|| AuthError::new("Player ID not found in response"))?;

        info!(player_id = %player_id, "Login successful");
        Ok(PlayerCredential::new(player_id))
    }
}

/// Authentication error.
#[derive(Debug, Clone, Display, Error)]
#[display("Auth error: {} at {}:{}", message, file, line)]
pub struct AuthError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AuthError {
    /// Creates a new authentication error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Auth error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
