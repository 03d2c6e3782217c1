//! Shared Google credential handling for the Gmail and Calendar clients.
//!
//! One OAuth grant covers both scopes (modify inbox, read/write
//! calendar), so the two clients share a [`GoogleAuth`] and a single
//! keyring token entry.

use super::keyring_store;
use super::oauth::{self, OAuthConfig, OAuthTokens};
use crate::integrations::block_on;

pub const SERVICE_NAME: &str = "google";

/// Google OAuth client credentials + token access.
#[derive(Clone)]
pub struct GoogleAuth {
    client_id: String,
    client_secret: String,
}

impl Default for GoogleAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleAuth {
    /// Load credentials from keyring. Returns empty strings if not stored yet.
    pub fn new() -> Self {
        let client_id = keyring_store::get("google_client_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            client_id,
            client_secret,
        }
    }

    /// Persist Google OAuth client credentials to the OS keyring.
    pub fn set_credentials(
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("google_client_id", client_id)?;
        keyring_store::set("google_client_secret", client_secret)?;
        Ok(())
    }

    fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig {
            service_name: SERVICE_NAME.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/gmail.modify".to_string(),
                "https://www.googleapis.com/auth/calendar".to_string(),
            ],
            redirect_port: 17815,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        oauth::load_tokens(SERVICE_NAME).is_some()
    }

    /// Run the interactive browser flow and store tokens.
    pub fn authenticate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(
                "Google client_id / client_secret not configured. Call set_credentials first."
                    .into(),
            );
        }
        let config = self.oauth_config();
        block_on(oauth::authorize(&config))??;
        Ok(())
    }

    pub fn disconnect(&self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete(SERVICE_NAME)?;
        Ok(())
    }

    /// Return a valid access token, refreshing if expired.
    pub fn access_token(&self) -> Result<String, Box<dyn std::error::Error>> {
        let tokens = oauth::load_tokens(SERVICE_NAME).ok_or("not authenticated with Google")?;

        if !oauth::is_expired(&tokens) {
            return Ok(tokens.access_token);
        }

        let refresh = tokens
            .refresh_token
            .as_deref()
            .ok_or("no refresh token available")?;

        let config = self.oauth_config();
        let refreshed: OAuthTokens = block_on(oauth::refresh_token(&config, refresh))??;
        Ok(refreshed.access_token)
    }
}
