//! Core error types for inboxpilot-core.
//!
//! Three failure families with deliberately different policies:
//! - parse failures (malformed dates, times, oracle JSON) never become
//!   errors at all -- the extractor degrades them to record rejection
//!   or a safe default, so no variant exists for them here;
//! - external service failures ([`CoreError::Service`]) propagate to
//!   the automation loop, which logs and backs off;
//! - mirror/notification failures are caught at the call site and
//!   logged, never returned.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for inboxpilot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Event/streak store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External service call failed (calendar, inbox, credential refresh)
    #[error("Service error for '{service}': {message}")]
    Service {
        service: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OAuth errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    /// Wrap a boxed integration error as a service failure.
    pub fn service(service: &str, err: Box<dyn std::error::Error>) -> Self {
        CoreError::Service {
            service: service.to_string(),
            message: err.to_string(),
            source: None,
        }
    }
}

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the store file
    #[error("Failed to read store at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the store file
    #[error("Failed to write store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file holds something other than the expected JSON shape
    #[error("Malformed store file at {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// OAuth errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Not authenticated
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// Credentials not configured
    #[error("OAuth credentials not configured for {service}")]
    CredentialsNotConfigured { service: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
