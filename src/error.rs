//! Error types and handling for the City Explorer gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Bad or missing input from the caller
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Upstream provider failed (transport, non-2xx status or undecodable payload)
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Provider answered but had nothing usable
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Persistent store I/O failure
    #[error("Store error: {message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GatewayError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new provider error tagged with the provider's display name
    pub fn provider<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status the gateway answers with for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Provider { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Store { .. } | GatewayError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Upstream and store details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Validation { message } => message.clone(),
            GatewayError::Provider { provider, .. } => format!("{provider} failed"),
            GatewayError::NotFound { message } => message.clone(),
            GatewayError::Store { .. } => "Internal server error".to_string(),
            GatewayError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, self.user_message()).into_response()
    }
}

impl From<postcard::Error> for GatewayError {
    fn from(err: postcard::Error) -> Self {
        GatewayError::store(format!("encoding failed: {err}"))
    }
}

impl From<fjall::Error> for GatewayError {
    fn from(err: fjall::Error) -> Self {
        GatewayError::store(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GatewayError {
    fn from(err: tokio::task::JoinError) -> Self {
        GatewayError::store(format!("store task failed: {err}"))
    }
}
