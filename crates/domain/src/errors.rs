//! Error types used throughout the integration core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Login-chain stage at which an authentication failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStage {
    /// Credential login against the service endpoint.
    Primary,
    /// App-session exchange through the redirect chain.
    Exchange,
}

impl std::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Exchange => write!(f, "exchange"),
        }
    }
}

/// Main error type for Frostlink
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrostlinkError {
    #[error("Authentication error ({stage} stage): {message}")]
    Auth { stage: AuthStage, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Remote error: {message}")]
    Remote { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FrostlinkError {
    pub fn auth(stage: AuthStage, message: impl Into<String>) -> Self {
        Self::Auth { stage, message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// Result type alias for Frostlink operations
pub type Result<T> = std::result::Result<T, FrostlinkError>;
