//! Error types for Fuel My Dream.
//!
//! Validation failures are not errors in this sense: they travel as
//! [`crate::onboarding::schema::FieldErrors`] values and never leave the
//! wizard or donate flow.

use std::time::Duration;

/// Startup and serving errors.
///
/// Wallet and storage failures never surface here; the wallet context
/// turns them into notifications.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and wiring errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures reported by a [`crate::wallet::WalletGateway`].
///
/// The wallet context collapses all of these into one notification per
/// operation; the variant only shows up in logs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("Request rejected by the wallet: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Wallet operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Wallet capability unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Invalid donation amount: {0}")]
    InvalidAmount(String),
}

impl WalletError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Unavailable(_) => "unavailable",
            Self::InvalidRecipient(_) => "invalid_recipient",
            Self::InvalidAmount(_) => "invalid_amount",
        }
    }
}

/// Failures reported by a [`crate::wallet::StorageGateway`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Verification failed for {cid}: {reason}")]
    VerificationFailed { cid: String, reason: String },

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StorageError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UploadFailed(_) => "upload_failed",
            Self::VerificationFailed { .. } => "verification_failed",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
