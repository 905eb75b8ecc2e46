//! Unified error type for QuickPact.
//!
//! Every failure a tool call can produce maps to one variant here. Each
//! variant has a stable [`QuickPactError::kind`] string so transports can
//! report a structured `{ kind, message }` pair to the caller.
//!
//! # Example
//!
//! ```rust
//! use quickpact::error::QuickPactError;
//!
//! let err = QuickPactError::NotFound { agreement_id: "qp_deadbeef".to_string() };
//! assert_eq!(err.kind(), "not_found");
//! assert!(err.to_string().contains("qp_deadbeef"));
//! ```

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum QuickPactError {
    // ==========================================================================
    // CALLER ERRORS
    // Malformed input or references the caller can correct.
    // ==========================================================================
    /// Missing or malformed input.
    ValidationError(String),

    /// The referenced agreement id does not exist in the store.
    NotFound { agreement_id: String },

    /// The signer role is not one of `party1`, `party2`, `witness`.
    InvalidRole { role: String },

    /// The role already carries a signature. Signatures are never overwritten.
    AlreadySigned { role: String, signer_name: String },

    // ==========================================================================
    // INTERNAL ERRORS
    // ==========================================================================
    /// An identifier was inserted twice. Generated ids are expected to be
    /// collision free, so this signals a broken invariant.
    DuplicateId { agreement_id: String },

    // === Configuration ===
    /// A required configuration value is not set.
    ConfigMissing { key: String },

    /// A configuration value is present but unusable.
    ConfigInvalid { field: String, reason: String },

    /// Wraps `std::io::Error` for config file and log directory access.
    IoError(std::io::Error),
}

impl QuickPactError {
    /// Stable machine-readable kind, used in tool responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            QuickPactError::ValidationError(_) => "validation_error",
            QuickPactError::NotFound { .. } => "not_found",
            QuickPactError::InvalidRole { .. } => "invalid_role",
            QuickPactError::AlreadySigned { .. } => "already_signed",
            QuickPactError::DuplicateId { .. } => "duplicate_id",
            QuickPactError::ConfigMissing { .. } => "config_missing",
            QuickPactError::ConfigInvalid { .. } => "config_invalid",
            QuickPactError::IoError(_) => "io_error",
        }
    }

    /// True for errors the caller can fix by changing the request.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            QuickPactError::ValidationError(_)
                | QuickPactError::NotFound { .. }
                | QuickPactError::InvalidRole { .. }
                | QuickPactError::AlreadySigned { .. }
        )
    }
}

impl fmt::Display for QuickPactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickPactError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            QuickPactError::NotFound { agreement_id } => {
                write!(
                    f,
                    "Agreement '{}' not found. Use list_agreements to see known agreement ids.",
                    agreement_id
                )
            }
            QuickPactError::InvalidRole { role } => {
                write!(
                    f,
                    "Invalid signer role '{}'. Signer role must be 'party1', 'party2', or 'witness'.",
                    role
                )
            }
            QuickPactError::AlreadySigned { role, signer_name } => {
                write!(
                    f,
                    "Agreement already signed as {} by '{}'. Signatures cannot be replaced.",
                    role, signer_name
                )
            }
            QuickPactError::DuplicateId { agreement_id } => {
                write!(f, "Duplicate agreement id '{}'", agreement_id)
            }
            QuickPactError::ConfigMissing { key } => {
                write!(
                    f,
                    "Configuration value '{}' is not set. Set it in the config file or environment.",
                    key
                )
            }
            QuickPactError::ConfigInvalid { field, reason } => {
                write!(f, "Invalid configuration field '{}': {}", field, reason)
            }
            QuickPactError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl Error for QuickPactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            QuickPactError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QuickPactError {
    fn from(err: std::io::Error) -> Self {
        QuickPactError::IoError(err)
    }
}

impl From<serde_json::Error> for QuickPactError {
    fn from(err: serde_json::Error) -> Self {
        QuickPactError::ConfigInvalid {
            field: "json".to_string(),
            reason: err.to_string(),
        }
    }
}
