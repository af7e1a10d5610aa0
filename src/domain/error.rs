//! Error types shared across the registry.

use thiserror::Error;

/// Errors reported by registry operations.
///
/// The first three variants are recoverable outcomes the caller is expected
/// to display. `Storage` is kept distinct so retry and messaging policy
/// stays with the caller; the public verification surface must generalize
/// it rather than leak detail.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A field failed normalization.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The certificate number already belongs to another record.
    #[error("certificate number '{certificate_number}' is already registered")]
    Duplicate { certificate_number: String },

    /// No record with the requested id or certificate number.
    #[error("certificate not found")]
    NotFound,

    /// The backing store failed or is unreachable. Never retried here.
    #[error("storage unavailable")]
    Storage(#[from] sqlx::Error),

    /// CSV serialization failed.
    #[error("CSV encoding failed")]
    Csv(#[from] csv::Error),
}

impl RegistryError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
