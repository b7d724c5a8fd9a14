use thiserror::Error;

use crate::models::{DonorId, RequestId};
use crate::services::StoreError;

/// Errors surfaced by the matching engine's operations
///
/// Every variant is scoped to the failing operation and returned to the
/// caller for presentation.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request {0} has already been accepted")]
    Conflict(RequestId),

    #[error("Donor {donor_id} is not eligible for request {request_id}: {reason}")]
    IneligibleDonor {
        donor_id: DonorId,
        request_id: RequestId,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl MatchError {
    /// Short machine-readable kind, used as the `error` field of HTTP bodies
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::Validation(_) => "validation_error",
            MatchError::NotFound(_) => "not_found",
            MatchError::Conflict(_) => "conflict",
            MatchError::IneligibleDonor { .. } => "ineligible_donor",
            MatchError::Store(_) => "store_error",
        }
    }
}

impl From<validator::ValidationErrors> for MatchError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MatchError::Validation(errors.to_string())
    }
}
