use serde::{Deserialize, Serialize};
use crate::models::domain::{DonorContact, DonorId, RequesterId, ScoredCandidate};

/// Response for the candidate list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesResponse {
    #[serde(rename = "donorId")]
    pub donor_id: DonorId,
    pub eligible: bool,
    pub candidates: Vec<ScoredCandidate>,
    pub total_results: usize,
}

/// Donors who accepted any of a requester's requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedDonorsResponse {
    #[serde(rename = "requesterId")]
    pub requester_id: RequesterId,
    pub donors: Vec<DonorContact>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
