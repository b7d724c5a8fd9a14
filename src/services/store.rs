use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    DonationCategory, Donor, DonorContact, DonorId, DonorStatusUpdate, NewDonor, NewRequest,
    NewRequester, Request, RequestId, Requester, RequesterId, ResponseRecord, TransitionOutcome,
};

/// Errors that can occur when interacting with the donor store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Persistence boundary for donors, requesters, requests and responses.
///
/// `accept_request` is the only operation that mutates a request. It must
/// flip `Pending -> Accepted` and insert the accepted response as one atomic
/// unit, reporting `AlreadyAccepted` when the request was no longer pending.
#[async_trait]
pub trait DonorStore: Send + Sync {
    async fn insert_donor(&self, donor: NewDonor) -> Result<Donor, StoreError>;

    async fn get_donor(&self, id: DonorId) -> Result<Option<Donor>, StoreError>;

    /// Apply a donor's own status edit. `None` when the donor is unknown.
    async fn update_donor_status(
        &self,
        id: DonorId,
        update: DonorStatusUpdate,
    ) -> Result<Option<Donor>, StoreError>;

    async fn insert_requester(&self, requester: NewRequester) -> Result<Requester, StoreError>;

    async fn get_requester(&self, id: RequesterId) -> Result<Option<Requester>, StoreError>;

    async fn insert_request(&self, request: NewRequest) -> Result<Request, StoreError>;

    async fn get_request(&self, id: RequestId) -> Result<Option<Request>, StoreError>;

    /// Pending requests of one category, ascending by id
    async fn pending_requests(
        &self,
        category: DonationCategory,
    ) -> Result<Vec<Request>, StoreError>;

    /// Conditionally transition a request to `Accepted` and record the response
    async fn accept_request(
        &self,
        request_id: RequestId,
        donor_id: DonorId,
    ) -> Result<TransitionOutcome, StoreError>;

    async fn responses_for_request(
        &self,
        request_id: RequestId,
    ) -> Result<Vec<ResponseRecord>, StoreError>;

    /// Contacts of donors who accepted any request raised by the requester
    async fn accepted_donors(
        &self,
        requester_id: RequesterId,
    ) -> Result<Vec<DonorContact>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
