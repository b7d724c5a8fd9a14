use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{
    DonationCategory, Donor, DonorContact, DonorId, DonorResponse, DonorStatusUpdate, NewDonor,
    NewRequest, NewRequester, Request, RequestId, RequestStatus, Requester, RequesterId,
    ResponseRecord, TransitionOutcome,
};
use crate::services::store::{DonorStore, StoreError};

#[derive(Default)]
struct Tables {
    donors: BTreeMap<DonorId, Donor>,
    requesters: BTreeMap<RequesterId, Requester>,
    requests: BTreeMap<RequestId, Request>,
    responses: Vec<ResponseRecord>,
    sequence: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn has_acceptance(&self, request_id: RequestId) -> bool {
        self.responses
            .iter()
            .any(|r| r.request_id == request_id && r.response == DonorResponse::Accepted)
    }
}

/// Process-local donor store
///
/// Every mutation runs under one write lock, so the conditional acceptance
/// is atomic with respect to all other store operations. Used for local
/// runs without a database and throughout the test suite.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DonorStore for InMemoryStore {
    async fn insert_donor(&self, donor: NewDonor) -> Result<Donor, StoreError> {
        let mut tables = self.tables.write().await;
        let id = DonorId(tables.next_id());

        let donor = Donor {
            id,
            name: donor.name,
            email: donor.email,
            phone: donor.phone,
            profile: donor.profile,
            hemoglobin_level: donor.hemoglobin_level,
            available: donor.available,
            created_at: Utc::now(),
        };
        tables.donors.insert(id, donor.clone());

        Ok(donor)
    }

    async fn get_donor(&self, id: DonorId) -> Result<Option<Donor>, StoreError> {
        Ok(self.tables.read().await.donors.get(&id).cloned())
    }

    async fn update_donor_status(
        &self,
        id: DonorId,
        update: DonorStatusUpdate,
    ) -> Result<Option<Donor>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables.donors.get_mut(&id).map(|donor| {
            donor.available = update.available;
            donor.hemoglobin_level = update.hemoglobin_level;
            if let Some(phone) = update.phone {
                donor.phone = phone;
            }
            donor.clone()
        }))
    }

    async fn insert_requester(&self, requester: NewRequester) -> Result<Requester, StoreError> {
        let mut tables = self.tables.write().await;
        let id = RequesterId(tables.next_id());

        let requester = Requester {
            id,
            name: requester.name,
            email: requester.email,
            phone: requester.phone,
            category: requester.category,
        };
        tables.requesters.insert(id, requester.clone());

        Ok(requester)
    }

    async fn get_requester(&self, id: RequesterId) -> Result<Option<Requester>, StoreError> {
        Ok(self.tables.read().await.requesters.get(&id).cloned())
    }

    async fn insert_request(&self, request: NewRequest) -> Result<Request, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.requesters.contains_key(&request.requester_id) {
            return Err(StoreError::NotFound(format!(
                "requester {}",
                request.requester_id
            )));
        }

        let id = RequestId(tables.next_id());
        let request = Request {
            id,
            requester_id: request.requester_id,
            criteria: request.criteria,
            urgency: request.urgency,
            hospital: request.hospital,
            amount: request.amount,
            requested_date: request.requested_date,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        tables.requests.insert(id, request.clone());

        Ok(request)
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<Request>, StoreError> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn pending_requests(
        &self,
        category: DonationCategory,
    ) -> Result<Vec<Request>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .requests
            .values()
            .filter(|r| r.status.is_pending() && r.request_type() == category)
            .cloned()
            .collect())
    }

    async fn accept_request(
        &self,
        request_id: RequestId,
        donor_id: DonorId,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.has_acceptance(request_id) {
            return Ok(TransitionOutcome::AlreadyAccepted);
        }

        let request = match tables.requests.get_mut(&request_id) {
            Some(request) if request.status.is_pending() => {
                request.status = RequestStatus::Accepted;
                request.clone()
            }
            Some(_) => return Ok(TransitionOutcome::AlreadyAccepted),
            None => return Err(StoreError::NotFound(format!("request {}", request_id))),
        };

        let response = ResponseRecord::accepted(request_id, donor_id);
        tables.responses.push(response.clone());

        Ok(TransitionOutcome::Committed { request, response })
    }

    async fn responses_for_request(
        &self,
        request_id: RequestId,
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .responses
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn accepted_donors(
        &self,
        requester_id: RequesterId,
    ) -> Result<Vec<DonorContact>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .responses
            .iter()
            .filter(|r| r.response == DonorResponse::Accepted)
            .filter(|r| {
                tables
                    .requests
                    .get(&r.request_id)
                    .is_some_and(|req| req.requester_id == requester_id)
            })
            .filter_map(|r| tables.donors.get(&r.donor_id).map(Donor::contact))
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
