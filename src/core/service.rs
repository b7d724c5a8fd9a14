use std::sync::Arc;
use validator::Validate;

use crate::core::{
    acceptance::AcceptanceCoordinator,
    filters::is_eligible,
    matcher::{MatchResult, Matcher},
};
use crate::error::MatchError;
use crate::models::{
    AcceptanceReceipt, Donor, DonorContact, DonorId, DonorStatusUpdate, MatchingRules, NewDonor,
    NewRequest, NewRequester, Request, RequestId, Requester, RequesterId,
};
use crate::services::{DonorStore, NotificationDispatcher};

/// Entry points used by the presentation layer
///
/// Identifiers are trusted as given; authentication happens upstream.
pub struct MatchingService {
    store: Arc<dyn DonorStore>,
    matcher: Matcher,
    coordinator: AcceptanceCoordinator,
}

impl MatchingService {
    pub fn new(
        store: Arc<dyn DonorStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        rules: MatchingRules,
    ) -> Self {
        Self {
            coordinator: AcceptanceCoordinator::new(store.clone(), notifier, rules),
            matcher: Matcher::new(rules),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn DonorStore> {
        &self.store
    }

    /// Requests the donor may currently be offered
    pub async fn list_candidates(&self, donor_id: DonorId) -> Result<MatchResult, MatchError> {
        let donor = self.require_donor(donor_id).await?;

        // Skip the query entirely for donors who cannot see anything
        if !is_eligible(&donor, self.matcher.rules()) {
            tracing::debug!("Donor {} is not eligible, returning no candidates", donor_id);
            return Ok(self.matcher.find_candidates(&donor, Vec::new()));
        }

        let pending = self.store.pending_requests(donor.donor_type()).await?;
        tracing::debug!(
            "Scoring {} pending {} requests for donor {}",
            pending.len(),
            donor.donor_type(),
            donor_id
        );

        let result = self.matcher.find_candidates(&donor, pending);

        tracing::info!(
            "Returning {} candidates for donor {} (from {} pending requests)",
            result.candidates.len(),
            donor_id,
            result.total_requests
        );

        Ok(result)
    }

    pub async fn accept_request(
        &self,
        request_id: RequestId,
        donor_id: DonorId,
    ) -> Result<AcceptanceReceipt, MatchError> {
        self.coordinator.accept_request(request_id, donor_id).await
    }

    /// Create a pending request for a known requester
    pub async fn submit_request(&self, request: NewRequest) -> Result<Request, MatchError> {
        request.validate()?;

        let requester = self
            .store
            .get_requester(request.requester_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("requester {}", request.requester_id)))?;

        let request = self.store.insert_request(request).await?;

        tracing::info!(
            "Requester {} submitted {} request {} for {}",
            requester.id,
            request.request_type(),
            request.id,
            request.hospital
        );

        Ok(request)
    }

    pub async fn update_donor_status(
        &self,
        donor_id: DonorId,
        update: DonorStatusUpdate,
    ) -> Result<Donor, MatchError> {
        update.validate()?;

        let donor = self
            .store
            .update_donor_status(donor_id, update)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("donor {}", donor_id)))?;

        tracing::info!(
            "Donor {} updated status: available={}, hemoglobin={:?}",
            donor_id,
            donor.available,
            donor.hemoglobin_level
        );

        Ok(donor)
    }

    /// Donors who accepted any of the requester's requests
    pub async fn accepted_donors(
        &self,
        requester_id: RequesterId,
    ) -> Result<Vec<DonorContact>, MatchError> {
        if self.store.get_requester(requester_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("requester {}", requester_id)));
        }

        Ok(self.store.accepted_donors(requester_id).await?)
    }

    pub async fn register_donor(&self, donor: NewDonor) -> Result<Donor, MatchError> {
        donor.validate()?;
        Ok(self.store.insert_donor(donor).await?)
    }

    pub async fn register_requester(&self, requester: NewRequester) -> Result<Requester, MatchError> {
        requester.validate()?;
        Ok(self.store.insert_requester(requester).await?)
    }

    async fn require_donor(&self, donor_id: DonorId) -> Result<Donor, MatchError> {
        self.store
            .get_donor(donor_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("donor {}", donor_id)))
    }
}
