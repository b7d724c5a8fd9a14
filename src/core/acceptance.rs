use std::sync::Arc;

use crate::core::{filters::check_eligibility, scoring::score_compatibility};
use crate::error::MatchError;
use crate::models::{
    AcceptanceReceipt, DonorId, MatchingRules, RequestId, TransitionOutcome,
};
use crate::services::{DonorStore, NotificationDispatcher};

/// Message addressed to one participant of an acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Message telling the requester who accepted and how to reach them
pub fn requester_notification(receipt: &AcceptanceReceipt) -> Notification {
    let donor = &receipt.donor;
    Notification {
        recipient: receipt.requester.email.clone(),
        subject: "URGENT: Donor Match Found!".to_string(),
        body: format!(
            "Hello {},\n\nGood news! A donor ({}) has accepted your {} request for {}.\n\n\
             Donor Contact Details:\nPhone: {}\nEmail: {}\n\nPlease contact them immediately.",
            receipt.requester.name,
            donor.name,
            receipt.request.request_type(),
            receipt.request.hospital,
            donor.phone,
            donor.email,
        ),
    }
}

/// Confirmation sent back to the accepting donor
pub fn donor_notification(receipt: &AcceptanceReceipt) -> Notification {
    Notification {
        recipient: receipt.donor.email.clone(),
        subject: "Acceptance Confirmed".to_string(),
        body: format!(
            "Hello {},\n\nYou have accepted the request for {}. \
             The patient has been notified with your contact details.",
            receipt.donor.name, receipt.request.hospital,
        ),
    }
}

/// Commits a donor's acceptance of a request
///
/// # Steps
/// 1. Load the request (`NotFound`)
/// 2. Reject anything not pending (`Conflict`)
/// 3. Load the donor and re-check eligibility and compatibility (`IneligibleDonor`)
/// 4. Conditional `Pending -> Accepted` transition plus response insert in the store
/// 5. Best-effort notifications to requester and donor
pub struct AcceptanceCoordinator {
    store: Arc<dyn DonorStore>,
    notifier: Arc<dyn NotificationDispatcher>,
    rules: MatchingRules,
}

impl AcceptanceCoordinator {
    pub fn new(
        store: Arc<dyn DonorStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        rules: MatchingRules,
    ) -> Self {
        Self {
            store,
            notifier,
            rules,
        }
    }

    pub async fn accept_request(
        &self,
        request_id: RequestId,
        donor_id: DonorId,
    ) -> Result<AcceptanceReceipt, MatchError> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("request {}", request_id)))?;

        if !request.status.is_pending() {
            tracing::info!(
                "Donor {} tried to accept request {} which is already accepted",
                donor_id,
                request_id
            );
            return Err(MatchError::Conflict(request_id));
        }

        let donor = self
            .store
            .get_donor(donor_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("donor {}", donor_id)))?;

        if let Err(reason) = check_eligibility(&donor, &self.rules) {
            return Err(MatchError::IneligibleDonor {
                donor_id,
                request_id,
                reason: reason.to_string(),
            });
        }

        if !score_compatibility(&donor, &request, &self.rules).eligible {
            return Err(MatchError::IneligibleDonor {
                donor_id,
                request_id,
                reason: format!(
                    "{} donor is not compatible with this {} request",
                    donor.donor_type(),
                    request.request_type()
                ),
            });
        }

        let requester = self
            .store
            .get_requester(request.requester_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("requester {}", request.requester_id)))?;

        let (request, response) = match self.store.accept_request(request_id, donor_id).await? {
            TransitionOutcome::Committed { request, response } => (request, response),
            TransitionOutcome::AlreadyAccepted => {
                tracing::warn!(
                    "Donor {} lost the race to accept request {}",
                    donor_id,
                    request_id
                );
                return Err(MatchError::Conflict(request_id));
            }
        };

        tracing::info!("Request {} accepted by donor {}", request_id, donor_id);

        let receipt = AcceptanceReceipt {
            request,
            response,
            donor: donor.contact(),
            requester: requester.contact(),
        };

        self.notify(&receipt).await;

        Ok(receipt)
    }

    /// Send both acceptance messages. Failures are logged, never returned:
    /// the acceptance is already committed.
    async fn notify(&self, receipt: &AcceptanceReceipt) {
        for notification in [requester_notification(receipt), donor_notification(receipt)] {
            if let Err(e) = self
                .notifier
                .send(&notification.recipient, &notification.subject, &notification.body)
                .await
            {
                tracing::warn!(
                    "Failed to notify {} about request {}: {}",
                    notification.recipient,
                    receipt.request.id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DonorContact, DonorResponse, MatchCriteria, Request, RequestStatus, RequesterContact,
        RequesterId, ResponseRecord,
    };
    use chrono::{NaiveDate, Utc};

    fn receipt() -> AcceptanceReceipt {
        AcceptanceReceipt {
            request: Request {
                id: RequestId(5),
                requester_id: RequesterId(2),
                criteria: MatchCriteria::Blood {
                    blood_group: "B+".to_string(),
                },
                urgency: "high".to_string(),
                hospital: "Lakeside Clinic".to_string(),
                amount: "1 unit".to_string(),
                requested_date: NaiveDate::from_ymd_opt(2026, 7, 9).unwrap(),
                status: RequestStatus::Accepted,
                created_at: Utc::now(),
            },
            response: ResponseRecord {
                id: uuid::Uuid::new_v4(),
                request_id: RequestId(5),
                donor_id: DonorId(8),
                response: DonorResponse::Accepted,
                responded_at: Utc::now(),
            },
            donor: DonorContact {
                donor_id: DonorId(8),
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                phone: "555-0188".to_string(),
            },
            requester: RequesterContact {
                requester_id: RequesterId(2),
                name: "Meera".to_string(),
                email: "meera@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_requester_notification_carries_donor_contact() {
        let notification = requester_notification(&receipt());

        assert_eq!(notification.recipient, "meera@example.com");
        assert_eq!(notification.subject, "URGENT: Donor Match Found!");
        assert!(notification.body.contains("Hello Meera"));
        assert!(notification.body.contains("A donor (Ravi) has accepted your blood request for Lakeside Clinic"));
        assert!(notification.body.contains("Phone: 555-0188"));
        assert!(notification.body.contains("Email: ravi@example.com"));
    }

    #[test]
    fn test_donor_notification() {
        let notification = donor_notification(&receipt());

        assert_eq!(notification.recipient, "ravi@example.com");
        assert_eq!(notification.subject, "Acceptance Confirmed");
        assert!(notification.body.contains("request for Lakeside Clinic"));
    }
}
