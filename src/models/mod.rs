// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AcceptanceReceipt, CandidateOrder, Compatibility, DonationCategory, Donor, DonorContact,
    DonorId, DonorResponse, DonorStatusUpdate, HlaTyping, MatchCriteria, MatchingRules, NewDonor,
    NewRequest, NewRequester, Request, RequestId, RequestStatus, Requester, RequesterContact,
    RequesterId, ResponseRecord, ScoredCandidate, TransitionOutcome, HLA_LOCI,
};
pub use requests::{AcceptRequestBody, SubmitRequestBody, UpdateDonorStatusBody};
pub use responses::{AcceptedDonorsResponse, CandidatesResponse, ErrorResponse, HealthResponse};
