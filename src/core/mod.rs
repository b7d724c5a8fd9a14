// Core algorithm exports
pub mod acceptance;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod service;

pub use acceptance::{donor_notification, requester_notification, AcceptanceCoordinator, Notification};
pub use filters::{check_eligibility, is_eligible, Ineligibility};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{blood_groups_match, hla_hits, score_compatibility};
pub use service::MatchingService;
