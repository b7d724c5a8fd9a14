//! Donor Match - eligibility and matching engine for blood and marrow donation
//!
//! This library decides which donors may see which requests, scores
//! donor/request compatibility, and commits acceptances so that each request
//! is won by at most one donor.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchingService, AcceptanceCoordinator};
pub use error::MatchError;
pub use models::{Donor, Request, ResponseRecord, MatchCriteria, MatchingRules, ScoredCandidate};
