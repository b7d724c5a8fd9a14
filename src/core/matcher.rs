use crate::models::{CandidateOrder, Donor, MatchingRules, Request, ScoredCandidate};
use crate::core::{filters::is_eligible, scoring::score_compatibility};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub eligible: bool,
    pub candidates: Vec<ScoredCandidate>,
    pub total_requests: usize,
}

/// Matching orchestrator - builds a donor's candidate request list
///
/// # Pipeline Stages
/// 1. Donor eligibility (availability and hemoglobin)
/// 2. Status and category filtering
/// 3. Compatibility scoring
/// 4. Optional ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: MatchingRules,
}

impl Matcher {
    pub fn new(rules: MatchingRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: MatchingRules::default(),
        }
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    /// Find the requests a donor may be offered
    ///
    /// # Arguments
    /// * `donor` - The donor viewing their dashboard
    /// * `requests` - Pending requests of the donor's category, in store order
    ///
    /// # Returns
    /// MatchResult holding the compatible requests. Ineligible donors get an
    /// empty list.
    pub fn find_candidates(&self, donor: &Donor, requests: Vec<Request>) -> MatchResult {
        let total_requests = requests.len();

        if !is_eligible(donor, &self.rules) {
            return MatchResult {
                eligible: false,
                candidates: Vec::new(),
                total_requests,
            };
        }

        let donor_type = donor.donor_type();

        let mut candidates: Vec<ScoredCandidate> = requests
            .into_iter()
            // Stage 2: only open requests of the donor's own category
            .filter(|request| request.status.is_pending() && request.request_type() == donor_type)
            // Stage 3: compatibility
            .filter_map(|request| {
                let compatibility = score_compatibility(donor, &request, &self.rules);
                compatibility.eligible.then_some(ScoredCandidate {
                    request,
                    score: compatibility.score,
                })
            })
            .collect();

        // Stage 4: stable sort keeps store order among equal scores
        if self.rules.order == CandidateOrder::ScoreDescending {
            candidates.sort_by(|a, b| b.score.cmp(&a.score));
        }

        MatchResult {
            eligible: true,
            candidates,
            total_requests,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
