use crate::models::{Compatibility, Donor, HlaTyping, MatchCriteria, MatchingRules, Request};

/// Decide whether a donor and a request of the same category match
///
/// Blood compatibility is binary:
/// ```text
/// eligible = normalize(donor.blood_group) == normalize(request.blood_group)
/// ```
/// Marrow compatibility counts HLA hits:
/// ```text
/// hits     = |{ i in 1..=6 : donor.hla_i and request.hla_i set and equal }|
/// eligible = hits >= rules.min_hla_hits
/// score    = hits
/// ```
/// A category mismatch is never compatible.
pub fn score_compatibility(
    donor: &Donor,
    request: &Request,
    rules: &MatchingRules,
) -> Compatibility {
    match (&donor.profile, &request.criteria) {
        (
            MatchCriteria::Blood { blood_group: donor_group },
            MatchCriteria::Blood { blood_group: request_group },
        ) => Compatibility {
            eligible: blood_groups_match(donor_group, request_group),
            score: None,
        },
        (MatchCriteria::Marrow { hla: donor_hla }, MatchCriteria::Marrow { hla: request_hla }) => {
            let hits = hla_hits(donor_hla, request_hla);
            if hits >= rules.min_hla_hits {
                Compatibility {
                    eligible: true,
                    score: Some(hits),
                }
            } else {
                Compatibility::INCOMPATIBLE
            }
        }
        _ => Compatibility::INCOMPATIBLE,
    }
}

/// Exact blood group match, ignoring surrounding whitespace and case.
/// No ABO/Rh cross-compatibility is applied.
#[inline]
pub fn blood_groups_match(donor_group: &str, request_group: &str) -> bool {
    normalize(donor_group) == normalize(request_group)
}

/// Count loci where both typings carry the same value
#[inline]
pub fn hla_hits(donor: &HlaTyping, request: &HlaTyping) -> u8 {
    donor
        .loci()
        .iter()
        .zip(request.loci().iter())
        .filter(|(d, r)| match (d, r) {
            (Some(d), Some(r)) => {
                let (d, r) = (normalize(d), normalize(r));
                !d.is_empty() && d == r
            }
            _ => false,
        })
        .count() as u8
}

#[inline]
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonorId, RequestId, RequestStatus, RequesterId};
    use chrono::{NaiveDate, Utc};

    fn hla(values: [&str; 6]) -> HlaTyping {
        HlaTyping::from_values(&values).unwrap()
    }

    fn create_test_donor(profile: MatchCriteria) -> Donor {
        Donor {
            id: DonorId(1),
            name: "Test Donor".to_string(),
            email: "donor@example.com".to_string(),
            phone: "555-0101".to_string(),
            profile,
            hemoglobin_level: Some(14.0),
            available: true,
            created_at: Utc::now(),
        }
    }

    fn create_test_request(criteria: MatchCriteria) -> Request {
        Request {
            id: RequestId(10),
            requester_id: RequesterId(2),
            criteria,
            urgency: "high".to_string(),
            hospital: "City General".to_string(),
            amount: "1 unit".to_string(),
            requested_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_blood_match_normalizes() {
        let donor = create_test_donor(MatchCriteria::Blood {
            blood_group: " o+ ".to_string(),
        });
        let request = create_test_request(MatchCriteria::Blood {
            blood_group: "O+".to_string(),
        });

        let result = score_compatibility(&donor, &request, &MatchingRules::default());
        assert!(result.eligible);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_blood_mismatch() {
        assert!(!blood_groups_match("A+", "B+"));
        // no cross-compatibility table
        assert!(!blood_groups_match("O-", "A+"));
    }

    #[test]
    fn test_three_hits_not_a_candidate() {
        let donor = create_test_donor(MatchCriteria::Marrow {
            hla: hla(["A1", "A2", "A3", "A4", "", ""]),
        });
        let request = create_test_request(MatchCriteria::Marrow {
            hla: hla(["A1", "A2", "A3", "X", "", ""]),
        });

        assert_eq!(hla_hits(donor.profile.hla().unwrap(), request.criteria.hla().unwrap()), 3);
        let result = score_compatibility(&donor, &request, &MatchingRules::default());
        assert_eq!(result, Compatibility::INCOMPATIBLE);
    }

    #[test]
    fn test_four_hits_scores_four() {
        let donor = create_test_donor(MatchCriteria::Marrow {
            hla: hla(["A1", "A2", "A3", "A4", "", ""]),
        });
        let request = create_test_request(MatchCriteria::Marrow {
            hla: hla(["a1 ", " A2", "a3", "A4", "", ""]),
        });

        let result = score_compatibility(&donor, &request, &MatchingRules::default());
        assert!(result.eligible);
        assert_eq!(result.score, Some(4));
    }

    #[test]
    fn test_missing_loci_never_hit() {
        let empty = HlaTyping::default();
        assert_eq!(hla_hits(&empty, &empty), 0);
    }

    #[test]
    fn test_category_mismatch_incompatible() {
        let donor = create_test_donor(MatchCriteria::Blood {
            blood_group: "O+".to_string(),
        });
        let request = create_test_request(MatchCriteria::Marrow {
            hla: hla(["A1"; 6]),
        });

        assert_eq!(
            score_compatibility(&donor, &request, &MatchingRules::default()),
            Compatibility::INCOMPATIBLE
        );
    }
}
