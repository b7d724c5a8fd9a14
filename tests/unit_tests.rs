// Unit tests for Donor Match

use donor_match::core::{
    filters::{check_eligibility, is_eligible, Ineligibility},
    scoring::{blood_groups_match, hla_hits, score_compatibility},
    Matcher,
};
use donor_match::models::{
    Compatibility, DonationCategory, Donor, DonorId, HlaTyping, MatchCriteria, MatchingRules,
    Request, RequestId, RequestStatus, RequesterId,
};
use chrono::{NaiveDate, Utc};

fn blood(group: &str) -> MatchCriteria {
    MatchCriteria::Blood {
        blood_group: group.to_string(),
    }
}

fn marrow(values: [&str; 6]) -> MatchCriteria {
    MatchCriteria::Marrow {
        hla: HlaTyping::from_values(&values).unwrap(),
    }
}

fn create_donor(profile: MatchCriteria, available: bool, hemoglobin_level: Option<f64>) -> Donor {
    Donor {
        id: DonorId(1),
        name: "Test Donor".to_string(),
        email: "donor@example.com".to_string(),
        phone: "555-0100".to_string(),
        profile,
        hemoglobin_level,
        available,
        created_at: Utc::now(),
    }
}

fn create_request(id: i64, criteria: MatchCriteria, status: RequestStatus) -> Request {
    Request {
        id: RequestId(id),
        requester_id: RequesterId(1),
        criteria,
        urgency: "high".to_string(),
        hospital: "City General".to_string(),
        amount: "1 unit".to_string(),
        requested_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        status,
        created_at: Utc::now(),
    }
}

#[test]
fn test_eligibility_truth_table() {
    let rules = MatchingRules::default();
    let cases = [
        (true, Some(12.5), true),
        (true, Some(12.49), false),
        (true, Some(17.0), true),
        (true, None, false),
        (false, Some(15.0), false),
        (false, None, false),
    ];

    for (available, hb, expected) in cases {
        let donor = create_donor(blood("O+"), available, hb);
        assert_eq!(
            is_eligible(&donor, &rules),
            expected,
            "available={} hb={:?}",
            available,
            hb
        );
    }
}

#[test]
fn test_low_hemoglobin_reason() {
    let donor = create_donor(blood("O+"), true, Some(11.2));
    match check_eligibility(&donor, &MatchingRules::default()) {
        Err(Ineligibility::LowHemoglobin { level, threshold }) => {
            assert_eq!(level, 11.2);
            assert_eq!(threshold, 12.5);
        }
        other => panic!("unexpected eligibility result {:?}", other),
    }
}

#[test]
fn test_blood_group_matching() {
    assert!(blood_groups_match(" o+ ", "O+"));
    assert!(blood_groups_match("ab-", "AB-"));
    assert!(!blood_groups_match("A+", "B+"));
    assert!(!blood_groups_match("A+", "A-"));
}

#[test]
fn test_hla_threshold() {
    let donor = create_donor(marrow(["A1", "A2", "A3", "A4", "", ""]), true, Some(13.0));

    let three = create_request(1, marrow(["A1", "A2", "A3", "X", "", ""]), RequestStatus::Pending);
    let four = create_request(2, marrow(["A1", "A2", "A3", "A4", "", ""]), RequestStatus::Pending);

    let rules = MatchingRules::default();
    assert_eq!(score_compatibility(&donor, &three, &rules), Compatibility::INCOMPATIBLE);
    assert_eq!(
        score_compatibility(&donor, &four, &rules),
        Compatibility {
            eligible: true,
            score: Some(4)
        }
    );
}

#[test]
fn test_hla_position_matters() {
    // Same values at different loci are not hits
    let donor = HlaTyping::from_values(&["A1", "A2", "B1", "B2", "C1", "C2"]).unwrap();
    let request = HlaTyping::from_values(&["A2", "A1", "B2", "B1", "C2", "C1"]).unwrap();
    assert_eq!(hla_hits(&donor, &request), 0);
}

#[test]
fn test_hla_missing_on_one_side() {
    let donor = HlaTyping::from_values(&["A1", "", "B1", "", "C1", ""]).unwrap();
    let request = HlaTyping::from_values(&["A1", "A2", "B1", "B2", "", "C2"]).unwrap();
    assert_eq!(hla_hits(&donor, &request), 2);
}

#[test]
fn test_matcher_only_returns_pending_same_category() {
    let matcher = Matcher::with_default_rules();
    let donor = create_donor(blood("B+"), true, Some(14.0));

    let requests = vec![
        create_request(1, blood("B+"), RequestStatus::Pending),
        create_request(2, blood("B+"), RequestStatus::Accepted),
        create_request(3, marrow(["B+"; 6]), RequestStatus::Pending),
        create_request(4, blood(" b+"), RequestStatus::Pending),
    ];

    let result = matcher.find_candidates(&donor, requests);

    for candidate in &result.candidates {
        assert_eq!(candidate.request.request_type(), DonationCategory::Blood);
        assert_eq!(candidate.request.status, RequestStatus::Pending);
        assert_eq!(candidate.score, None);
    }
    let ids: Vec<i64> = result.candidates.iter().map(|c| c.request.id.0).collect();
    assert_eq!(ids, vec![1, 4]);
}
