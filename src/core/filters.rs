use std::fmt;

use crate::models::{Donor, MatchingRules};

/// Reason a donor may not be shown any request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ineligibility {
    Unavailable,
    MissingHemoglobin,
    LowHemoglobin { level: f64, threshold: f64 },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Unavailable => write!(f, "donor is marked unavailable"),
            Ineligibility::MissingHemoglobin => write!(f, "no hemoglobin level on record"),
            Ineligibility::LowHemoglobin { level, threshold } => {
                write!(f, "hemoglobin {} is below {}", level, threshold)
            }
        }
    }
}

/// Check a donor's general fitness to view requests
///
/// This is stage 1 of the matching pipeline. The hemoglobin threshold is
/// applied to blood and marrow donors alike.
#[inline]
pub fn check_eligibility(donor: &Donor, rules: &MatchingRules) -> Result<(), Ineligibility> {
    if !donor.available {
        return Err(Ineligibility::Unavailable);
    }

    match donor.hemoglobin_level {
        None => Err(Ineligibility::MissingHemoglobin),
        Some(level) if level >= rules.min_hemoglobin => Ok(()),
        Some(level) => Err(Ineligibility::LowHemoglobin {
            level,
            threshold: rules.min_hemoglobin,
        }),
    }
}

#[inline]
pub fn is_eligible(donor: &Donor, rules: &MatchingRules) -> bool {
    check_eligibility(donor, rules).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonorId, MatchCriteria};
    use chrono::Utc;

    fn create_test_donor(available: bool, hemoglobin_level: Option<f64>) -> Donor {
        Donor {
            id: DonorId(1),
            name: "Test Donor".to_string(),
            email: "donor@example.com".to_string(),
            phone: "555-0101".to_string(),
            profile: MatchCriteria::Blood {
                blood_group: "O+".to_string(),
            },
            hemoglobin_level,
            available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_eligible_donor() {
        let donor = create_test_donor(true, Some(14.0));
        assert!(is_eligible(&donor, &MatchingRules::default()));
    }

    #[test]
    fn test_threshold_boundary() {
        let rules = MatchingRules::default();
        assert!(is_eligible(&create_test_donor(true, Some(12.5)), &rules));
        assert!(!is_eligible(&create_test_donor(true, Some(12.49)), &rules));
    }

    #[test]
    fn test_unavailable_donor_filtered() {
        let donor = create_test_donor(false, Some(15.0));
        assert_eq!(
            check_eligibility(&donor, &MatchingRules::default()),
            Err(Ineligibility::Unavailable)
        );
    }

    #[test]
    fn test_missing_hemoglobin_is_ineligible() {
        let donor = create_test_donor(true, None);
        assert_eq!(
            check_eligibility(&donor, &MatchingRules::default()),
            Err(Ineligibility::MissingHemoglobin)
        );
    }

    #[test]
    fn test_marrow_donor_uses_same_threshold() {
        let mut donor = create_test_donor(true, Some(12.0));
        donor.profile = MatchCriteria::Marrow {
            hla: Default::default(),
        };
        assert!(!is_eligible(&donor, &MatchingRules::default()));
    }

    #[test]
    fn test_custom_threshold() {
        let rules = MatchingRules {
            min_hemoglobin: 13.0,
            ..MatchingRules::default()
        };
        assert!(!is_eligible(&create_test_donor(true, Some(12.8)), &rules));
    }
}
