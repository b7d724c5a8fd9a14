use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Number of HLA loci compared for marrow compatibility
pub const HLA_LOCI: usize = 6;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identity of a registered donor
    DonorId
);
entity_id!(
    /// Identity of a person or clinic raising requests
    RequesterId
);
entity_id!(
    /// Identity of a blood or marrow request
    RequestId
);

/// Donation category shared by donors, requesters and requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "donation_category", rename_all = "lowercase")]
pub enum DonationCategory {
    Blood,
    Marrow,
}

impl DonationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationCategory::Blood => "blood",
            DonationCategory::Marrow => "marrow",
        }
    }
}

impl fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blood" => Ok(DonationCategory::Blood),
            "marrow" => Ok(DonationCategory::Marrow),
            other => Err(format!("unknown donation category '{}'", other)),
        }
    }
}

/// Request lifecycle. `Pending -> Accepted` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

/// Value recorded on a donor response. Declines are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "donor_response", rename_all = "lowercase")]
pub enum DonorResponse {
    Accepted,
}

/// Six HLA locus values. Blank values are stored as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<String>>", into = "Vec<Option<String>>")]
pub struct HlaTyping {
    loci: [Option<String>; HLA_LOCI],
}

impl HlaTyping {
    pub fn new(loci: [Option<String>; HLA_LOCI]) -> Self {
        Self {
            loci: loci.map(|value| value.filter(|v| !v.trim().is_empty())),
        }
    }

    /// Build a typing from exactly six raw values, blank strings meaning unset
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Result<Self, String> {
        if values.len() != HLA_LOCI {
            return Err(format!(
                "expected {} HLA loci, got {}",
                HLA_LOCI,
                values.len()
            ));
        }

        let mut loci: [Option<String>; HLA_LOCI] = Default::default();
        for (slot, value) in loci.iter_mut().zip(values) {
            *slot = Some(value.as_ref().to_string());
        }

        Ok(Self::new(loci))
    }

    pub fn loci(&self) -> &[Option<String>; HLA_LOCI] {
        &self.loci
    }

    /// Number of loci carrying a value
    pub fn typed_loci(&self) -> usize {
        self.loci.iter().filter(|l| l.is_some()).count()
    }
}

impl From<Vec<Option<String>>> for HlaTyping {
    fn from(values: Vec<Option<String>>) -> Self {
        let mut loci: [Option<String>; HLA_LOCI] = Default::default();
        for (slot, value) in loci.iter_mut().zip(values) {
            *slot = value;
        }
        Self::new(loci)
    }
}

impl From<HlaTyping> for Vec<Option<String>> {
    fn from(typing: HlaTyping) -> Self {
        typing.loci.into_iter().collect()
    }
}

/// Category-specific matching data carried by both donors and requests.
///
/// Holding the blood group or HLA typing inside the category variant keeps
/// a request's type and its criteria from disagreeing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchCriteria {
    Blood {
        #[serde(rename = "bloodGroup")]
        blood_group: String,
    },
    Marrow {
        hla: HlaTyping,
    },
}

impl MatchCriteria {
    pub fn category(&self) -> DonationCategory {
        match self {
            MatchCriteria::Blood { .. } => DonationCategory::Blood,
            MatchCriteria::Marrow { .. } => DonationCategory::Marrow,
        }
    }

    pub fn blood_group(&self) -> Option<&str> {
        match self {
            MatchCriteria::Blood { blood_group } => Some(blood_group),
            MatchCriteria::Marrow { .. } => None,
        }
    }

    pub fn hla(&self) -> Option<&HlaTyping> {
        match self {
            MatchCriteria::Blood { .. } => None,
            MatchCriteria::Marrow { hla } => Some(hla),
        }
    }
}

fn validate_criteria(criteria: &MatchCriteria) -> Result<(), ValidationError> {
    match criteria {
        MatchCriteria::Blood { blood_group } if blood_group.trim().is_empty() => {
            Err(ValidationError::new("blood_group_required"))
        }
        MatchCriteria::Marrow { hla } if hla.typed_loci() == 0 => {
            Err(ValidationError::new("hla_typing_required"))
        }
        _ => Ok(()),
    }
}

/// Registered donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    #[serde(rename = "donorId")]
    pub id: DonorId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile: MatchCriteria,
    #[serde(rename = "hemoglobinLevel")]
    pub hemoglobin_level: Option<f64>,
    pub available: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Donor {
    pub fn donor_type(&self) -> DonationCategory {
        self.profile.category()
    }

    pub fn contact(&self) -> DonorContact {
        DonorContact {
            donor_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Donor registration payload, validated before it reaches the store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewDonor {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(custom(function = "validate_criteria"))]
    pub profile: MatchCriteria,
    #[validate(range(min = 0.0, max = 30.0))]
    pub hemoglobin_level: Option<f64>,
    pub available: bool,
}

/// Donor-editable status fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DonorStatusUpdate {
    pub available: bool,
    #[validate(range(min = 0.0, max = 30.0))]
    pub hemoglobin_level: Option<f64>,
    #[validate(length(min = 1))]
    pub phone: Option<String>,
}

/// Person or clinic raising requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    #[serde(rename = "requesterId")]
    pub id: RequesterId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: DonationCategory,
}

impl Requester {
    pub fn contact(&self) -> RequesterContact {
        RequesterContact {
            requester_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRequester {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub category: DonationCategory,
}

/// Outstanding or fulfilled blood/marrow request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "requestId")]
    pub id: RequestId,
    #[serde(rename = "requesterId")]
    pub requester_id: RequesterId,
    pub criteria: MatchCriteria,
    pub urgency: String,
    pub hospital: String,
    pub amount: String,
    #[serde(rename = "requestedDate")]
    pub requested_date: NaiveDate,
    pub status: RequestStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn request_type(&self) -> DonationCategory {
        self.criteria.category()
    }
}

/// Request submission, validated before it reaches the store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRequest {
    pub requester_id: RequesterId,
    #[validate(custom(function = "validate_criteria"))]
    pub criteria: MatchCriteria,
    #[validate(length(min = 1))]
    pub urgency: String,
    #[validate(length(min = 1))]
    pub hospital: String,
    #[validate(length(min = 1))]
    pub amount: String,
    pub requested_date: NaiveDate,
}

/// A donor's committed response to a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(rename = "responseId")]
    pub id: Uuid,
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    #[serde(rename = "donorId")]
    pub donor_id: DonorId,
    pub response: DonorResponse,
    #[serde(rename = "respondedAt")]
    pub responded_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn accepted(request_id: RequestId, donor_id: DonorId) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            donor_id,
            response: DonorResponse::Accepted,
            responded_at: Utc::now(),
        }
    }
}

/// Contact details handed to a requester once a donor accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorContact {
    #[serde(rename = "donorId")]
    pub donor_id: DonorId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterContact {
    #[serde(rename = "requesterId")]
    pub requester_id: RequesterId,
    pub name: String,
    pub email: String,
}

/// Result of a committed acceptance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceReceipt {
    pub request: Request,
    pub response: ResponseRecord,
    pub donor: DonorContact,
    pub requester: RequesterContact,
}

/// Outcome of the store's conditional `Pending -> Accepted` transition
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    Committed {
        request: Request,
        response: ResponseRecord,
    },
    /// The request was no longer pending when the update ran
    AlreadyAccepted,
}

/// Compatibility decision for one donor/request pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub eligible: bool,
    /// HLA hit count; blood matches carry no score
    pub score: Option<u8>,
}

impl Compatibility {
    pub const INCOMPATIBLE: Compatibility = Compatibility {
        eligible: false,
        score: None,
    };
}

/// Request offered to a donor, with its marrow score when applicable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub request: Request,
    pub score: Option<u8>,
}

/// How candidate lists are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    /// Store order, ascending request id
    #[default]
    Retrieval,
    /// Highest score first, ties keep store order
    ScoreDescending,
}

/// Thresholds applied by the matching engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingRules {
    pub min_hemoglobin: f64,
    pub min_hla_hits: u8,
    pub order: CandidateOrder,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            min_hemoglobin: 12.5,
            min_hla_hits: 4,
            order: CandidateOrder::Retrieval,
        }
    }
}
