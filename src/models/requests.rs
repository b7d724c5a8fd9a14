use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::MatchError;
use crate::models::domain::{
    DonationCategory, DonorId, DonorStatusUpdate, HlaTyping, MatchCriteria, NewRequest, RequesterId,
};

/// Body of `POST /requests`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRequestBody {
    #[serde(alias = "requester_id", rename = "requesterId")]
    pub requester_id: RequesterId,
    #[validate(length(min = 1))]
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(alias = "blood_group", rename = "bloodGroup", default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub hla: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub urgency: String,
    #[validate(length(min = 1))]
    pub hospital: String,
    #[validate(length(min = 1))]
    pub amount: String,
    #[serde(alias = "requested_date", rename = "requestedDate")]
    pub requested_date: NaiveDate,
}

impl TryFrom<SubmitRequestBody> for NewRequest {
    type Error = MatchError;

    fn try_from(body: SubmitRequestBody) -> Result<Self, Self::Error> {
        body.validate()?;

        let category: DonationCategory = body
            .request_type
            .parse()
            .map_err(MatchError::Validation)?;

        let criteria = match category {
            DonationCategory::Blood => MatchCriteria::Blood {
                blood_group: body
                    .blood_group
                    .ok_or_else(|| MatchError::Validation("bloodGroup is required for blood requests".into()))?,
            },
            DonationCategory::Marrow => {
                let values = body
                    .hla
                    .ok_or_else(|| MatchError::Validation("hla is required for marrow requests".into()))?;
                MatchCriteria::Marrow {
                    hla: HlaTyping::from_values(&values).map_err(MatchError::Validation)?,
                }
            }
        };

        Ok(NewRequest {
            requester_id: body.requester_id,
            criteria,
            urgency: body.urgency,
            hospital: body.hospital,
            amount: body.amount,
            requested_date: body.requested_date,
        })
    }
}

/// Body of `POST /requests/{id}/accept`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptRequestBody {
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: DonorId,
}

/// Body of `PUT /donors/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDonorStatusBody {
    pub available: bool,
    #[serde(alias = "hemoglobin_level", rename = "hemoglobinLevel", default)]
    pub hemoglobin_level: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<UpdateDonorStatusBody> for DonorStatusUpdate {
    fn from(body: UpdateDonorStatusBody) -> Self {
        DonorStatusUpdate {
            available: body.available,
            hemoglobin_level: body.hemoglobin_level,
            phone: body.phone,
        }
    }
}
