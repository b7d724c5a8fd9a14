// Route exports
pub mod matches;

use actix_web::{error, http::StatusCode, web, HttpResponse};

use crate::error::MatchError;
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure),
    );
}

impl error::ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            MatchError::Validation(_) => StatusCode::BAD_REQUEST,
            MatchError::NotFound(_) => StatusCode::NOT_FOUND,
            MatchError::Conflict(_) => StatusCode::CONFLICT,
            MatchError::IneligibleDonor { .. } => StatusCode::FORBIDDEN,
            MatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonorId, RequestId};
    use actix_web::ResponseError;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            MatchError::Conflict(RequestId(1)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MatchError::IneligibleDonor {
                donor_id: DonorId(1),
                request_id: RequestId(2),
                reason: "donor is marked unavailable".to_string(),
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            MatchError::Validation("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
