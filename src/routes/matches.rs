use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::MatchingService;
use crate::error::MatchError;
use crate::models::{
    AcceptRequestBody, AcceptedDonorsResponse, CandidatesResponse, DonorId, HealthResponse,
    NewRequest, RequestId, RequesterId, SubmitRequestBody, UpdateDonorStatusBody,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/donors/{donor_id}/candidates", web::get().to(list_candidates))
        .route("/donors/{donor_id}/status", web::put().to(update_donor_status))
        .route("/requests", web::post().to(submit_request))
        .route("/requests/{request_id}/accept", web::post().to(accept_request))
        .route("/requesters/{requester_id}/donors", web::get().to(accepted_donors));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.service.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Candidate requests for a donor's dashboard
///
/// GET /api/v1/donors/{donorId}/candidates
async fn list_candidates(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, MatchError> {
    let donor_id = DonorId(path.into_inner());

    let result = state.service.list_candidates(donor_id).await?;

    Ok(HttpResponse::Ok().json(CandidatesResponse {
        donor_id,
        eligible: result.eligible,
        total_results: result.candidates.len(),
        candidates: result.candidates,
    }))
}

/// Donor profile update
///
/// PUT /api/v1/donors/{donorId}/status
///
/// Request body:
/// ```json
/// { "available": true, "hemoglobinLevel": 13.4, "phone": "string" }
/// ```
async fn update_donor_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateDonorStatusBody>,
) -> Result<HttpResponse, MatchError> {
    let donor = state
        .service
        .update_donor_status(DonorId(path.into_inner()), body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(donor))
}

/// Submit a blood or marrow request
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// {
///   "requesterId": 1,
///   "type": "blood|marrow",
///   "bloodGroup": "O+",
///   "hla": ["A1", "A2", "B7", "B8", "DR1", "DR4"],
///   "urgency": "string",
///   "hospital": "string",
///   "amount": "string",
///   "requestedDate": "2026-01-31"
/// }
/// ```
async fn submit_request(
    state: web::Data<AppState>,
    body: web::Json<SubmitRequestBody>,
) -> Result<HttpResponse, MatchError> {
    let request = NewRequest::try_from(body.into_inner())?;
    let created = state.service.submit_request(request).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Accept a request on behalf of a donor
///
/// POST /api/v1/requests/{requestId}/accept
///
/// Request body:
/// ```json
/// { "donorId": 1 }
/// ```
async fn accept_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<AcceptRequestBody>,
) -> Result<HttpResponse, MatchError> {
    let receipt = state
        .service
        .accept_request(RequestId(path.into_inner()), body.donor_id)
        .await?;

    Ok(HttpResponse::Ok().json(receipt))
}

/// Donors who accepted the requester's requests
///
/// GET /api/v1/requesters/{requesterId}/donors
async fn accepted_donors(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, MatchError> {
    let requester_id = RequesterId(path.into_inner());
    let donors = state.service.accepted_donors(requester_id).await?;

    Ok(HttpResponse::Ok().json(AcceptedDonorsResponse {
        requester_id,
        donors,
    }))
}
