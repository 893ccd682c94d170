//! Offering lifecycle endpoints.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use registra_core::FloatRequest;
use registra_store::{ActiveOffering, OfferingSummary, PendingOffering};
use registra_types::{Decision, Offering, Principal};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OfferingActionRequest {
    pub offering_id: String,
    pub action: Decision,
}

#[derive(Debug, Deserialize)]
pub struct CompleteOfferingRequest {
    pub offering_id: String,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub offering: Offering,
    pub auto_enrolled: usize,
}

#[derive(Debug, Serialize)]
pub struct ActiveOfferingListResponse {
    pub offerings: Vec<ActiveOffering>,
}

#[derive(Debug, Serialize)]
pub struct MyOfferingListResponse {
    pub offerings: Vec<OfferingSummary>,
}

#[derive(Debug, Serialize)]
pub struct PendingOfferingListResponse {
    pub offerings: Vec<PendingOffering>,
}

/// `POST /api/v1/offerings` (faculty).
pub async fn float_offering_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<FloatRequest>,
) -> Result<Json<Offering>> {
    let offering = state.services.offerings().float(&principal, req)?;
    Ok(Json(offering))
}

/// `POST /api/v1/offerings/approve` (admin).
pub async fn decide_offering_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<OfferingActionRequest>,
) -> Result<Json<DecisionResponse>> {
    let outcome = state
        .services
        .offerings()
        .decide(&principal, &req.offering_id, req.action)?;
    Ok(Json(DecisionResponse {
        offering: outcome.offering,
        auto_enrolled: outcome.auto_enrolled,
    }))
}

/// `POST /api/v1/offerings/complete` (faculty, owner).
pub async fn complete_offering_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CompleteOfferingRequest>,
) -> Result<Json<Offering>> {
    let offering = state
        .services
        .offerings()
        .complete(&principal, &req.offering_id)?;
    Ok(Json(offering))
}

/// `GET /api/v1/offerings` (student).
pub async fn list_active_offerings_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ActiveOfferingListResponse>> {
    let offerings = state.services.offerings().list_active(&principal)?;
    Ok(Json(ActiveOfferingListResponse { offerings }))
}

/// `GET /api/v1/offerings/mine` (faculty).
pub async fn my_offerings_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<MyOfferingListResponse>> {
    let offerings = state.services.offerings().my_offerings(&principal)?;
    Ok(Json(MyOfferingListResponse { offerings }))
}

/// `GET /api/v1/offerings/pending` (admin).
pub async fn pending_offerings_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<PendingOfferingListResponse>> {
    let offerings = state.services.offerings().pending(&principal)?;
    Ok(Json(PendingOfferingListResponse { offerings }))
}
