//! Enrollment workflow endpoints.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use registra_store::{EnrollmentDetail, EnrollmentRequest};
use registra_types::{Decision, Enrollment, Principal};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub offering_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentActionRequest {
    pub enrollment_id: String,
    pub action: Decision,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub enrollment_id: String,
    pub grade: String,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentListResponse {
    pub enrollments: Vec<EnrollmentDetail>,
}

#[derive(Debug, Serialize)]
pub struct RequestQueueResponse {
    pub requests: Vec<EnrollmentRequest>,
}

/// `POST /api/v1/enrollments` (student).
pub async fn register_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Enrollment>> {
    let enrollment = state
        .services
        .enrollment()
        .register(&principal, &req.offering_id)?;
    Ok(Json(enrollment))
}

/// `POST /api/v1/enrollments/instructor-action` (faculty).
pub async fn instructor_action_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<EnrollmentActionRequest>,
) -> Result<Json<Enrollment>> {
    let enrollment = state.services.enrollment().instructor_decide(
        &principal,
        &req.enrollment_id,
        req.action,
    )?;
    Ok(Json(enrollment))
}

/// `POST /api/v1/enrollments/advisor-action` (faculty-as-advisor).
pub async fn advisor_action_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<EnrollmentActionRequest>,
) -> Result<Json<Enrollment>> {
    let enrollment =
        state
            .services
            .enrollment()
            .advisor_decide(&principal, &req.enrollment_id, req.action)?;
    Ok(Json(enrollment))
}

/// `POST /api/v1/enrollments/grade` (faculty, owner).
pub async fn grade_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<Enrollment>> {
    let enrollment =
        state
            .services
            .enrollment()
            .set_grade(&principal, &req.enrollment_id, &req.grade)?;
    Ok(Json(enrollment))
}

/// `GET /api/v1/enrollments/mine` (student).
pub async fn my_enrollments_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<EnrollmentListResponse>> {
    let enrollments = state.services.enrollment().my_enrollments(&principal)?;
    Ok(Json(EnrollmentListResponse { enrollments }))
}

/// `GET /api/v1/enrollments/instructor-requests` (faculty).
pub async fn instructor_requests_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<RequestQueueResponse>> {
    let requests = state.services.enrollment().instructor_requests(&principal)?;
    Ok(Json(RequestQueueResponse { requests }))
}

/// `GET /api/v1/enrollments/advisor-requests` (faculty).
pub async fn advisor_requests_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<RequestQueueResponse>> {
    let requests = state.services.enrollment().advisor_requests(&principal)?;
    Ok(Json(RequestQueueResponse { requests }))
}
