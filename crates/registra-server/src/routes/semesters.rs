//! Semester endpoints.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use registra_types::{Principal, Semester};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSemesterRequest {
    pub code: String,
    pub year: i32,
    pub term: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct SemesterListResponse {
    pub semesters: Vec<Semester>,
}

/// `POST /api/v1/semesters` (admin).
pub async fn create_semester_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateSemesterRequest>,
) -> Result<Json<Semester>> {
    let semester = state.services.semesters().create(
        &principal,
        Semester {
            code: req.code,
            year: req.year,
            term: req.term,
            start_date: req.start_date,
            end_date: req.end_date,
        },
    )?;
    Ok(Json(semester))
}

/// `GET /api/v1/semesters` (admin).
pub async fn list_semesters_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<SemesterListResponse>> {
    let semesters = state.services.semesters().list(&principal)?;
    Ok(Json(SemesterListResponse { semesters }))
}
