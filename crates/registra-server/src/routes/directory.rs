//! Account management endpoints: students, faculty, advisor assignment.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use registra_core::{CreatedUser, NewFaculty, NewStudent};
use registra_store::{FacultyRecord, StudentRecord};
use registra_types::Principal;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Returned exactly once; the server keeps only the stored copy.
    pub api_token: String,
}

impl From<CreatedUser> for CreatedUserResponse {
    fn from(created: CreatedUser) -> Self {
        Self {
            id: created.user.id,
            name: created.user.name,
            email: created.user.email,
            role: created.user.role.to_string(),
            api_token: created.api_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<StudentRecord>,
}

#[derive(Debug, Serialize)]
pub struct FacultyListResponse {
    pub faculty: Vec<FacultyRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AssignAdvisorRequest {
    pub student_entry_num: String,
    pub faculty_email: String,
}

#[derive(Debug, Serialize)]
pub struct AssignAdvisorResponse {
    pub assigned: bool,
}

/// `POST /api/v1/students` (admin).
pub async fn create_student_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewStudent>,
) -> Result<Json<CreatedUserResponse>> {
    let created = state.services.directory().add_student(&principal, req)?;
    Ok(Json(created.into()))
}

/// `GET /api/v1/students` (admin).
pub async fn list_students_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StudentListResponse>> {
    let students = state.services.directory().list_students(&principal)?;
    Ok(Json(StudentListResponse { students }))
}

/// `POST /api/v1/faculty` (admin).
pub async fn create_faculty_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewFaculty>,
) -> Result<Json<CreatedUserResponse>> {
    let created = state.services.directory().add_faculty(&principal, req)?;
    Ok(Json(created.into()))
}

/// `GET /api/v1/faculty` (admin).
pub async fn list_faculty_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<FacultyListResponse>> {
    let faculty = state.services.directory().list_faculty(&principal)?;
    Ok(Json(FacultyListResponse { faculty }))
}

/// `POST /api/v1/advisors` (admin).
pub async fn assign_advisor_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<AssignAdvisorRequest>,
) -> Result<Json<AssignAdvisorResponse>> {
    state
        .services
        .advisors()
        .assign(&principal, &req.student_entry_num, &req.faculty_email)?;
    Ok(Json(AssignAdvisorResponse { assigned: true }))
}
