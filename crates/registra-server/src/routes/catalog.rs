//! Course catalog endpoints.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use registra_types::{Course, Principal};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub ltp: String,
    pub credits: f64,
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<Course>,
}

/// `POST /api/v1/courses` (admin or faculty).
pub async fn create_course_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<Json<Course>> {
    let course = state.services.catalog().create_course(
        &principal,
        Course {
            code: req.code,
            title: req.title,
            ltp: req.ltp,
            credits: req.credits,
        },
    )?;
    Ok(Json(course))
}

/// `GET /api/v1/courses` (any authenticated caller).
pub async fn list_courses_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<CourseListResponse>> {
    let courses = state.services.catalog().list(&principal)?;
    Ok(Json(CourseListResponse { courses }))
}
