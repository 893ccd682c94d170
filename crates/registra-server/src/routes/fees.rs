//! Fee payment endpoints.
//!
//! Both routes default to the configured current semester when the body
//! or query omits one.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use registra_types::{FeePayment, Principal};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PayFeesRequest {
    #[serde(default)]
    pub semester_code: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeeStatusQuery {
    pub semester_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeeStatusResponse {
    pub semester_code: String,
    pub paid: bool,
}

/// `POST /api/v1/fees` (student).
pub async fn pay_fees_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<PayFeesRequest>,
) -> Result<Json<FeePayment>> {
    let semester_code = req
        .semester_code
        .unwrap_or_else(|| state.config.current_semester.clone());
    let payment = state
        .services
        .fees()
        .record_payment(&principal, &semester_code, req.amount)?;
    Ok(Json(payment))
}

/// `GET /api/v1/fees/status` (student).
pub async fn fee_status_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<FeeStatusQuery>,
) -> Result<Json<FeeStatusResponse>> {
    let semester_code = query
        .semester_code
        .unwrap_or_else(|| state.config.current_semester.clone());
    let paid = state.services.fees().status(&principal, &semester_code)?;
    Ok(Json(FeeStatusResponse {
        semester_code,
        paid,
    }))
}
