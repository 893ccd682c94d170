//! Offering manager: floating, admin decisions with core fan-out,
//! completion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use registra_store::{
    ActiveOffering, OfferingSummary, PendingOffering, RegistryStore, catalog, enrollments,
    offerings, semesters, users,
};
use registra_types::{
    Decision, Enrollment, EnrollmentCategory, EnrollmentStatus, Offering, OfferingStatus,
    Principal, Role, new_id, now,
};

use crate::capability::{acting_user, require_admin, require_role};
use crate::error::{DomainError, Result};

/// Input for floating an offering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatRequest {
    pub course_code: String,
    pub semester_code: String,
    pub slot: String,
    pub seat_limit: i64,
    #[serde(default)]
    pub allowed_batches: Vec<i32>,
    #[serde(default)]
    pub allowed_departments: Vec<String>,
    #[serde(default)]
    pub core_batches: Vec<i32>,
    #[serde(default)]
    pub core_departments: Vec<String>,
}

/// Result of an admin decision on an offering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub offering: Offering,
    /// Core enrollments created by approval fan-out.
    pub auto_enrolled: usize,
}

#[derive(Clone)]
pub struct OfferingManager {
    store: Arc<RegistryStore>,
}

impl OfferingManager {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Propose an offering for the calling instructor. `Conflict` if the
    /// instructor already offers the course in the semester.
    pub fn float(&self, principal: &Principal, request: FloatRequest) -> Result<Offering> {
        let instructor_id = acting_user(principal, Role::Faculty)?;

        if request.slot.trim().is_empty() {
            return Err(DomainError::Validation("slot is required".to_string()));
        }
        if request.seat_limit <= 0 {
            return Err(DomainError::Validation(
                "seat limit must be positive".to_string(),
            ));
        }

        let offering = Offering {
            id: new_id(),
            course_code: request.course_code,
            semester_code: request.semester_code,
            instructor_id: instructor_id.to_string(),
            slot: request.slot,
            seat_limit: request.seat_limit,
            status: OfferingStatus::Proposed,
            allowed_batches: request.allowed_batches,
            allowed_departments: request.allowed_departments,
            core_batches: request.core_batches,
            core_departments: request.core_departments,
            created_at: now(),
        };

        self.store.with_transaction(|conn| {
            if !catalog::exists(conn, &offering.course_code)? {
                return Err(DomainError::NotFound(format!(
                    "course {} not in catalog",
                    offering.course_code
                )));
            }
            if !semesters::exists(conn, &offering.semester_code)? {
                return Err(DomainError::NotFound(format!(
                    "semester {} not found",
                    offering.semester_code
                )));
            }
            offerings::insert(conn, &offering)?;
            Ok(())
        })?;

        info!(
            offering_id = %offering.id,
            course_code = %offering.course_code,
            semester_code = %offering.semester_code,
            "Offering floated"
        );
        Ok(offering)
    }

    /// Approve or reject a proposed offering.
    ///
    /// Approval with non-empty core criteria fans out `enrolled`/`core`
    /// rows for every matching student, skipping students who already hold
    /// an enrollment for the offering. The status update and the whole
    /// fan-out commit as one transaction; repeating the call fails with
    /// `InvalidState` and changes nothing.
    pub fn decide(
        &self,
        principal: &Principal,
        offering_id: &str,
        decision: Decision,
    ) -> Result<DecisionOutcome> {
        require_admin(principal)?;

        let outcome = self.store.with_transaction(|conn| {
            let mut offering = offerings::get(conn, offering_id)?.ok_or_else(|| {
                DomainError::NotFound(format!("offering {offering_id} not found"))
            })?;

            if offering.status != OfferingStatus::Proposed {
                return Err(DomainError::InvalidState(format!(
                    "offering is {}, decision requires proposed",
                    offering.status
                )));
            }

            offering.status = match decision {
                Decision::Approve => OfferingStatus::Active,
                Decision::Reject => OfferingStatus::Rejected,
            };
            offerings::set_status(conn, offering_id, offering.status)?;

            let mut auto_enrolled = 0;
            if decision == Decision::Approve && offering.has_core_criteria() {
                let students = users::students_matching(
                    conn,
                    &offering.core_batches,
                    &offering.core_departments,
                )?;
                for student_id in students {
                    let inserted = enrollments::insert_ignore(
                        conn,
                        &Enrollment {
                            id: new_id(),
                            student_id,
                            offering_id: offering_id.to_string(),
                            status: EnrollmentStatus::Enrolled,
                            category: EnrollmentCategory::Core,
                            grade: None,
                            created_at: now(),
                        },
                    )?;
                    if inserted {
                        auto_enrolled += 1;
                    }
                }
            }

            Ok(DecisionOutcome {
                offering,
                auto_enrolled,
            })
        })?;

        info!(
            offering_id,
            status = %outcome.offering.status,
            auto_enrolled = outcome.auto_enrolled,
            "Offering decision applied"
        );
        Ok(outcome)
    }

    /// Mark an active offering completed. Only the recorded instructor may
    /// complete it; a mismatch is `Unauthorized`, never a silent no-op.
    pub fn complete(&self, principal: &Principal, offering_id: &str) -> Result<Offering> {
        let instructor_id = acting_user(principal, Role::Faculty)?;

        let offering = self.store.with_transaction(|conn| {
            let mut offering = offerings::get(conn, offering_id)?.ok_or_else(|| {
                DomainError::NotFound(format!("offering {offering_id} not found"))
            })?;

            if offering.instructor_id != instructor_id {
                return Err(DomainError::Unauthorized(
                    "offering belongs to another instructor".to_string(),
                ));
            }
            if offering.status != OfferingStatus::Active {
                return Err(DomainError::InvalidState(format!(
                    "offering is {}, completion requires active",
                    offering.status
                )));
            }

            offering.status = OfferingStatus::Completed;
            offerings::set_status(conn, offering_id, offering.status)?;
            Ok(offering)
        })?;

        info!(offering_id, "Offering completed");
        Ok(offering)
    }

    /// Active offerings open for registration (student view).
    pub fn list_active(&self, principal: &Principal) -> Result<Vec<ActiveOffering>> {
        require_role(principal, Role::Student)?;
        self.store
            .with_conn(|conn| offerings::list_active(conn))
            .map_err(DomainError::from)
    }

    /// The calling instructor's offerings with enrolled counts.
    pub fn my_offerings(&self, principal: &Principal) -> Result<Vec<OfferingSummary>> {
        let instructor_id = acting_user(principal, Role::Faculty)?;
        self.store
            .with_conn(|conn| offerings::list_by_instructor(conn, instructor_id))
            .map_err(DomainError::from)
    }

    /// Proposed offerings awaiting an admin decision.
    pub fn pending(&self, principal: &Principal) -> Result<Vec<PendingOffering>> {
        require_admin(principal)?;
        self.store
            .with_conn(|conn| offerings::list_pending(conn))
            .map_err(DomainError::from)
    }
}
