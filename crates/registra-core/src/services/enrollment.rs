//! Enrollment workflow: the two-stage approval state machine.
//!
//! `pending_instructor → pending_faculty_advisor → enrolled`, with
//! `rejected` reachable from either pending state. Every transition loads
//! the row inside the transaction and re-checks ownership there; routing
//! never grants authority.

use std::sync::Arc;

use tracing::info;

use registra_store::{
    Connection, EnrollmentDetail, EnrollmentRequest, RegistryStore, enrollments, fees, offerings,
    users,
};
use registra_types::{
    Decision, Enrollment, EnrollmentCategory, EnrollmentStatus, OfferingStatus, Principal, Role,
    new_id, now,
};

use crate::capability::acting_user;
use crate::error::{DomainError, Result};

#[derive(Clone)]
pub struct EnrollmentWorkflow {
    store: Arc<RegistryStore>,
}

impl EnrollmentWorkflow {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Request enrollment in an offering for the calling student.
    ///
    /// Guards, all inside one transaction: the offering exists and is
    /// `active`, and fees are paid for its semester. The unique
    /// `(student, offering)` constraint settles concurrent calls; the loser
    /// gets `Conflict`. A row rejected earlier blocks re-registration the
    /// same way.
    pub fn register(&self, principal: &Principal, offering_id: &str) -> Result<Enrollment> {
        let student_id = acting_user(principal, Role::Student)?;

        let enrollment = self.store.with_transaction(|conn| {
            let offering = offerings::get(conn, offering_id)?.ok_or_else(|| {
                DomainError::NotFound(format!("offering {offering_id} not found"))
            })?;

            if offering.status != OfferingStatus::Active {
                return Err(DomainError::InvalidState(format!(
                    "offering is {}, registration requires active",
                    offering.status
                )));
            }
            if !fees::is_paid(conn, student_id, &offering.semester_code)? {
                return Err(DomainError::InvalidState(format!(
                    "fees not paid for semester {}",
                    offering.semester_code
                )));
            }

            let enrollment = Enrollment {
                id: new_id(),
                student_id: student_id.to_string(),
                offering_id: offering_id.to_string(),
                status: EnrollmentStatus::PendingInstructor,
                category: EnrollmentCategory::Elective,
                grade: None,
                created_at: now(),
            };
            enrollments::insert(conn, &enrollment)?;
            Ok(enrollment)
        })?;

        info!(
            enrollment_id = %enrollment.id,
            offering_id,
            "Enrollment requested"
        );
        Ok(enrollment)
    }

    /// First approval stage. The caller must be the instructor of the
    /// enrollment's offering; the row must still be `pending_instructor`.
    pub fn instructor_decide(
        &self,
        principal: &Principal,
        enrollment_id: &str,
        decision: Decision,
    ) -> Result<Enrollment> {
        let instructor_id = acting_user(principal, Role::Faculty)?;

        let enrollment = self.store.with_transaction(|conn| {
            let mut enrollment = load(conn, enrollment_id)?;
            let offering = offerings::get(conn, &enrollment.offering_id)?.ok_or_else(|| {
                DomainError::NotFound(format!("offering {} not found", enrollment.offering_id))
            })?;

            if offering.instructor_id != instructor_id {
                return Err(DomainError::Unauthorized(
                    "enrollment belongs to another instructor's offering".to_string(),
                ));
            }
            if enrollment.status != EnrollmentStatus::PendingInstructor {
                return Err(DomainError::InvalidState(format!(
                    "enrollment is {}, instructor decision requires pending_instructor",
                    enrollment.status
                )));
            }

            enrollment.status = match decision {
                Decision::Approve => EnrollmentStatus::PendingFacultyAdvisor,
                Decision::Reject => EnrollmentStatus::Rejected,
            };
            enrollments::set_status(conn, enrollment_id, enrollment.status)?;
            Ok(enrollment)
        })?;

        info!(enrollment_id, status = %enrollment.status, "Instructor decision applied");
        Ok(enrollment)
    }

    /// Final approval stage. The caller must be the advisor assigned to the
    /// enrollment's student; the row must be `pending_faculty_advisor`. An
    /// enrollment still sitting with the instructor fails with
    /// `InvalidState`, never a silent pass.
    pub fn advisor_decide(
        &self,
        principal: &Principal,
        enrollment_id: &str,
        decision: Decision,
    ) -> Result<Enrollment> {
        let advisor_id = acting_user(principal, Role::Faculty)?;

        let enrollment = self.store.with_transaction(|conn| {
            let mut enrollment = load(conn, enrollment_id)?;
            let profile = users::student_profile(conn, &enrollment.student_id)?.ok_or_else(|| {
                DomainError::NotFound(format!(
                    "student profile for {} not found",
                    enrollment.student_id
                ))
            })?;

            if profile.advisor_id.as_deref() != Some(advisor_id) {
                return Err(DomainError::Unauthorized(
                    "caller is not the student's assigned advisor".to_string(),
                ));
            }
            if enrollment.status != EnrollmentStatus::PendingFacultyAdvisor {
                return Err(DomainError::InvalidState(format!(
                    "enrollment is {}, advisor decision requires pending_faculty_advisor",
                    enrollment.status
                )));
            }

            enrollment.status = match decision {
                Decision::Approve => EnrollmentStatus::Enrolled,
                Decision::Reject => EnrollmentStatus::Rejected,
            };
            enrollments::set_status(conn, enrollment_id, enrollment.status)?;
            Ok(enrollment)
        })?;

        info!(enrollment_id, status = %enrollment.status, "Advisor decision applied");
        Ok(enrollment)
    }

    /// Attach a grade to an enrolled record. Only the offering's instructor
    /// may grade, and only while the offering is not `completed`.
    pub fn set_grade(
        &self,
        principal: &Principal,
        enrollment_id: &str,
        grade: &str,
    ) -> Result<Enrollment> {
        let instructor_id = acting_user(principal, Role::Faculty)?;
        if grade.trim().is_empty() {
            return Err(DomainError::Validation("grade is required".to_string()));
        }

        let enrollment = self.store.with_transaction(|conn| {
            let mut enrollment = load(conn, enrollment_id)?;
            let offering = offerings::get(conn, &enrollment.offering_id)?.ok_or_else(|| {
                DomainError::NotFound(format!("offering {} not found", enrollment.offering_id))
            })?;

            if offering.instructor_id != instructor_id {
                return Err(DomainError::Unauthorized(
                    "enrollment belongs to another instructor's offering".to_string(),
                ));
            }
            if offering.status == OfferingStatus::Completed {
                return Err(DomainError::InvalidState(
                    "offering is completed, grades are locked".to_string(),
                ));
            }
            if enrollment.status != EnrollmentStatus::Enrolled {
                return Err(DomainError::InvalidState(format!(
                    "enrollment is {}, grading requires enrolled",
                    enrollment.status
                )));
            }

            enrollments::set_grade(conn, enrollment_id, grade)?;
            enrollment.grade = Some(grade.to_string());
            Ok(enrollment)
        })?;

        info!(enrollment_id, grade, "Grade recorded");
        Ok(enrollment)
    }

    /// The calling student's enrollments with course context.
    pub fn my_enrollments(&self, principal: &Principal) -> Result<Vec<EnrollmentDetail>> {
        let student_id = acting_user(principal, Role::Student)?;
        self.store
            .with_conn(|conn| enrollments::list_by_student(conn, student_id))
            .map_err(DomainError::from)
    }

    /// Requests awaiting the calling instructor's decision.
    pub fn instructor_requests(&self, principal: &Principal) -> Result<Vec<EnrollmentRequest>> {
        let instructor_id = acting_user(principal, Role::Faculty)?;
        self.store
            .with_conn(|conn| enrollments::pending_for_instructor(conn, instructor_id))
            .map_err(DomainError::from)
    }

    /// Requests awaiting the calling advisor's decision.
    pub fn advisor_requests(&self, principal: &Principal) -> Result<Vec<EnrollmentRequest>> {
        let advisor_id = acting_user(principal, Role::Faculty)?;
        self.store
            .with_conn(|conn| enrollments::pending_for_advisor(conn, advisor_id))
            .map_err(DomainError::from)
    }
}

fn load(conn: &Connection, enrollment_id: &str) -> Result<Enrollment> {
    enrollments::get(conn, enrollment_id)?
        .ok_or_else(|| DomainError::NotFound(format!("enrollment {enrollment_id} not found")))
}
