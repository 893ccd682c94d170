//! Fee ledger service.
//!
//! A payment row per `(student, semester)` is the sole fee-paid signal;
//! registration is gated on it.

use std::sync::Arc;

use tracing::info;

use registra_store::{RegistryStore, fees, semesters};
use registra_types::{FeePayment, Principal, Role, now};

use crate::capability::acting_user;
use crate::error::{DomainError, Result};

/// Fee amount charged when the caller does not specify one.
pub const DEFAULT_FEE_AMOUNT: i64 = 50_000;

#[derive(Clone)]
pub struct FeeLedger {
    store: Arc<RegistryStore>,
}

impl FeeLedger {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Record a payment for the calling student. `Conflict` if a payment for
    /// the semester already exists; two concurrent calls race safely on the
    /// primary key and exactly one wins.
    pub fn record_payment(
        &self,
        principal: &Principal,
        semester_code: &str,
        amount: Option<i64>,
    ) -> Result<FeePayment> {
        let student_id = acting_user(principal, Role::Student)?;
        let amount = amount.unwrap_or(DEFAULT_FEE_AMOUNT);
        if amount <= 0 {
            return Err(DomainError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let payment = FeePayment {
            student_id: student_id.to_string(),
            semester_code: semester_code.to_string(),
            amount,
            transaction_ref: transaction_ref(),
            paid_at: now(),
        };

        self.store.with_transaction(|conn| {
            if !semesters::exists(conn, semester_code)? {
                return Err(DomainError::NotFound(format!(
                    "semester {semester_code} not found"
                )));
            }
            fees::insert(conn, &payment)?;
            Ok(())
        })?;

        info!(
            student_id = %payment.student_id,
            semester_code = %payment.semester_code,
            transaction_ref = %payment.transaction_ref,
            "Fee payment recorded"
        );
        Ok(payment)
    }

    /// Pure existence check for a payment row.
    pub fn is_paid(&self, student_id: &str, semester_code: &str) -> Result<bool> {
        self.store
            .with_conn(|conn| fees::is_paid(conn, student_id, semester_code))
            .map_err(DomainError::from)
    }

    /// Fee status for the calling student.
    pub fn status(&self, principal: &Principal, semester_code: &str) -> Result<bool> {
        let student_id = acting_user(principal, Role::Student)?;
        self.is_paid(student_id, semester_code)
    }
}

fn transaction_ref() -> String {
    let n = (uuid::Uuid::new_v4().as_u128() % 1_000_000) as u32;
    format!("TXN_{n:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testfx::Fixture;

    #[test]
    fn test_transaction_ref_shape() {
        let r = transaction_ref();
        assert!(r.starts_with("TXN_"));
        assert_eq!(r.len(), 10);
        assert!(r[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_payment_defaults_and_uniqueness() {
        let fx = Fixture::new();
        let student = fx.student("asha@example.edu", "2023CSB1001", "CSE", 2023);

        let err = fx
            .services
            .fees()
            .record_payment(&student, "1999-X", None)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let payment = fx
            .services
            .fees()
            .record_payment(&student, "2026-W", None)
            .unwrap();
        assert_eq!(payment.amount, DEFAULT_FEE_AMOUNT);
        assert!(fx.services.fees().status(&student, "2026-W").unwrap());

        let err = fx
            .services
            .fees()
            .record_payment(&student, "2026-W", Some(10_000))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
