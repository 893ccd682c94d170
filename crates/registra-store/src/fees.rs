//! Fee payment operations.

use rusqlite::{Connection, OptionalExtension, params};

use registra_types::FeePayment;

use crate::error::{Result, StoreError, conflict_on_unique};
use crate::rows::parse_dt;

/// Record a payment. `Conflict` if the student already paid for the
/// semester.
pub fn insert(conn: &Connection, payment: &FeePayment) -> Result<()> {
    conn.execute(
        "INSERT INTO fee_payments (student_id, semester_code, amount, transaction_ref, paid_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            payment.student_id,
            payment.semester_code,
            payment.amount,
            payment.transaction_ref,
            payment.paid_at.to_rfc3339()
        ],
    )
    .map_err(|e| conflict_on_unique(e, "fees already paid for this semester"))?;
    Ok(())
}

/// Whether a payment row exists for `(student, semester)`.
pub fn is_paid(conn: &Connection, student_id: &str, semester_code: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM fee_payments WHERE student_id = ?1 AND semester_code = ?2",
        params![student_id, semester_code],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get(conn: &Connection, student_id: &str, semester_code: &str) -> Result<Option<FeePayment>> {
    conn.query_row(
        "SELECT student_id, semester_code, amount, transaction_ref, paid_at
         FROM fee_payments WHERE student_id = ?1 AND semester_code = ?2",
        params![student_id, semester_code],
        |row| {
            Ok(FeePayment {
                student_id: row.get(0)?,
                semester_code: row.get(1)?,
                amount: row.get(2)?,
                transaction_ref: row.get(3)?,
                paid_at: parse_dt(&row.get::<_, String>(4)?),
            })
        },
    )
    .optional()
    .map_err(StoreError::Database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryStore;
    use crate::testutil::{make_semester, make_student};
    use registra_types::now;

    #[test]
    fn test_payment_presence_and_uniqueness() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let student =
                    make_student(conn, "Asha", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                make_semester(conn, "2026-W");

                assert!(!is_paid(conn, &student, "2026-W")?);

                let payment = FeePayment {
                    student_id: student.clone(),
                    semester_code: "2026-W".to_string(),
                    amount: 50_000,
                    transaction_ref: "TXN_123456".to_string(),
                    paid_at: now(),
                };
                insert(conn, &payment)?;
                assert!(is_paid(conn, &student, "2026-W")?);
                assert!(!is_paid(conn, &student, "2025-M")?);

                // One payment per (student, semester): the loser of a race
                // gets Conflict, never a second row
                let err = insert(conn, &payment).unwrap_err();
                assert!(matches!(err, StoreError::Conflict(_)));

                let fetched = get(conn, &student, "2026-W")?.unwrap();
                assert_eq!(fetched.amount, 50_000);
                assert_eq!(fetched.transaction_ref, "TXN_123456");
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }
}
