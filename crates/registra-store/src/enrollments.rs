//! Enrollment operations.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use registra_types::{Enrollment, EnrollmentStatus, Id};

use crate::error::{Result, StoreError, conflict_on_unique};
use crate::rows::parse_dt;

/// Row in an instructor's or advisor's pending-request queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub id: Id,
    pub entry_number: String,
    pub student_name: String,
    pub course_code: String,
    pub title: String,
}

/// Student view of an own enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDetail {
    pub id: Id,
    pub offering_id: Id,
    pub status: EnrollmentStatus,
    pub category: registra_types::EnrollmentCategory,
    pub grade: Option<String>,
    pub course_code: String,
    pub title: String,
    pub credits: f64,
    pub slot: String,
    pub instructor: String,
}

/// Insert an enrollment row. `Conflict` if the student already holds a
/// record for the offering.
pub fn insert(conn: &Connection, enrollment: &Enrollment) -> Result<()> {
    conn.execute(
        "INSERT INTO enrollments (id, student_id, offering_id, status, category, grade, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            enrollment.id,
            enrollment.student_id,
            enrollment.offering_id,
            enrollment.status.as_str(),
            enrollment.category.as_str(),
            enrollment.grade,
            enrollment.created_at.to_rfc3339()
        ],
    )
    .map_err(|e| conflict_on_unique(e, "enrollment already requested or granted"))?;
    Ok(())
}

/// Insert unless a record for `(student_id, offering_id)` already exists.
/// Returns whether a row was inserted. Used by the core fan-out so repeated
/// approvals stay idempotent.
pub fn insert_ignore(conn: &Connection, enrollment: &Enrollment) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO enrollments (id, student_id, offering_id, status, category, grade, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (student_id, offering_id) DO NOTHING",
        params![
            enrollment.id,
            enrollment.student_id,
            enrollment.offering_id,
            enrollment.status.as_str(),
            enrollment.category.as_str(),
            enrollment.grade,
            enrollment.created_at.to_rfc3339()
        ],
    )?;
    Ok(inserted > 0)
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Enrollment>> {
    conn.query_row(
        "SELECT id, student_id, offering_id, status, category, grade, created_at
         FROM enrollments WHERE id = ?1",
        params![id],
        row_to_enrollment,
    )
    .optional()
    .map_err(StoreError::Database)
}

/// Update the status column. Returns `false` if no row matched.
pub fn set_status(conn: &Connection, id: &str, status: EnrollmentStatus) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE enrollments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(updated > 0)
}

/// Attach (or overwrite) a grade. Returns `false` if no row matched.
pub fn set_grade(conn: &Connection, id: &str, grade: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE enrollments SET grade = ?1 WHERE id = ?2",
        params![grade, id],
    )?;
    Ok(updated > 0)
}

/// A student's enrollments with offering/catalog/instructor context.
pub fn list_by_student(conn: &Connection, student_id: &str) -> Result<Vec<EnrollmentDetail>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.offering_id, e.status, e.category, e.grade,
                co.course_code, c.title, c.credits, co.slot, u.name
         FROM enrollments e
         JOIN course_offerings co ON e.offering_id = co.id
         JOIN course_catalog c ON co.course_code = c.code
         JOIN users u ON co.instructor_id = u.id
         WHERE e.student_id = ?1
         ORDER BY e.created_at DESC",
    )?;
    let iter = stmt.query_map(params![student_id], |row| {
        Ok((
            row.get::<_, Id>(0)?,
            row.get::<_, Id>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, f64>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, String>(9)?,
        ))
    })?;

    let mut details = Vec::new();
    for r in iter {
        let (id, offering_id, status, category, grade, course_code, title, credits, slot, instructor) =
            r?;
        details.push(EnrollmentDetail {
            id,
            offering_id,
            status: status.parse()?,
            category: category.parse()?,
            grade,
            course_code,
            title,
            credits,
            slot,
            instructor,
        });
    }
    Ok(details)
}

/// Requests sitting in `pending_instructor` for offerings taught by the
/// given instructor.
pub fn pending_for_instructor(
    conn: &Connection,
    instructor_id: &str,
) -> Result<Vec<EnrollmentRequest>> {
    query_requests(
        conn,
        "SELECT e.id, s.entry_number, u.name, c.code, c.title
         FROM enrollments e
         JOIN students s ON e.student_id = s.user_id
         JOIN users u ON s.user_id = u.id
         JOIN course_offerings co ON e.offering_id = co.id
         JOIN course_catalog c ON co.course_code = c.code
         WHERE co.instructor_id = ?1 AND e.status = 'pending_instructor'
         ORDER BY e.created_at ASC",
        instructor_id,
    )
}

/// Requests sitting in `pending_faculty_advisor` for advisees of the given
/// faculty member.
pub fn pending_for_advisor(conn: &Connection, advisor_id: &str) -> Result<Vec<EnrollmentRequest>> {
    query_requests(
        conn,
        "SELECT e.id, s.entry_number, u.name, c.code, c.title
         FROM enrollments e
         JOIN students s ON e.student_id = s.user_id
         JOIN users u ON s.user_id = u.id
         JOIN course_offerings co ON e.offering_id = co.id
         JOIN course_catalog c ON co.course_code = c.code
         WHERE s.advisor_id = ?1 AND e.status = 'pending_faculty_advisor'
         ORDER BY e.created_at ASC",
        advisor_id,
    )
}

fn query_requests(conn: &Connection, sql: &str, caller_id: &str) -> Result<Vec<EnrollmentRequest>> {
    let mut stmt = conn.prepare(sql)?;
    let iter = stmt.query_map(params![caller_id], |row| {
        Ok(EnrollmentRequest {
            id: row.get(0)?,
            entry_number: row.get(1)?,
            student_name: row.get(2)?,
            course_code: row.get(3)?,
            title: row.get(4)?,
        })
    })?;
    let mut requests = Vec::new();
    for r in iter {
        requests.push(r?);
    }
    Ok(requests)
}

fn row_to_enrollment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Enrollment> {
    let status: String = row.get(3)?;
    let category: String = row.get(4)?;
    Ok(Enrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        offering_id: row.get(2)?,
        status: status.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
        category: category.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
        grade: row.get(5)?,
        created_at: parse_dt(&row.get::<_, String>(6)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryStore;
    use crate::testutil::{make_course, make_faculty, make_offering, make_semester, make_student};
    use crate::users;
    use registra_types::{EnrollmentCategory, OfferingStatus, new_id, now};

    fn pending(student_id: &str, offering_id: &str) -> Enrollment {
        Enrollment {
            id: new_id(),
            student_id: student_id.to_string(),
            offering_id: offering_id.to_string(),
            status: EnrollmentStatus::PendingInstructor,
            category: EnrollmentCategory::Elective,
            grade: None,
            created_at: now(),
        }
    }

    #[test]
    fn test_unique_pair_conflicts() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let student =
                    make_student(conn, "Asha", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let instructor = make_faculty(conn, "Prof. Iyer", "iyer@example.edu", "CSE");
                make_semester(conn, "2026-W");
                make_course(conn, "CS201", "Data Structures");
                let offering =
                    make_offering(conn, "CS201", "2026-W", &instructor, OfferingStatus::Active);

                insert(conn, &pending(&student, &offering.id))?;
                let err = insert(conn, &pending(&student, &offering.id)).unwrap_err();
                assert!(matches!(err, StoreError::Conflict(_)));

                // insert_ignore swallows the duplicate instead
                assert!(!insert_ignore(conn, &pending(&student, &offering.id))?);
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_status_and_grade_updates() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let student =
                    make_student(conn, "Asha", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let instructor = make_faculty(conn, "Prof. Iyer", "iyer@example.edu", "CSE");
                make_semester(conn, "2026-W");
                make_course(conn, "CS201", "Data Structures");
                let offering =
                    make_offering(conn, "CS201", "2026-W", &instructor, OfferingStatus::Active);

                let e = pending(&student, &offering.id);
                insert(conn, &e)?;

                assert!(set_status(conn, &e.id, EnrollmentStatus::Enrolled)?);
                assert!(set_grade(conn, &e.id, "A")?);
                assert!(!set_status(conn, "missing", EnrollmentStatus::Enrolled)?);

                let fetched = get(conn, &e.id)?.unwrap();
                assert_eq!(fetched.status, EnrollmentStatus::Enrolled);
                assert_eq!(fetched.grade.as_deref(), Some("A"));
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_request_queues() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let student =
                    make_student(conn, "Asha", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let instructor = make_faculty(conn, "Prof. Iyer", "iyer@example.edu", "CSE");
                let advisor = make_faculty(conn, "Prof. Nair", "nair@example.edu", "CSE");
                make_semester(conn, "2026-W");
                make_course(conn, "CS201", "Data Structures");
                let offering =
                    make_offering(conn, "CS201", "2026-W", &instructor, OfferingStatus::Active);
                users::set_advisor(conn, "2023CSB1001", &advisor)?;

                let e = pending(&student, &offering.id);
                insert(conn, &e)?;

                let queue = pending_for_instructor(conn, &instructor)?;
                assert_eq!(queue.len(), 1);
                assert_eq!(queue[0].entry_number, "2023CSB1001");
                assert!(pending_for_advisor(conn, &advisor)?.is_empty());

                set_status(conn, &e.id, EnrollmentStatus::PendingFacultyAdvisor)?;
                assert!(pending_for_instructor(conn, &instructor)?.is_empty());
                assert_eq!(pending_for_advisor(conn, &advisor)?.len(), 1);

                let mine = list_by_student(conn, &student)?;
                assert_eq!(mine.len(), 1);
                assert_eq!(mine[0].title, "Data Structures");
                assert_eq!(mine[0].status, EnrollmentStatus::PendingFacultyAdvisor);
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }
}
