//! User and profile operations.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use registra_types::{FacultyProfile, Id, Role, StudentProfile, User};

use crate::error::{Result, StoreError, conflict_on_unique};
use crate::rows::parse_dt;

/// Student list row with the advisor's name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub user_id: Id,
    pub name: String,
    pub email: String,
    pub entry_number: String,
    pub department: String,
    pub batch_year: i32,
    pub advisor_name: Option<String>,
}

/// Faculty list row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub user_id: Id,
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
}

/// Insert a user row. `Conflict` if the email or token is already taken.
pub fn insert(conn: &Connection, user: &User, api_token: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, role, api_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.name,
            user.email,
            user.role.as_str(),
            api_token,
            user.created_at.to_rfc3339()
        ],
    )
    .map_err(|e| conflict_on_unique(e, "email already registered"))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email, role, created_at FROM users WHERE id = ?1",
        params![id],
        row_to_user,
    )
    .optional()
    .map_err(StoreError::Database)
}

/// Resolve an API token to its user. Returns `None` for unknown tokens.
pub fn by_token(conn: &Connection, token: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email, role, created_at FROM users WHERE api_token = ?1",
        params![token],
        row_to_user,
    )
    .optional()
    .map_err(StoreError::Database)
}

/// Resolve an email to a user id, constrained to the given role.
pub fn id_by_email_and_role(conn: &Connection, email: &str, role: Role) -> Result<Option<Id>> {
    conn.query_row(
        "SELECT id FROM users WHERE email = ?1 AND role = ?2",
        params![email, role.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(StoreError::Database)
}

pub fn insert_student_profile(conn: &Connection, profile: &StudentProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO students (user_id, entry_number, department, batch_year, advisor_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            profile.user_id,
            profile.entry_number,
            profile.department,
            profile.batch_year,
            profile.advisor_id
        ],
    )
    .map_err(|e| conflict_on_unique(e, "entry number already registered"))?;
    Ok(())
}

pub fn insert_faculty_profile(conn: &Connection, profile: &FacultyProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO faculty (user_id, department, designation) VALUES (?1, ?2, ?3)",
        params![profile.user_id, profile.department, profile.designation],
    )
    .map_err(|e| conflict_on_unique(e, "faculty profile already exists"))?;
    Ok(())
}

pub fn student_profile(conn: &Connection, user_id: &str) -> Result<Option<StudentProfile>> {
    conn.query_row(
        "SELECT user_id, entry_number, department, batch_year, advisor_id
         FROM students WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(StudentProfile {
                user_id: row.get(0)?,
                entry_number: row.get(1)?,
                department: row.get(2)?,
                batch_year: row.get(3)?,
                advisor_id: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(StoreError::Database)
}

/// Bind a student (by entry number) to an advisor. Overwrites any previous
/// binding. Returns `false` if no student row matched.
pub fn set_advisor(conn: &Connection, entry_number: &str, advisor_id: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE students SET advisor_id = ?1 WHERE entry_number = ?2",
        params![advisor_id, entry_number],
    )?;
    Ok(updated > 0)
}

/// User ids of students whose `(batch_year, department)` intersects the
/// given sets. Empty criteria match nothing.
pub fn students_matching(
    conn: &Connection,
    batches: &[i32],
    departments: &[String],
) -> Result<Vec<Id>> {
    if batches.is_empty() || departments.is_empty() {
        return Ok(Vec::new());
    }

    let batch_marks = vec!["?"; batches.len()].join(", ");
    let dept_marks = vec!["?"; departments.len()].join(", ");
    let sql = format!(
        "SELECT user_id FROM students
         WHERE batch_year IN ({batch_marks}) AND department IN ({dept_marks})
         ORDER BY user_id"
    );

    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    for b in batches {
        values.push(Box::new(*b));
    }
    for d in departments {
        values.push(Box::new(d.clone()));
    }
    let bind: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let iter = stmt.query_map(bind.as_slice(), |row| row.get(0))?;
    let mut ids = Vec::new();
    for id in iter {
        ids.push(id?);
    }
    Ok(ids)
}

/// All students with their advisor's name, ordered by entry number.
pub fn list_students(conn: &Connection) -> Result<Vec<StudentRecord>> {
    let mut stmt = conn.prepare(
        "SELECT s.user_id, u.name, u.email, s.entry_number, s.department, s.batch_year,
                a.name
         FROM students s
         JOIN users u ON s.user_id = u.id
         LEFT JOIN users a ON s.advisor_id = a.id
         ORDER BY s.entry_number ASC",
    )?;
    let iter = stmt.query_map([], |row| {
        Ok(StudentRecord {
            user_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            entry_number: row.get(3)?,
            department: row.get(4)?,
            batch_year: row.get(5)?,
            advisor_name: row.get(6)?,
        })
    })?;
    let mut records = Vec::new();
    for r in iter {
        records.push(r?);
    }
    Ok(records)
}

/// All faculty, ordered by name.
pub fn list_faculty(conn: &Connection) -> Result<Vec<FacultyRecord>> {
    let mut stmt = conn.prepare(
        "SELECT f.user_id, u.name, u.email, f.department, f.designation
         FROM faculty f
         JOIN users u ON f.user_id = u.id
         ORDER BY u.name ASC",
    )?;
    let iter = stmt.query_map([], |row| {
        Ok(FacultyRecord {
            user_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            department: row.get(3)?,
            designation: row.get(4)?,
        })
    })?;
    let mut records = Vec::new();
    for r in iter {
        records.push(r?);
    }
    Ok(records)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: role.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
        created_at: parse_dt(&row.get::<_, String>(4)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryStore;
    use crate::testutil::{make_faculty, make_student};
    use registra_types::new_id;

    #[test]
    fn test_insert_and_fetch_by_token() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let id = make_student(conn, "Asha Rao", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let user = by_token(conn, &format!("tok-{id}"))?.unwrap();
                assert_eq!(user.id, id);
                assert_eq!(user.role, Role::Student);
                assert!(by_token(conn, "no-such-token")?.is_none());
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                make_student(conn, "Asha Rao", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let dup = User {
                    id: new_id(),
                    name: "Imposter".to_string(),
                    email: "asha@example.edu".to_string(),
                    role: Role::Student,
                    created_at: registra_types::now(),
                };
                let err = insert(conn, &dup, "other-token").unwrap_err();
                assert!(matches!(err, StoreError::Conflict(_)));
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_advisor_assignment_idempotent() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                make_student(conn, "Asha Rao", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let advisor = make_faculty(conn, "Prof. Iyer", "iyer@example.edu", "CSE");

                assert!(set_advisor(conn, "2023CSB1001", &advisor)?);
                // Reassignment overwrites
                assert!(set_advisor(conn, "2023CSB1001", &advisor)?);
                assert!(!set_advisor(conn, "9999XXX0000", &advisor)?);

                let students = list_students(conn)?;
                assert_eq!(students.len(), 1);
                assert_eq!(students[0].advisor_name.as_deref(), Some("Prof. Iyer"));
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_students_matching() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let a = make_student(conn, "A", "a@example.edu", "2023CSB1001", "CSE", 2023);
                let b = make_student(conn, "B", "b@example.edu", "2023EEB1002", "EE", 2023);
                let c = make_student(conn, "C", "c@example.edu", "2024CSB1003", "CSE", 2024);

                let hits =
                    students_matching(conn, &[2023], &["CSE".to_string()])?;
                assert_eq!(hits, vec![a.clone()].into_iter().collect::<Vec<_>>());

                let hits = students_matching(
                    conn,
                    &[2023, 2024],
                    &["CSE".to_string(), "EE".to_string()],
                )?;
                assert_eq!(hits.len(), 3);
                for id in [&a, &b, &c] {
                    assert!(hits.contains(id));
                }

                assert!(students_matching(conn, &[], &["CSE".to_string()])?.is_empty());
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_faculty_email_lookup_checks_role() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                make_student(conn, "Asha Rao", "asha@example.edu", "2023CSB1001", "CSE", 2023);
                let advisor = make_faculty(conn, "Prof. Iyer", "iyer@example.edu", "CSE");

                assert_eq!(
                    id_by_email_and_role(conn, "iyer@example.edu", Role::Faculty)?,
                    Some(advisor)
                );
                // A student email does not resolve as faculty
                assert!(
                    id_by_email_and_role(conn, "asha@example.edu", Role::Faculty)?.is_none()
                );
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }
}
