//! Course catalog operations. Catalog entries are immutable once created.

use rusqlite::{Connection, params};

use registra_types::Course;

use crate::error::{Result, conflict_on_unique};

/// Insert a catalog entry. `Conflict` if the course code exists.
pub fn insert(conn: &Connection, course: &Course) -> Result<()> {
    conn.execute(
        "INSERT INTO course_catalog (code, title, ltp, credits) VALUES (?1, ?2, ?3, ?4)",
        params![course.code, course.title, course.ltp, course.credits],
    )
    .map_err(|e| conflict_on_unique(e, "course code already exists"))?;
    Ok(())
}

pub fn exists(conn: &Connection, code: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM course_catalog WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All catalog entries ordered by course code.
pub fn list(conn: &Connection) -> Result<Vec<Course>> {
    let mut stmt =
        conn.prepare("SELECT code, title, ltp, credits FROM course_catalog ORDER BY code")?;
    let iter = stmt.query_map([], |row| {
        Ok(Course {
            code: row.get(0)?,
            title: row.get(1)?,
            ltp: row.get(2)?,
            credits: row.get(3)?,
        })
    })?;
    let mut courses = Vec::new();
    for c in iter {
        courses.push(c?);
    }
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryStore;
    use crate::error::StoreError;

    #[test]
    fn test_insert_list_and_duplicate() {
        let store = RegistryStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                let course = Course {
                    code: "CS201".to_string(),
                    title: "Data Structures".to_string(),
                    ltp: "3-1-2".to_string(),
                    credits: 4.5,
                };
                insert(conn, &course)?;
                assert!(exists(conn, "CS201")?);
                assert!(!exists(conn, "CS999")?);

                let err = insert(conn, &course).unwrap_err();
                assert!(matches!(err, StoreError::Conflict(_)));

                let all = list(conn)?;
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].title, "Data Structures");
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }
}
