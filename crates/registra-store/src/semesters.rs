//! Semester reference data operations.

use rusqlite::{Connection, params};

use registra_types::Semester;

use crate::error::{Result, conflict_on_unique};

/// Insert a semester. `Conflict` if the code exists.
pub fn insert(conn: &Connection, semester: &Semester) -> Result<()> {
    conn.execute(
        "INSERT INTO semesters (code, year, term, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            semester.code,
            semester.year,
            semester.term,
            semester.start_date,
            semester.end_date
        ],
    )
    .map_err(|e| conflict_on_unique(e, "semester code already exists"))?;
    Ok(())
}

pub fn exists(conn: &Connection, code: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM semesters WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All semesters, most recent start date first.
pub fn list(conn: &Connection) -> Result<Vec<Semester>> {
    let mut stmt = conn.prepare(
        "SELECT code, year, term, start_date, end_date FROM semesters
         ORDER BY start_date DESC",
    )?;
    let iter = stmt.query_map([], |row| {
        Ok(Semester {
            code: row.get(0)?,
            year: row.get(1)?,
            term: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
        })
    })?;
    let mut semesters = Vec::new();
    for s in iter {
        semesters.push(s?);
    }
    Ok(semesters)
}
