//! Course offering operations.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use registra_types::{Id, Offering, OfferingStatus};

use crate::error::{Result, StoreError, conflict_on_unique};
use crate::rows::{from_json, parse_dt, to_json};

/// Faculty view of an own offering, with live enrolled count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingSummary {
    pub id: Id,
    pub course_code: String,
    pub semester_code: String,
    pub slot: String,
    pub seat_limit: i64,
    pub status: OfferingStatus,
    pub title: String,
    pub enrolled_count: i64,
}

/// Student view of an active offering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveOffering {
    pub id: Id,
    pub course_code: String,
    pub title: String,
    pub credits: f64,
    pub slot: String,
    pub seat_limit: i64,
    pub instructor: String,
}

/// Admin view of a proposed offering awaiting a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOffering {
    pub id: Id,
    pub course_code: String,
    pub semester_code: String,
    pub slot: String,
    pub seat_limit: i64,
    pub title: String,
    pub instructor: String,
}

/// Insert an offering row. `Conflict` if the same instructor already offers
/// the course in the semester.
pub fn insert(conn: &Connection, offering: &Offering) -> Result<()> {
    conn.execute(
        "INSERT INTO course_offerings
         (id, course_code, semester_code, instructor_id, slot, seat_limit, status,
          allowed_batches, allowed_departments, core_batches, core_departments, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            offering.id,
            offering.course_code,
            offering.semester_code,
            offering.instructor_id,
            offering.slot,
            offering.seat_limit,
            offering.status.as_str(),
            to_json(&offering.allowed_batches)?,
            to_json(&offering.allowed_departments)?,
            to_json(&offering.core_batches)?,
            to_json(&offering.core_departments)?,
            offering.created_at.to_rfc3339()
        ],
    )
    .map_err(|e| conflict_on_unique(e, "offering already floated for this semester"))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Offering>> {
    let row = conn
        .query_row(
            "SELECT id, course_code, semester_code, instructor_id, slot, seat_limit, status,
                    allowed_batches, allowed_departments, core_batches, core_departments,
                    created_at
             FROM course_offerings WHERE id = ?1",
            params![id],
            row_to_raw,
        )
        .optional()?;

    row.map(raw_to_offering).transpose()
}

/// Update the status column. Returns `false` if no row matched.
pub fn set_status(conn: &Connection, id: &str, status: OfferingStatus) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE course_offerings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(updated > 0)
}

/// An instructor's offerings with their enrolled counts, newest first.
pub fn list_by_instructor(conn: &Connection, instructor_id: &str) -> Result<Vec<OfferingSummary>> {
    let mut stmt = conn.prepare(
        "SELECT co.id, co.course_code, co.semester_code, co.slot, co.seat_limit, co.status,
                c.title,
                (SELECT COUNT(*) FROM enrollments e
                 WHERE e.offering_id = co.id AND e.status = 'enrolled') AS enrolled_count
         FROM course_offerings co
         JOIN course_catalog c ON co.course_code = c.code
         WHERE co.instructor_id = ?1
         ORDER BY co.created_at DESC",
    )?;
    let iter = stmt.query_map(params![instructor_id], |row| {
        Ok((
            row.get::<_, Id>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, i64>(7)?,
        ))
    })?;

    let mut summaries = Vec::new();
    for r in iter {
        let (id, course_code, semester_code, slot, seat_limit, status, title, enrolled_count) = r?;
        summaries.push(OfferingSummary {
            id,
            course_code,
            semester_code,
            slot,
            seat_limit,
            status: status.parse()?,
            title,
            enrolled_count,
        });
    }
    Ok(summaries)
}

/// Offerings open for registration, joined with catalog and instructor name.
pub fn list_active(conn: &Connection) -> Result<Vec<ActiveOffering>> {
    let mut stmt = conn.prepare(
        "SELECT co.id, co.course_code, c.title, c.credits, co.slot, co.seat_limit, u.name
         FROM course_offerings co
         JOIN course_catalog c ON co.course_code = c.code
         JOIN users u ON co.instructor_id = u.id
         WHERE co.status = 'active'
         ORDER BY co.course_code",
    )?;
    let iter = stmt.query_map([], |row| {
        Ok(ActiveOffering {
            id: row.get(0)?,
            course_code: row.get(1)?,
            title: row.get(2)?,
            credits: row.get(3)?,
            slot: row.get(4)?,
            seat_limit: row.get(5)?,
            instructor: row.get(6)?,
        })
    })?;
    let mut offerings = Vec::new();
    for o in iter {
        offerings.push(o?);
    }
    Ok(offerings)
}

/// Proposed offerings awaiting an admin decision.
pub fn list_pending(conn: &Connection) -> Result<Vec<PendingOffering>> {
    let mut stmt = conn.prepare(
        "SELECT co.id, co.course_code, co.semester_code, co.slot, co.seat_limit, c.title, u.name
         FROM course_offerings co
         JOIN course_catalog c ON co.course_code = c.code
         JOIN users u ON co.instructor_id = u.id
         WHERE co.status = 'proposed'
         ORDER BY co.created_at ASC",
    )?;
    let iter = stmt.query_map([], |row| {
        Ok(PendingOffering {
            id: row.get(0)?,
            course_code: row.get(1)?,
            semester_code: row.get(2)?,
            slot: row.get(3)?,
            seat_limit: row.get(4)?,
            title: row.get(5)?,
            instructor: row.get(6)?,
        })
    })?;
    let mut offerings = Vec::new();
    for o in iter {
        offerings.push(o?);
    }
    Ok(offerings)
}

type RawOffering = (
    Id,
    String,
    String,
    Id,
    String,
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawOffering> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
    ))
}

fn raw_to_offering(raw: RawOffering) -> Result<Offering> {
    let (
        id,
        course_code,
        semester_code,
        instructor_id,
        slot,
        seat_limit,
        status,
        allowed_batches,
        allowed_departments,
        core_batches,
        core_departments,
        created_at,
    ) = raw;
    Ok(Offering {
        id,
        course_code,
        semester_code,
        instructor_id,
        slot,
        seat_limit,
        status: status.parse()?,
        allowed_batches: from_json(&allowed_batches)?,
        allowed_departments: from_json(&allowed_departments)?,
        core_batches: from_json(&core_batches)?,
        core_departments: from_json(&core_departments)?,
        created_at: parse_dt(&created_at),
    })
}
