//! Test fixtures shared by the ops module tests.

use rusqlite::Connection;

use registra_types::{
    Course, FacultyProfile, Id, OfferingStatus, Role, Semester, StudentProfile, User, new_id, now,
};

use crate::{catalog, offerings, semesters, users};

/// Insert a student user + profile. The api token is `tok-{id}`.
pub fn make_student(
    conn: &Connection,
    name: &str,
    email: &str,
    entry_number: &str,
    department: &str,
    batch_year: i32,
) -> Id {
    let user = User {
        id: new_id(),
        name: name.to_string(),
        email: email.to_string(),
        role: Role::Student,
        created_at: now(),
    };
    users::insert(conn, &user, &format!("tok-{}", user.id)).unwrap();
    users::insert_student_profile(
        conn,
        &StudentProfile {
            user_id: user.id.clone(),
            entry_number: entry_number.to_string(),
            department: department.to_string(),
            batch_year,
            advisor_id: None,
        },
    )
    .unwrap();
    user.id
}

/// Insert a faculty user + profile. The api token is `tok-{id}`.
pub fn make_faculty(conn: &Connection, name: &str, email: &str, department: &str) -> Id {
    let user = User {
        id: new_id(),
        name: name.to_string(),
        email: email.to_string(),
        role: Role::Faculty,
        created_at: now(),
    };
    users::insert(conn, &user, &format!("tok-{}", user.id)).unwrap();
    users::insert_faculty_profile(
        conn,
        &FacultyProfile {
            user_id: user.id.clone(),
            department: department.to_string(),
            designation: "Assistant Professor".to_string(),
        },
    )
    .unwrap();
    user.id
}

/// Insert the standard test semester.
pub fn make_semester(conn: &Connection, code: &str) -> String {
    semesters::insert(
        conn,
        &Semester {
            code: code.to_string(),
            year: 2026,
            term: "Winter".to_string(),
            start_date: "2026-01-01".to_string(),
            end_date: "2026-05-15".to_string(),
        },
    )
    .unwrap();
    code.to_string()
}

/// Insert a catalog course.
pub fn make_course(conn: &Connection, code: &str, title: &str) -> String {
    catalog::insert(
        conn,
        &Course {
            code: code.to_string(),
            title: title.to_string(),
            ltp: "3-1-0".to_string(),
            credits: 4.0,
        },
    )
    .unwrap();
    code.to_string()
}

/// Insert an offering in the given status with no core criteria.
pub fn make_offering(
    conn: &Connection,
    course_code: &str,
    semester_code: &str,
    instructor_id: &str,
    status: OfferingStatus,
) -> registra_types::Offering {
    let offering = registra_types::Offering {
        id: new_id(),
        course_code: course_code.to_string(),
        semester_code: semester_code.to_string(),
        instructor_id: instructor_id.to_string(),
        slot: "A".to_string(),
        seat_limit: 60,
        status,
        allowed_batches: vec![],
        allowed_departments: vec![],
        core_batches: vec![],
        core_departments: vec![],
        created_at: now(),
    };
    offerings::insert(conn, &offering).unwrap();
    offering
}
