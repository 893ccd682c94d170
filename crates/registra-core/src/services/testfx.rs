//! Shared test fixture: an in-memory store seeded with a semester and a
//! small catalog, plus helpers for minting accounts and enrollments.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use registra_store::RegistryStore;
use registra_types::{Course, Decision, Enrollment, Principal, Role, Semester};

use crate::services::DomainServices;
use crate::services::directory::{NewFaculty, NewStudent};
use crate::services::offerings::FloatRequest;

pub(crate) struct Fixture {
    pub services: DomainServices,
    pub admin: Principal,
    students: RefCell<HashMap<String, String>>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(RegistryStore::open_in_memory().unwrap());
        let services = DomainServices::new(store);
        let admin = Principal::Bootstrap;

        services
            .semesters()
            .create(
                &admin,
                Semester {
                    code: "2026-W".to_string(),
                    year: 2026,
                    term: "winter".to_string(),
                    start_date: "2026-01-05".to_string(),
                    end_date: "2026-05-08".to_string(),
                },
            )
            .unwrap();
        for (code, title) in [("CS201", "Data Structures"), ("CS301", "Databases")] {
            services
                .catalog()
                .create_course(
                    &admin,
                    Course {
                        code: code.to_string(),
                        title: title.to_string(),
                        ltp: "3-1-0".to_string(),
                        credits: 4.0,
                    },
                )
                .unwrap();
        }

        Self {
            services,
            admin,
            students: RefCell::new(HashMap::new()),
        }
    }

    pub fn faculty(&self, email: &str) -> Principal {
        let created = self
            .services
            .directory()
            .add_faculty(
                &self.admin,
                NewFaculty {
                    name: email.split('@').next().unwrap().to_string(),
                    email: email.to_string(),
                    department: "CSE".to_string(),
                    designation: "Assistant Professor".to_string(),
                },
            )
            .unwrap();
        Principal::User {
            id: created.user.id,
            role: Role::Faculty,
        }
    }

    pub fn student(
        &self,
        email: &str,
        entry_number: &str,
        department: &str,
        batch_year: i32,
    ) -> Principal {
        let created = self
            .services
            .directory()
            .add_student(
                &self.admin,
                NewStudent {
                    name: email.split('@').next().unwrap().to_string(),
                    email: email.to_string(),
                    entry_number: entry_number.to_string(),
                    department: department.to_string(),
                    batch_year,
                },
            )
            .unwrap();
        self.students
            .borrow_mut()
            .insert(entry_number.to_string(), created.user.id.clone());
        Principal::User {
            id: created.user.id,
            role: Role::Student,
        }
    }

    /// Principal for a student already created through [`Fixture::student`].
    pub fn student_principal(&self, entry_number: &str) -> Principal {
        let id = self.students.borrow()[entry_number].clone();
        Principal::User {
            id,
            role: Role::Student,
        }
    }

    pub fn float_request(&self, course_code: &str, semester_code: &str) -> FloatRequest {
        FloatRequest {
            course_code: course_code.to_string(),
            semester_code: semester_code.to_string(),
            slot: "A".to_string(),
            seat_limit: 60,
            allowed_batches: vec![],
            allowed_departments: vec![],
            core_batches: vec![],
            core_departments: vec![],
        }
    }

    /// Float and approve an offering for `instructor`, pay the student's
    /// fees, and register. Returns the pending enrollment.
    pub fn registered(
        &self,
        instructor: &Principal,
        student: &Principal,
        course_code: &str,
    ) -> Enrollment {
        let offering = self
            .services
            .offerings()
            .float(instructor, self.float_request(course_code, "2026-W"))
            .unwrap();
        self.services
            .offerings()
            .decide(&self.admin, &offering.id, Decision::Approve)
            .unwrap();
        self.services
            .fees()
            .record_payment(student, "2026-W", None)
            .unwrap();
        self.services
            .enrollment()
            .register(student, &offering.id)
            .unwrap()
    }
}
