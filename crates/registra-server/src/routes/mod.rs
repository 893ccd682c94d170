//! API routes.

pub mod catalog;
pub mod directory;
pub mod enrollments;
pub mod fees;
pub mod health;
pub mod offerings;
pub mod semesters;

pub use catalog::{
    CourseListResponse, CreateCourseRequest, create_course_handler, list_courses_handler,
};
pub use directory::{
    AssignAdvisorRequest, CreatedUserResponse, assign_advisor_handler, create_faculty_handler,
    create_student_handler, list_faculty_handler, list_students_handler,
};
pub use enrollments::{
    EnrollmentActionRequest, GradeRequest, RegisterRequest, advisor_action_handler,
    advisor_requests_handler, grade_handler, instructor_action_handler,
    instructor_requests_handler, my_enrollments_handler, register_handler,
};
pub use fees::{FeeStatusResponse, PayFeesRequest, fee_status_handler, pay_fees_handler};
pub use health::health_routes;
pub use offerings::{
    CompleteOfferingRequest, DecisionResponse, OfferingActionRequest, complete_offering_handler,
    decide_offering_handler, float_offering_handler, list_active_offerings_handler,
    my_offerings_handler, pending_offerings_handler,
};
pub use semesters::{
    CreateSemesterRequest, SemesterListResponse, create_semester_handler, list_semesters_handler,
};
