use crate::dtos::booking::{
    AttendanceRequest, BookSessionRequest, BookingResponse, CancelBookingRequest,
};
use crate::dtos::enrollment::{
    CreateEnrollmentRequest, EnrollmentResponse, FinishEnrollmentRequest, HomologateRequest,
    ReactivateRequest,
};
use crate::dtos::progress::ProgressRowResponse;
use crate::dtos::session::{CancelSessionRequest, CreateSessionRequest, RosterResponse, SessionResponse};
use crate::dtos::student::{
    CreateStudentRequest, MaxUnitResponse, StudentResponse, TransitionStudentRequest,
};
use crate::routes::{bookings, enrollments, health, root, sessions, students};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        students::create_student,
        students::transition_student,
        students::max_unit,
        students::progress,
        students::bookable_sessions,
        enrollments::create_enrollment,
        enrollments::advance,
        enrollments::suspend,
        enrollments::reactivate,
        enrollments::complete,
        enrollments::fail,
        enrollments::homologate,
        sessions::create_session,
        sessions::plan,
        sessions::publish,
        sessions::unpublish,
        sessions::start,
        sessions::finish,
        sessions::cancel,
        sessions::roster,
        bookings::book,
        bookings::confirm,
        bookings::mark_attended,
        bookings::mark_absent,
        bookings::cancel,
        bookings::reopen
    ),
    components(schemas(
        CreateStudentRequest,
        TransitionStudentRequest,
        StudentResponse,
        MaxUnitResponse,
        CreateEnrollmentRequest,
        EnrollmentResponse,
        FinishEnrollmentRequest,
        HomologateRequest,
        ReactivateRequest,
        CreateSessionRequest,
        CancelSessionRequest,
        SessionResponse,
        RosterResponse,
        BookSessionRequest,
        BookingResponse,
        AttendanceRequest,
        CancelBookingRequest,
        ProgressRowResponse
    )),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Students", description = "Student registry and progression reads"),
        (name = "Enrollments", description = "Enrollment ledger commands"),
        (name = "Sessions", description = "Session catalog commands"),
        (name = "Bookings", description = "Session enrollment ledger commands")
    ),
    info(
        title = "Academy API",
        version = "1.0.0",
        description = "Academic progression and session booking engine",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
