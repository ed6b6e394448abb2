use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Indexes for curriculum traversal
        manager
            .create_index(
                Index::create()
                    .name("idx_phases_program_id")
                    .table(Phases::Table)
                    .col(Phases::ProgramId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_levels_phase_id")
                    .table(Levels::Table)
                    .col(Levels::PhaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_level_id")
                    .table(Subjects::Table)
                    .col(Subjects::LevelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_unit_number")
                    .table(Subjects::Table)
                    .col(Subjects::UnitNumber)
                    .to_owned(),
            )
            .await?;

        // One edge per (subject, prerequisite) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_prerequisites_pair")
                    .table(SubjectPrerequisites::Table)
                    .col(SubjectPrerequisites::SubjectId)
                    .col(SubjectPrerequisites::PrerequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One per-weekday window override per campus
        manager
            .create_index(
                Index::create()
                    .name("idx_campus_hours_campus_weekday")
                    .table(CampusHours::Table)
                    .col(CampusHours::CampusId)
                    .col(CampusHours::Weekday)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lifecycle catalog: one rule per (from, to) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_lifecycle_transitions_pair")
                    .table(LifecycleTransitions::Table)
                    .col(LifecycleTransitions::StateFrom)
                    .col(LifecycleTransitions::StateTo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Enrollment lookups by student and plan
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_plan")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_progress_enrollment_subject")
                    .table(EnrollmentProgress::Table)
                    .col(EnrollmentProgress::EnrollmentId)
                    .col(EnrollmentProgress::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Resource-conflict probes scan by window and resource
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_starts_ends")
                    .table(Sessions::Table)
                    .col(Sessions::StartsAt)
                    .col(Sessions::EndsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_teacher_id")
                    .table(Sessions::Table)
                    .col(Sessions::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_room_id")
                    .table(Sessions::Table)
                    .col(Sessions::RoomId)
                    .to_owned(),
            )
            .await?;

        // Booking lookups per session and per student
        manager
            .create_index(
                Index::create()
                    .name("idx_session_enrollments_session_student")
                    .table(SessionEnrollments::Table)
                    .col(SessionEnrollments::SessionId)
                    .col(SessionEnrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_enrollments_student_id")
                    .table(SessionEnrollments::Table)
                    .col(SessionEnrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        // History is read by (student, session) and by (student, subject)
        manager
            .create_index(
                Index::create()
                    .name("idx_academic_history_student_session")
                    .table(AcademicHistory::Table)
                    .col(AcademicHistory::StudentId)
                    .col(AcademicHistory::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academic_history_student_subject")
                    .table(AcademicHistory::Table)
                    .col(AcademicHistory::StudentId)
                    .col(AcademicHistory::SubjectId)
                    .to_owned(),
            )
            .await?;

        // One tracking row per (student, subject)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_tracking_student_subject")
                    .table(SubjectTracking::Table)
                    .col(SubjectTracking::StudentId)
                    .col(SubjectTracking::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_subject_tracking_student_subject",
            "idx_academic_history_student_subject",
            "idx_academic_history_student_session",
            "idx_session_enrollments_student_id",
            "idx_session_enrollments_session_student",
            "idx_sessions_room_id",
            "idx_sessions_teacher_id",
            "idx_sessions_starts_ends",
            "idx_enrollment_progress_enrollment_subject",
            "idx_enrollments_student_plan",
            "idx_lifecycle_transitions_pair",
            "idx_campus_hours_campus_weekday",
            "idx_subject_prerequisites_pair",
            "idx_subjects_unit_number",
            "idx_subjects_level_id",
            "idx_levels_phase_id",
            "idx_phases_program_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Phases {
    Table,
    ProgramId,
}

#[derive(Iden)]
enum Levels {
    Table,
    PhaseId,
}

#[derive(Iden)]
enum Subjects {
    Table,
    LevelId,
    UnitNumber,
}

#[derive(Iden)]
enum SubjectPrerequisites {
    Table,
    SubjectId,
    PrerequisiteId,
}

#[derive(Iden)]
enum CampusHours {
    Table,
    CampusId,
    Weekday,
}

#[derive(Iden)]
enum LifecycleTransitions {
    Table,
    StateFrom,
    StateTo,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    PlanId,
}

#[derive(Iden)]
enum EnrollmentProgress {
    Table,
    EnrollmentId,
    SubjectId,
}

#[derive(Iden)]
enum Sessions {
    Table,
    StartsAt,
    EndsAt,
    TeacherId,
    RoomId,
}

#[derive(Iden)]
enum SessionEnrollments {
    Table,
    SessionId,
    StudentId,
}

#[derive(Iden)]
enum AcademicHistory {
    Table,
    StudentId,
    SessionId,
    SubjectId,
}

#[derive(Iden)]
enum SubjectTracking {
    Table,
    StudentId,
    SubjectId,
}
