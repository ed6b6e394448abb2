use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create programs table
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Programs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Programs::Code).string().not_null())
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::Kind).string().not_null())
                    .col(ColumnDef::new(Programs::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Programs::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create phases table
        manager
            .create_table(
                Table::create()
                    .table(Phases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Phases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Phases::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(Phases::Code).string().not_null())
                    .col(ColumnDef::new(Phases::Name).string().not_null())
                    .col(ColumnDef::new(Phases::Sequence).integer().not_null())
                    .col(ColumnDef::new(Phases::LevelSourcePhaseId).uuid())
                    .col(ColumnDef::new(Phases::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Phases::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-phases-program_id")
                            .from(Phases::Table, Phases::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-phases-level_source_phase_id")
                            .from(Phases::Table, Phases::LevelSourcePhaseId)
                            .to(Phases::Table, Phases::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plans table
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Plans::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(Plans::Code).string().not_null())
                    .col(ColumnDef::new(Plans::Name).string().not_null())
                    .col(ColumnDef::new(Plans::Version).string().not_null())
                    .col(ColumnDef::new(Plans::ValidFrom).date())
                    .col(ColumnDef::new(Plans::ValidUntil).date())
                    .col(
                        ColumnDef::new(Plans::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Plans::ProgressMode).string().not_null())
                    .col(ColumnDef::new(Plans::TotalHours).integer().not_null())
                    .col(
                        ColumnDef::new(Plans::IsCourtesy)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Plans::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plans-program_id")
                            .from(Plans::Table, Plans::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_phases junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(PlanPhases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlanPhases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PlanPhases::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PlanPhases::PhaseId).uuid().not_null())
                    .col(ColumnDef::new(PlanPhases::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_phases-plan_id")
                            .from(PlanPhases::Table, PlanPhases::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_phases-phase_id")
                            .from(PlanPhases::Table, PlanPhases::PhaseId)
                            .to(Phases::Table, Phases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create levels table
        manager
            .create_table(
                Table::create()
                    .table(Levels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Levels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Levels::PhaseId).uuid().not_null())
                    .col(ColumnDef::new(Levels::Code).string().not_null())
                    .col(ColumnDef::new(Levels::Name).string().not_null())
                    .col(ColumnDef::new(Levels::Sequence).integer().not_null())
                    .col(ColumnDef::new(Levels::MaxUnit).integer().not_null())
                    .col(ColumnDef::new(Levels::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Levels::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-levels-phase_id")
                            .from(Levels::Table, Levels::PhaseId)
                            .to(Phases::Table, Phases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::LevelId).uuid())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Category).string().not_null())
                    .col(ColumnDef::new(Subjects::Sequence).integer().not_null())
                    .col(ColumnDef::new(Subjects::UnitNumber).integer())
                    .col(ColumnDef::new(Subjects::SkillSlot).small_integer())
                    .col(ColumnDef::new(Subjects::UnitBlockStart).integer())
                    .col(ColumnDef::new(Subjects::UnitBlockEnd).integer())
                    .col(
                        ColumnDef::new(Subjects::IsPrerequisite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Subjects::Evaluable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Subjects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subjects-level_id")
                            .from(Subjects::Table, Subjects::LevelId)
                            .to(Levels::Table, Levels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subject_prerequisites edge table
        manager
            .create_table(
                Table::create()
                    .table(SubjectPrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectPrerequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubjectPrerequisites::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(SubjectPrerequisites::PrerequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectPrerequisites::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_prerequisites-subject_id")
                            .from(SubjectPrerequisites::Table, SubjectPrerequisites::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_prerequisites-prerequisite_id")
                            .from(
                                SubjectPrerequisites::Table,
                                SubjectPrerequisites::PrerequisiteId,
                            )
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create elective_pools table
        manager
            .create_table(
                Table::create()
                    .table(ElectivePools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ElectivePools::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ElectivePools::Code).string().not_null())
                    .col(ColumnDef::new(ElectivePools::Name).string().not_null())
                    .col(ColumnDef::new(ElectivePools::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ElectivePools::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create elective_pool_subjects junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(ElectivePoolSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ElectivePoolSubjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ElectivePoolSubjects::PoolId).uuid().not_null())
                    .col(
                        ColumnDef::new(ElectivePoolSubjects::SubjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ElectivePoolSubjects::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-elective_pool_subjects-pool_id")
                            .from(ElectivePoolSubjects::Table, ElectivePoolSubjects::PoolId)
                            .to(ElectivePools::Table, ElectivePools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-elective_pool_subjects-subject_id")
                            .from(ElectivePoolSubjects::Table, ElectivePoolSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create campuses table
        manager
            .create_table(
                Table::create()
                    .table(Campuses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campuses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Campuses::Code).string().not_null())
                    .col(ColumnDef::new(Campuses::Name).string().not_null())
                    .col(ColumnDef::new(Campuses::Kind).string().not_null())
                    .col(ColumnDef::new(Campuses::AllowedDays).text().not_null())
                    .col(ColumnDef::new(Campuses::OpenFrom).time().not_null())
                    .col(ColumnDef::new(Campuses::OpenUntil).time().not_null())
                    .col(
                        ColumnDef::new(Campuses::DefaultSessionMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Campuses::DefaultStart).time().not_null())
                    .col(ColumnDef::new(Campuses::DefaultEnd).time().not_null())
                    .col(ColumnDef::new(Campuses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Campuses::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create campus_hours table (per-weekday window overrides)
        manager
            .create_table(
                Table::create()
                    .table(CampusHours::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CampusHours::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CampusHours::CampusId).uuid().not_null())
                    .col(ColumnDef::new(CampusHours::Weekday).small_integer().not_null())
                    .col(ColumnDef::new(CampusHours::OpenFrom).time().not_null())
                    .col(ColumnDef::new(CampusHours::OpenUntil).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-campus_hours-campus_id")
                            .from(CampusHours::Table, CampusHours::CampusId)
                            .to(Campuses::Table, Campuses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rooms table
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::CampusId).uuid().not_null())
                    .col(ColumnDef::new(Rooms::Code).string().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(ColumnDef::new(Rooms::Modality).string().not_null())
                    .col(
                        ColumnDef::new(Rooms::VirtualCapacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::HasProjector)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rooms::HasAudio)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Rooms::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Rooms::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-rooms-campus_id")
                            .from(Rooms::Table, Rooms::CampusId)
                            .to(Campuses::Table, Campuses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profile_states table
        manager
            .create_table(
                Table::create()
                    .table(ProfileStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileStates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfileStates::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProfileStates::Name).string().not_null())
                    .col(ColumnDef::new(ProfileStates::MayBook).boolean().not_null())
                    .col(ColumnDef::new(ProfileStates::MayAttend).boolean().not_null())
                    .col(ColumnDef::new(ProfileStates::MayUseApps).boolean().not_null())
                    .col(
                        ColumnDef::new(ProfileStates::MayRequestFreeze)
                            .boolean()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Code).string().not_null())
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .col(ColumnDef::new(Students::BirthDate).date().not_null())
                    .col(ColumnDef::new(Students::Phone).string())
                    .col(ColumnDef::new(Students::State).string().not_null())
                    .col(ColumnDef::new(Students::ProfileStateId).uuid())
                    .col(
                        ColumnDef::new(Students::FinanciallyCurrent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-profile_state_id")
                            .from(Students::Table, Students::ProfileStateId)
                            .to(ProfileStates::Table, ProfileStates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lifecycle_transitions catalog table
        manager
            .create_table(
                Table::create()
                    .table(LifecycleTransitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LifecycleTransitions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LifecycleTransitions::StateFrom)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LifecycleTransitions::StateTo)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LifecycleTransitions::Sequence)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LifecycleTransitions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LifecycleTransitions::RequiresReason)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LifecycleTransitions::ProfileStateId).uuid())
                    .col(ColumnDef::new(LifecycleTransitions::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lifecycle_transitions-profile_state_id")
                            .from(
                                LifecycleTransitions::Table,
                                LifecycleTransitions::ProfileStateId,
                            )
                            .to(ProfileStates::Table, ProfileStates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lifecycle_histories audit table
        manager
            .create_table(
                Table::create()
                    .table(LifecycleHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LifecycleHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LifecycleHistories::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(LifecycleHistories::StateFrom)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LifecycleHistories::StateTo).string().not_null())
                    .col(ColumnDef::new(LifecycleHistories::Reason).text())
                    .col(ColumnDef::new(LifecycleHistories::Origin).string().not_null())
                    .col(ColumnDef::new(LifecycleHistories::Actor).string())
                    .col(
                        ColumnDef::new(LifecycleHistories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lifecycle_histories-student_id")
                            .from(LifecycleHistories::Table, LifecycleHistories::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrollments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Enrollments::Code).string().not_null())
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::PlanId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::State).string().not_null())
                    .col(ColumnDef::new(Enrollments::CurrentPhaseId).uuid())
                    .col(ColumnDef::new(Enrollments::CurrentLevelId).uuid())
                    .col(ColumnDef::new(Enrollments::CurrentSubjectId).uuid())
                    .col(
                        ColumnDef::new(Enrollments::FinancialOverride)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Enrollments::FinalGrade).float())
                    .col(ColumnDef::new(Enrollments::StartedOn).date())
                    .col(ColumnDef::new(Enrollments::FinishedOn).date())
                    .col(ColumnDef::new(Enrollments::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Enrollments::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-plan_id")
                            .from(Enrollments::Table, Enrollments::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollment_progress table (owned by enrollments)
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentProgress::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentProgress::EnrollmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnrollmentProgress::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(EnrollmentProgress::State).string().not_null())
                    .col(ColumnDef::new(EnrollmentProgress::StartedOn).date())
                    .col(ColumnDef::new(EnrollmentProgress::CompletedOn).date())
                    .col(ColumnDef::new(EnrollmentProgress::FinalGrade).float())
                    .col(
                        ColumnDef::new(EnrollmentProgress::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentProgress::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_progress-enrollment_id")
                            .from(EnrollmentProgress::Table, EnrollmentProgress::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_progress-subject_id")
                            .from(EnrollmentProgress::Table, EnrollmentProgress::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sessions table
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::Code).string().not_null())
                    .col(ColumnDef::new(Sessions::SubjectId).uuid())
                    .col(ColumnDef::new(Sessions::ElectivePoolId).uuid())
                    .col(ColumnDef::new(Sessions::CampusId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::RoomId).uuid())
                    .col(ColumnDef::new(Sessions::TeacherId).uuid())
                    .col(ColumnDef::new(Sessions::CoachId).uuid())
                    .col(ColumnDef::new(Sessions::StartsAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::EndsAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::DeliveryMode).string().not_null())
                    .col(ColumnDef::new(Sessions::MaxCapacity).integer().not_null())
                    .col(ColumnDef::new(Sessions::State).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sessions::AudienceUnitFrom).integer())
                    .col(ColumnDef::new(Sessions::AudienceUnitTo).integer())
                    .col(ColumnDef::new(Sessions::CancellationReason).text())
                    .col(ColumnDef::new(Sessions::InactiveFlaggedAt).timestamp())
                    .col(ColumnDef::new(Sessions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-subject_id")
                            .from(Sessions::Table, Sessions::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-elective_pool_id")
                            .from(Sessions::Table, Sessions::ElectivePoolId)
                            .to(ElectivePools::Table, ElectivePools::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-campus_id")
                            .from(Sessions::Table, Sessions::CampusId)
                            .to(Campuses::Table, Campuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-room_id")
                            .from(Sessions::Table, Sessions::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create session_enrollments table (owned by sessions)
        manager
            .create_table(
                Table::create()
                    .table(SessionEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionEnrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionEnrollments::SessionId).uuid().not_null())
                    .col(ColumnDef::new(SessionEnrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(SessionEnrollments::State).string().not_null())
                    .col(ColumnDef::new(SessionEnrollments::Origin).string().not_null())
                    .col(ColumnDef::new(SessionEnrollments::EffectiveSubjectId).uuid())
                    .col(ColumnDef::new(SessionEnrollments::EffectiveUnitNumber).integer())
                    .col(ColumnDef::new(SessionEnrollments::ConfirmedAt).timestamp())
                    .col(ColumnDef::new(SessionEnrollments::AttendanceMarkedAt).timestamp())
                    .col(
                        ColumnDef::new(SessionEnrollments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionEnrollments::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_enrollments-session_id")
                            .from(SessionEnrollments::Table, SessionEnrollments::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_enrollments-student_id")
                            .from(SessionEnrollments::Table, SessionEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_enrollments-effective_subject_id")
                            .from(
                                SessionEnrollments::Table,
                                SessionEnrollments::EffectiveSubjectId,
                            )
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create academic_history table (survives session deletion)
        manager
            .create_table(
                Table::create()
                    .table(AcademicHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AcademicHistory::StudentId).uuid().not_null())
                    .col(ColumnDef::new(AcademicHistory::SessionId).uuid())
                    .col(ColumnDef::new(AcademicHistory::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(AcademicHistory::ProgramId).uuid())
                    .col(ColumnDef::new(AcademicHistory::PlanId).uuid())
                    .col(ColumnDef::new(AcademicHistory::PhaseId).uuid())
                    .col(ColumnDef::new(AcademicHistory::LevelId).uuid())
                    .col(ColumnDef::new(AcademicHistory::CampusId).uuid())
                    .col(ColumnDef::new(AcademicHistory::TeacherId).uuid())
                    .col(ColumnDef::new(AcademicHistory::DeliveryMode).string())
                    .col(ColumnDef::new(AcademicHistory::SessionStartsAt).timestamp())
                    .col(
                        ColumnDef::new(AcademicHistory::AttendanceStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistory::Attended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AcademicHistory::Grade).float())
                    .col(ColumnDef::new(AcademicHistory::Notes).text())
                    .col(ColumnDef::new(AcademicHistory::AttendanceMarkedAt).timestamp())
                    .col(ColumnDef::new(AcademicHistory::GradeMarkedAt).timestamp())
                    .col(ColumnDef::new(AcademicHistory::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(AcademicHistory::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-academic_history-student_id")
                            .from(AcademicHistory::Table, AcademicHistory::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-academic_history-session_id")
                            .from(AcademicHistory::Table, AcademicHistory::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-academic_history-subject_id")
                            .from(AcademicHistory::Table, AcademicHistory::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create subject_tracking table
        manager
            .create_table(
                Table::create()
                    .table(SubjectTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectTracking::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubjectTracking::StudentId).uuid().not_null())
                    .col(ColumnDef::new(SubjectTracking::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(SubjectTracking::SessionId).uuid())
                    .col(ColumnDef::new(SubjectTracking::State).string().not_null())
                    .col(
                        ColumnDef::new(SubjectTracking::Attended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SubjectTracking::Grade).float())
                    .col(ColumnDef::new(SubjectTracking::Notes).text())
                    .col(ColumnDef::new(SubjectTracking::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(SubjectTracking::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_tracking-student_id")
                            .from(SubjectTracking::Table, SubjectTracking::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_tracking-subject_id")
                            .from(SubjectTracking::Table, SubjectTracking::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subject_tracking-session_id")
                            .from(SubjectTracking::Table, SubjectTracking::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create app_settings table
        manager
            .create_table(
                Table::create()
                    .table(AppSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppSettings::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AppSettings::Value).string().not_null())
                    .col(ColumnDef::new(AppSettings::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(AppSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectTracking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnrollmentProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LifecycleHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LifecycleTransitions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampusHours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ElectivePoolSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ElectivePools::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectPrerequisites::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Levels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanPhases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Programs {
    Table,
    Id,
    Code,
    Name,
    Kind,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Plans {
    Table,
    Id,
    ProgramId,
    Code,
    Name,
    Version,
    ValidFrom,
    ValidUntil,
    IsCurrent,
    ProgressMode,
    TotalHours,
    IsCourtesy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlanPhases {
    Table,
    Id,
    PlanId,
    PhaseId,
    CreatedAt,
}

#[derive(Iden)]
enum Phases {
    Table,
    Id,
    ProgramId,
    Code,
    Name,
    Sequence,
    LevelSourcePhaseId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Levels {
    Table,
    Id,
    PhaseId,
    Code,
    Name,
    Sequence,
    MaxUnit,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    LevelId,
    Code,
    Name,
    Category,
    Sequence,
    UnitNumber,
    SkillSlot,
    UnitBlockStart,
    UnitBlockEnd,
    IsPrerequisite,
    Evaluable,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SubjectPrerequisites {
    Table,
    Id,
    SubjectId,
    PrerequisiteId,
    CreatedAt,
}

#[derive(Iden)]
enum ElectivePools {
    Table,
    Id,
    Code,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ElectivePoolSubjects {
    Table,
    Id,
    PoolId,
    SubjectId,
    CreatedAt,
}

#[derive(Iden)]
enum Campuses {
    Table,
    Id,
    Code,
    Name,
    Kind,
    AllowedDays,
    OpenFrom,
    OpenUntil,
    DefaultSessionMinutes,
    DefaultStart,
    DefaultEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CampusHours {
    Table,
    Id,
    CampusId,
    Weekday,
    OpenFrom,
    OpenUntil,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    CampusId,
    Code,
    Name,
    Capacity,
    Modality,
    VirtualCapacity,
    HasProjector,
    HasAudio,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProfileStates {
    Table,
    Id,
    Code,
    Name,
    MayBook,
    MayAttend,
    MayUseApps,
    MayRequestFreeze,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Code,
    FirstName,
    LastName,
    Email,
    BirthDate,
    Phone,
    State,
    ProfileStateId,
    FinanciallyCurrent,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LifecycleTransitions {
    Table,
    Id,
    StateFrom,
    StateTo,
    Sequence,
    Active,
    RequiresReason,
    ProfileStateId,
    Description,
}

#[derive(Iden)]
enum LifecycleHistories {
    Table,
    Id,
    StudentId,
    StateFrom,
    StateTo,
    Reason,
    Origin,
    Actor,
    CreatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    Code,
    StudentId,
    PlanId,
    State,
    CurrentPhaseId,
    CurrentLevelId,
    CurrentSubjectId,
    FinancialOverride,
    FinalGrade,
    StartedOn,
    FinishedOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum EnrollmentProgress {
    Table,
    Id,
    EnrollmentId,
    SubjectId,
    State,
    StartedOn,
    CompletedOn,
    FinalGrade,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    Code,
    SubjectId,
    ElectivePoolId,
    CampusId,
    RoomId,
    TeacherId,
    CoachId,
    StartsAt,
    EndsAt,
    DeliveryMode,
    MaxCapacity,
    State,
    Published,
    AudienceUnitFrom,
    AudienceUnitTo,
    CancellationReason,
    InactiveFlaggedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SessionEnrollments {
    Table,
    Id,
    SessionId,
    StudentId,
    State,
    Origin,
    EffectiveSubjectId,
    EffectiveUnitNumber,
    ConfirmedAt,
    AttendanceMarkedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AcademicHistory {
    Table,
    Id,
    StudentId,
    SessionId,
    SubjectId,
    ProgramId,
    PlanId,
    PhaseId,
    LevelId,
    CampusId,
    TeacherId,
    DeliveryMode,
    SessionStartsAt,
    AttendanceStatus,
    Attended,
    Grade,
    Notes,
    AttendanceMarkedAt,
    GradeMarkedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SubjectTracking {
    Table,
    Id,
    StudentId,
    SubjectId,
    SessionId,
    State,
    Attended,
    Grade,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AppSettings {
    Table,
    Key,
    Value,
    UpdatedAt,
}
