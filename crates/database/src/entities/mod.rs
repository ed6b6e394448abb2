pub mod academic_history;
pub mod app_settings;
pub mod campus_hours;
pub mod campuses;
pub mod elective_pool_subjects;
pub mod elective_pools;
pub mod enrollment_progress;
pub mod enrollments;
pub mod levels;
pub mod lifecycle_histories;
pub mod lifecycle_transitions;
pub mod phases;
pub mod plan_phases;
pub mod plans;
pub mod profile_states;
pub mod programs;
pub mod rooms;
pub mod session_enrollments;
pub mod sessions;
pub mod students;
pub mod subject_prerequisites;
pub mod subject_tracking;
pub mod subjects;
