use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Student lifecycle state. Transitions between these values are driven by
/// the `lifecycle_transition` catalog, never by hard-coded branches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum StudentState {
    #[sea_orm(string_value = "prospect")]
    Prospect,
    #[sea_orm(string_value = "enrolled")]
    Enrolled,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "graduated")]
    Graduated,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl StudentState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Enrolled => "enrolled",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Graduated => "graduated",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl Display for StudentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Where a lifecycle transition was triggered from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransitionOrigin {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "wizard")]
    Wizard,
    #[sea_orm(string_value = "enrollment")]
    Enrollment,
    #[sea_orm(string_value = "import")]
    Import,
    #[sea_orm(string_value = "system")]
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "homologated")]
    Homologated,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl EnrollmentState {
    /// States that block a second enrollment on the same (student, plan).
    pub fn blocks_duplicates(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Finished => "finished",
            Self::Homologated => "homologated",
            Self::Withdrawn => "withdrawn",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for EnrollmentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Per-subject progress inside an enrollment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl ProgressState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Display for ProgressState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "with_enrollment")]
    WithEnrollment,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl SessionState {
    /// Students may only book published sessions that have not started.
    pub fn accepts_bookings(self) -> bool {
        matches!(self, Self::Active | Self::WithEnrollment)
    }

    /// Attendance may only be recorded once the class is running or over.
    pub fn allows_attendance(self) -> bool {
        matches!(self, Self::InProgress | Self::Done)
    }

    /// Academic history rows exist only for sessions in these states.
    pub fn generates_history(self) -> bool {
        matches!(self, Self::Active | Self::WithEnrollment | Self::InProgress | Self::Done)
    }

    /// Cancellation is reachable from any state except a finished class.
    pub fn can_cancel(self) -> bool {
        !matches!(self, Self::Done | Self::Cancelled)
    }

    pub fn can_start(self) -> bool {
        matches!(self, Self::Active | Self::WithEnrollment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Planned => "planned",
            Self::Active => "active",
            Self::WithEnrollment => "with_enrollment",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SessionEnrollmentState {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "attended")]
    Attended,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl SessionEnrollmentState {
    /// A non-cancelled row blocks a second booking on the same session.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    pub fn counts_against_capacity(self) -> bool {
        matches!(self, Self::Confirmed | Self::Attended | Self::Absent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Attended => "attended",
            Self::Absent => "absent",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for SessionEnrollmentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "attended")]
    Attended,
    #[sea_orm(string_value = "absent")]
    Absent,
}

impl AttendanceStatus {
    /// The denormalized `attended` boolean must stay in lockstep with this.
    pub fn attended_flag(self) -> bool {
        matches!(self, Self::Attended)
    }
}

/// Per-(student, subject) tracking row state for fast portal queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "registered")]
    Registered,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[sea_orm(string_value = "in_person")]
    InPerson,
    #[sea_orm(string_value = "virtual")]
    Virtual,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}

impl DeliveryMode {
    pub fn requires_room(self) -> bool {
        !matches!(self, Self::Virtual)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPerson => "in_person",
            Self::Virtual => "virtual",
            Self::Hybrid => "hybrid",
        }
    }
}

impl Display for DeliveryMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CampusKind {
    #[sea_orm(string_value = "in_person")]
    InPerson,
    #[sea_orm(string_value = "online")]
    Online,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RoomModality {
    #[sea_orm(string_value = "in_person")]
    InPerson,
    #[sea_orm(string_value = "virtual")]
    Virtual,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}

impl RoomModality {
    /// Hybrid rooms run either on-site or virtual, never both at once, so
    /// the usable capacity is the larger of the two.
    pub fn effective_capacity(self, capacity: i32, virtual_capacity: i32) -> i32 {
        match self {
            Self::InPerson => capacity,
            Self::Virtual => virtual_capacity,
            Self::Hybrid => capacity.max(virtual_capacity),
        }
    }
}

/// Who placed a session booking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum BookingOrigin {
    #[sea_orm(string_value = "portal")]
    Portal,
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl BookingOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portal => "portal",
            Self::Staff => "staff",
        }
    }
}

impl Display for BookingOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    #[sea_orm(string_value = "by_subjects")]
    BySubjects,
    #[sea_orm(string_value = "by_hours")]
    ByHours,
    #[sea_orm(string_value = "mixed")]
    Mixed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_gates() {
        assert!(SessionState::Active.accepts_bookings());
        assert!(SessionState::WithEnrollment.accepts_bookings());
        assert!(!SessionState::Draft.accepts_bookings());
        assert!(!SessionState::Done.accepts_bookings());

        assert!(SessionState::InProgress.allows_attendance());
        assert!(SessionState::Done.allows_attendance());
        assert!(!SessionState::Active.allows_attendance());

        assert!(SessionState::Draft.can_cancel());
        assert!(SessionState::InProgress.can_cancel());
        assert!(!SessionState::Done.can_cancel());
        assert!(!SessionState::Cancelled.can_cancel());
    }

    #[test]
    fn test_attendance_flag_lockstep() {
        assert!(AttendanceStatus::Attended.attended_flag());
        assert!(!AttendanceStatus::Pending.attended_flag());
        assert!(!AttendanceStatus::Absent.attended_flag());
    }

    #[test]
    fn test_hybrid_room_capacity() {
        assert_eq!(RoomModality::Hybrid.effective_capacity(12, 30), 30);
        assert_eq!(RoomModality::Hybrid.effective_capacity(25, 10), 25);
        assert_eq!(RoomModality::InPerson.effective_capacity(12, 30), 12);
        assert_eq!(RoomModality::Virtual.effective_capacity(12, 30), 30);
    }

    #[test]
    fn test_capacity_counting_states() {
        assert!(SessionEnrollmentState::Confirmed.counts_against_capacity());
        assert!(!SessionEnrollmentState::Pending.counts_against_capacity());
        assert!(!SessionEnrollmentState::Cancelled.counts_against_capacity());
        assert!(SessionEnrollmentState::Cancelled.is_live() == false);
    }
}
