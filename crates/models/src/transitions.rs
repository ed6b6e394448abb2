//! Seed catalog for student lifecycle transitions and profile states.
//!
//! The `lifecycle_transition` table is the authority on which state changes
//! are legal; the engine walks it instead of branching on states. These
//! seeds populate the table on first migration and back the pure
//! reason-validation helper used by the student service.

use crate::states::StudentState;

/// A portal capability record assigned to students by lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStateSeed {
    pub code: &'static str,
    pub name: &'static str,
    pub may_book: bool,
    pub may_attend: bool,
    pub may_use_apps: bool,
    pub may_request_freeze: bool,
}

pub const PROFILE_STATES: &[ProfileStateSeed] = &[
    ProfileStateSeed {
        code: "prospect",
        name: "Prospect",
        may_book: false,
        may_attend: false,
        may_use_apps: false,
        may_request_freeze: false,
    },
    ProfileStateSeed {
        code: "enrolled",
        name: "Enrolled",
        may_book: false,
        may_attend: false,
        may_use_apps: true,
        may_request_freeze: false,
    },
    ProfileStateSeed {
        code: "active",
        name: "Active Student",
        may_book: true,
        may_attend: true,
        may_use_apps: true,
        may_request_freeze: true,
    },
    ProfileStateSeed {
        code: "restricted",
        name: "Restricted",
        may_book: false,
        may_attend: false,
        may_use_apps: true,
        may_request_freeze: false,
    },
    ProfileStateSeed {
        code: "alumni",
        name: "Alumni",
        may_book: false,
        may_attend: false,
        may_use_apps: true,
        may_request_freeze: false,
    },
    ProfileStateSeed {
        code: "off",
        name: "Off Boarding",
        may_book: false,
        may_attend: false,
        may_use_apps: false,
        may_request_freeze: false,
    },
];

/// One legal lifecycle transition. `profile_state` names the profile-state
/// code assigned to the student on this transition, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSeed {
    pub from: StudentState,
    pub to: StudentState,
    pub requires_reason: bool,
    pub profile_state: Option<&'static str>,
}

pub const TRANSITIONS: &[TransitionSeed] = &[
    TransitionSeed {
        from: StudentState::Prospect,
        to: StudentState::Enrolled,
        requires_reason: false,
        profile_state: Some("enrolled"),
    },
    TransitionSeed {
        from: StudentState::Enrolled,
        to: StudentState::Active,
        requires_reason: false,
        profile_state: Some("active"),
    },
    TransitionSeed {
        from: StudentState::Enrolled,
        to: StudentState::Withdrawn,
        requires_reason: true,
        profile_state: Some("off"),
    },
    TransitionSeed {
        from: StudentState::Active,
        to: StudentState::Inactive,
        requires_reason: true,
        profile_state: Some("restricted"),
    },
    TransitionSeed {
        from: StudentState::Inactive,
        to: StudentState::Active,
        requires_reason: true,
        profile_state: Some("active"),
    },
    TransitionSeed {
        from: StudentState::Active,
        to: StudentState::Graduated,
        requires_reason: false,
        profile_state: Some("alumni"),
    },
    TransitionSeed {
        from: StudentState::Active,
        to: StudentState::Withdrawn,
        requires_reason: true,
        profile_state: Some("off"),
    },
    TransitionSeed {
        from: StudentState::Inactive,
        to: StudentState::Withdrawn,
        requires_reason: true,
        profile_state: Some("off"),
    },
];

/// Validates the reason accompanying a transition against its rule.
pub fn reason_satisfies(requires_reason: bool, reason: Option<&str>) -> bool {
    !requires_reason || reason.is_some_and(|r| !r.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_self_transitions() {
        for t in TRANSITIONS {
            assert_ne!(t.from, t.to);
        }
    }

    #[test]
    fn test_transition_pairs_unique() {
        let mut seen = HashSet::new();
        for t in TRANSITIONS {
            assert!(seen.insert((t.from, t.to)), "{:?} -> {:?} duplicated", t.from, t.to);
        }
    }

    #[test]
    fn test_profile_state_codes_resolve() {
        let codes: HashSet<_> = PROFILE_STATES.iter().map(|p| p.code).collect();
        for t in TRANSITIONS {
            if let Some(code) = t.profile_state {
                assert!(codes.contains(code), "unknown profile state {code}");
            }
        }
    }

    #[test]
    fn test_reason_validation() {
        assert!(reason_satisfies(false, None));
        assert!(reason_satisfies(true, Some("freeze requested")));
        assert!(!reason_satisfies(true, None));
        assert!(!reason_satisfies(true, Some("   ")));
    }
}
