use crate::category::{SKILLS_PER_UNIT, SubjectCategory};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// A subject the student has an attended academic-history row for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendedRecord {
    pub subject_id: Uuid,
    pub category: SubjectCategory,
    pub unit_number: Option<i32>,
}

/// Attendance accumulated against one curriculum unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitProgress {
    pub checkpoint: bool,
    /// Distinct attended skill subjects. A retaken skill keeps a single
    /// entry here, so repetition never inflates the count.
    pub skills: HashSet<Uuid>,
}

impl UnitProgress {
    pub fn is_complete(&self) -> bool {
        self.checkpoint && self.skills.len() >= SKILLS_PER_UNIT
    }
}

/// Groups attended rows by unit number. Rows without a unit (oral tests,
/// electives, placement) carry no unit weight and are skipped.
pub fn unit_progress(attended: &[AttendedRecord]) -> BTreeMap<i32, UnitProgress> {
    let mut units: BTreeMap<i32, UnitProgress> = BTreeMap::new();

    for record in attended {
        let Some(unit) = record.unit_number else {
            continue;
        };
        let entry = units.entry(unit).or_default();
        match record.category {
            SubjectCategory::Checkpoint => entry.checkpoint = true,
            SubjectCategory::Skill => {
                entry.skills.insert(record.subject_id);
            }
            _ => {}
        }
    }

    units
}

/// Largest U such that every unit 1..=U has its checkpoint and at least
/// four distinct skills attended. The walk starts at unit 1 and stops at
/// the first incomplete unit, so an island of progress further up the
/// curriculum never counts.
pub fn max_completed_unit(attended: &[AttendedRecord]) -> i32 {
    let units = unit_progress(attended);

    let mut max_complete = 0;
    let mut unit = 1;
    while units.get(&unit).is_some_and(UnitProgress::is_complete) {
        max_complete = unit;
        unit += 1;
    }

    max_complete
}

/// A prerequisite edge target, carried with enough context to explain a
/// rejection to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteSubject {
    pub id: Uuid,
    pub name: String,
    pub category: SubjectCategory,
    pub unit_number: Option<i32>,
}

/// Result of a prerequisite check for a candidate booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteOutcome {
    pub missing: Vec<PrerequisiteSubject>,
}

impl PrerequisiteOutcome {
    pub fn satisfied() -> Self {
        Self { missing: Vec::new() }
    }

    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }

    /// Human-readable summary of what is missing. Skill gaps are collapsed
    /// per unit ("Skills of Unit 1 (4 missing)"); everything else is named
    /// individually.
    pub fn describe(&self) -> String {
        let mut skill_gaps: BTreeMap<i32, usize> = BTreeMap::new();
        let mut named = Vec::new();

        for subject in &self.missing {
            match (subject.category, subject.unit_number) {
                (SubjectCategory::Skill, Some(unit)) => {
                    *skill_gaps.entry(unit).or_insert(0) += 1;
                }
                _ => named.push(subject.name.clone()),
            }
        }

        let mut parts: Vec<String> = skill_gaps
            .into_iter()
            .map(|(unit, count)| format!("Skills of Unit {unit} ({count} missing)"))
            .collect();
        named.sort();
        parts.extend(named);

        parts.join(", ")
    }
}

/// Checks a candidate subject's prerequisites against what the student has
/// completed and what they already have on their calendar.
///
/// A prerequisite counts as satisfied when it has an attended history row,
/// or - for checkpoints only - when it appears in a future booked session
/// that has not been attended yet. That relaxation lets a student book the
/// skills of a unit once the unit's checkpoint is scheduled; skills never
/// receive it.
pub fn check_prerequisites(
    prerequisites: &[PrerequisiteSubject],
    completed: &HashSet<Uuid>,
    scheduled_checkpoints: &HashSet<Uuid>,
) -> PrerequisiteOutcome {
    let missing = prerequisites
        .iter()
        .filter(|subject| {
            if completed.contains(&subject.id) {
                return false;
            }
            if subject.category == SubjectCategory::Checkpoint
                && scheduled_checkpoints.contains(&subject.id)
            {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    PrerequisiteOutcome { missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(unit: i32) -> AttendedRecord {
        AttendedRecord {
            subject_id: Uuid::new_v4(),
            category: SubjectCategory::Checkpoint,
            unit_number: Some(unit),
        }
    }

    fn skill(unit: i32) -> AttendedRecord {
        AttendedRecord {
            subject_id: Uuid::new_v4(),
            category: SubjectCategory::Skill,
            unit_number: Some(unit),
        }
    }

    fn full_unit(unit: i32) -> Vec<AttendedRecord> {
        let mut rows = vec![checkpoint(unit)];
        rows.extend((0..4).map(|_| skill(unit)));
        rows
    }

    #[test]
    fn test_no_history_means_zero() {
        assert_eq!(max_completed_unit(&[]), 0);
    }

    #[test]
    fn test_checkpoint_alone_does_not_complete_unit() {
        // Scenario S1: checkpoint attended, no skills yet.
        let attended = vec![checkpoint(1)];
        assert_eq!(max_completed_unit(&attended), 0);
    }

    #[test]
    fn test_checkpoint_plus_four_skills_completes_unit() {
        // Scenario S2.
        let attended = full_unit(1);
        assert_eq!(max_completed_unit(&attended), 1);
    }

    #[test]
    fn test_three_skills_is_not_enough() {
        let mut attended = vec![checkpoint(1)];
        attended.extend((0..3).map(|_| skill(1)));
        assert_eq!(max_completed_unit(&attended), 0);
    }

    #[test]
    fn test_retaken_skill_counts_once() {
        let repeated = skill(1);
        let mut attended = vec![checkpoint(1), repeated.clone(), repeated.clone()];
        attended.extend((0..2).map(|_| skill(1)));
        // 3 distinct skills despite 4 skill rows.
        assert_eq!(max_completed_unit(&attended), 0);

        attended.push(skill(1));
        assert_eq!(max_completed_unit(&attended), 1);
    }

    #[test]
    fn test_walk_stops_at_first_gap() {
        // Unit 2 complete but unit 1 missing a skill: no unit counts.
        let mut attended = vec![checkpoint(1)];
        attended.extend((0..3).map(|_| skill(1)));
        attended.extend(full_unit(2));
        assert_eq!(max_completed_unit(&attended), 0);
    }

    #[test]
    fn test_consecutive_units_accumulate() {
        let mut attended = full_unit(1);
        attended.extend(full_unit(2));
        attended.extend(full_unit(3));
        assert_eq!(max_completed_unit(&attended), 3);
    }

    #[test]
    fn test_rows_without_unit_are_ignored() {
        let mut attended = full_unit(1);
        attended.push(AttendedRecord {
            subject_id: Uuid::new_v4(),
            category: SubjectCategory::OralTest,
            unit_number: None,
        });
        assert_eq!(max_completed_unit(&attended), 1);
    }

    #[test]
    fn test_idempotent_computation() {
        let attended = full_unit(1);
        assert_eq!(max_completed_unit(&attended), max_completed_unit(&attended));
    }

    fn prereq(name: &str, category: SubjectCategory, unit: Option<i32>) -> PrerequisiteSubject {
        PrerequisiteSubject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            unit_number: unit,
        }
    }

    #[test]
    fn test_no_prerequisites_admits() {
        let outcome = check_prerequisites(&[], &HashSet::new(), &HashSet::new());
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn test_completed_prerequisite_admits() {
        let p = prereq("Checkpoint 1", SubjectCategory::Checkpoint, Some(1));
        let completed = HashSet::from([p.id]);
        let outcome = check_prerequisites(&[p], &completed, &HashSet::new());
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn test_scheduled_checkpoint_relaxation() {
        // Scenario S3: the unit's checkpoint is booked but not attended.
        let p = prereq("Checkpoint 1", SubjectCategory::Checkpoint, Some(1));
        let scheduled = HashSet::from([p.id]);
        let outcome = check_prerequisites(&[p], &HashSet::new(), &scheduled);
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn test_scheduled_skill_gets_no_relaxation() {
        let p = prereq("Skill 1.1", SubjectCategory::Skill, Some(1));
        let scheduled = HashSet::from([p.id]);
        let outcome = check_prerequisites(&[p.clone()], &HashSet::new(), &scheduled);
        assert_eq!(outcome.missing, vec![p]);
    }

    #[test]
    fn test_missing_skills_grouped_by_unit() {
        // Scenario S3 rejection message: four skills of unit 1 missing.
        let prereqs: Vec<_> = (1..=4)
            .map(|slot| prereq(&format!("Skill 1.{slot}"), SubjectCategory::Skill, Some(1)))
            .collect();
        let outcome = check_prerequisites(&prereqs, &HashSet::new(), &HashSet::new());
        assert_eq!(outcome.describe(), "Skills of Unit 1 (4 missing)");
    }

    #[test]
    fn test_mixed_missing_description() {
        let mut prereqs = vec![
            prereq("Skill 2.1", SubjectCategory::Skill, Some(2)),
            prereq("Skill 2.2", SubjectCategory::Skill, Some(2)),
        ];
        prereqs.push(prereq("Oral Test A", SubjectCategory::OralTest, None));
        let outcome = check_prerequisites(&prereqs, &HashSet::new(), &HashSet::new());
        assert_eq!(
            outcome.describe(),
            "Skills of Unit 2 (2 missing), Oral Test A"
        );
    }
}
