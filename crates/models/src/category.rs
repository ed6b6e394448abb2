use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of skill slots a curriculum unit carries. Unit completion requires
/// the checkpoint plus this many distinct attended skills.
pub const SKILLS_PER_UNIT: usize = 4;

/// What a subject is within the curriculum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SubjectCategory {
    /// Evaluable gate for a unit; always a prerequisite candidate.
    #[sea_orm(string_value = "checkpoint")]
    Checkpoint,
    /// One of exactly four content subjects per unit.
    #[sea_orm(string_value = "skill")]
    Skill,
    /// Spans a block of units, used as an evaluation milestone.
    #[sea_orm(string_value = "oral_test")]
    OralTest,
    #[sea_orm(string_value = "placement")]
    Placement,
    #[sea_orm(string_value = "master_class")]
    MasterClass,
    #[sea_orm(string_value = "conversation_club")]
    ConversationClub,
    #[sea_orm(string_value = "other")]
    Other,
}

impl SubjectCategory {
    /// Checkpoints gate their unit and are prerequisite-eligible no matter
    /// what the subject's own flag says.
    pub fn forces_prerequisite(self) -> bool {
        matches!(self, Self::Checkpoint)
    }

    /// Checkpoint and skill subjects carry a unit number.
    pub fn carries_unit_number(self) -> bool {
        matches!(self, Self::Checkpoint | Self::Skill)
    }

    /// Oral tests name an inclusive unit block instead of a single unit.
    pub fn carries_unit_block(self) -> bool {
        matches!(self, Self::OralTest)
    }

    /// Checkpoints and skills are pass/fail by attendance, not graded.
    pub fn evaluable_by_default(self) -> bool {
        !matches!(self, Self::Checkpoint | Self::Skill)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkpoint => "checkpoint",
            Self::Skill => "skill",
            Self::OralTest => "oral_test",
            Self::Placement => "placement",
            Self::MasterClass => "master_class",
            Self::ConversationClub => "conversation_club",
            Self::Other => "other",
        }
    }
}

impl Display for SubjectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Validates the (category, skill_slot) pairing for a subject write.
///
/// Skills must name a slot in 1..=4; every other category must not carry a
/// slot at all. Slots 5 and above are rejected outright: the progression
/// engine only ever counts four per unit.
pub fn validate_skill_slot(category: SubjectCategory, slot: Option<i16>) -> Result<(), String> {
    match (category, slot) {
        (SubjectCategory::Skill, Some(n)) if (1..=SKILLS_PER_UNIT as i16).contains(&n) => Ok(()),
        (SubjectCategory::Skill, Some(n)) => Err(format!(
            "skill slot must be between 1 and {SKILLS_PER_UNIT}, got {n}"
        )),
        (SubjectCategory::Skill, None) => Err("skill subjects require a skill slot".to_string()),
        (_, Some(_)) => Err(format!(
            "only skill subjects carry a skill slot, not {category}"
        )),
        (_, None) => Ok(()),
    }
}

/// Validates unit numbering for a subject write: checkpoints and skills need
/// a positive `unit_number`, oral tests need a well-formed inclusive block,
/// everything else carries neither.
pub fn validate_unit_fields(
    category: SubjectCategory,
    unit_number: Option<i32>,
    unit_block_start: Option<i32>,
    unit_block_end: Option<i32>,
) -> Result<(), String> {
    if category.carries_unit_number() {
        match unit_number {
            Some(n) if n >= 1 => {}
            Some(n) => return Err(format!("unit number must be positive, got {n}")),
            None => return Err(format!("{category} subjects require a unit number")),
        }
    }
    if category.carries_unit_block() {
        match (unit_block_start, unit_block_end) {
            (Some(from), Some(to)) if from >= 1 && to >= from => {}
            (Some(from), Some(to)) => {
                return Err(format!("invalid unit block {from}..={to}"));
            }
            _ => return Err("oral tests require a unit block range".to_string()),
        }
    } else if unit_block_start.is_some() || unit_block_end.is_some() {
        return Err(format!("only oral tests carry a unit block, not {category}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_slot_range() {
        for slot in 1..=4 {
            assert!(validate_skill_slot(SubjectCategory::Skill, Some(slot)).is_ok());
        }
        assert!(validate_skill_slot(SubjectCategory::Skill, Some(0)).is_err());
        assert!(validate_skill_slot(SubjectCategory::Skill, Some(5)).is_err());
        assert!(validate_skill_slot(SubjectCategory::Skill, None).is_err());
    }

    #[test]
    fn test_slot_forbidden_outside_skills() {
        assert!(validate_skill_slot(SubjectCategory::Checkpoint, Some(1)).is_err());
        assert!(validate_skill_slot(SubjectCategory::Checkpoint, None).is_ok());
        assert!(validate_skill_slot(SubjectCategory::OralTest, None).is_ok());
    }

    #[test]
    fn test_unit_fields_by_category() {
        assert!(validate_unit_fields(SubjectCategory::Checkpoint, Some(1), None, None).is_ok());
        assert!(validate_unit_fields(SubjectCategory::Checkpoint, None, None, None).is_err());
        assert!(validate_unit_fields(SubjectCategory::Skill, Some(0), None, None).is_err());
        assert!(validate_unit_fields(SubjectCategory::OralTest, None, Some(1), Some(4)).is_ok());
        assert!(validate_unit_fields(SubjectCategory::OralTest, None, Some(4), Some(1)).is_err());
        assert!(validate_unit_fields(SubjectCategory::OralTest, None, None, None).is_err());
        assert!(validate_unit_fields(SubjectCategory::Other, None, Some(1), Some(2)).is_err());
        assert!(validate_unit_fields(SubjectCategory::Other, None, None, None).is_ok());
    }

    #[test]
    fn test_checkpoint_is_always_prerequisite() {
        assert!(SubjectCategory::Checkpoint.forces_prerequisite());
        assert!(!SubjectCategory::Skill.forces_prerequisite());
        assert!(!SubjectCategory::OralTest.forces_prerequisite());
    }
}
