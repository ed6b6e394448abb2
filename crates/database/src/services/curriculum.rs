use crate::entities::{
    elective_pool_subjects, elective_pools, levels, phases, plan_phases, plans, programs,
    subject_prerequisites, subjects,
};
use crate::error::AcademyError;
use crate::services::{next_table_code, now_utc};
use models::category::{self, SubjectCategory};
use models::states::ProgressMode;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct CreateProgram {
    pub name: String,
    pub kind: String,
}

pub struct CreatePlan {
    pub program_id: Uuid,
    pub name: String,
    pub version: String,
    pub valid_from: Option<chrono::NaiveDate>,
    pub valid_until: Option<chrono::NaiveDate>,
    pub is_current: bool,
    pub progress_mode: ProgressMode,
    pub total_hours: i32,
    pub is_courtesy: bool,
    /// Ordered subset of the program's phases this plan exposes.
    pub phase_ids: Vec<Uuid>,
}

pub struct CreatePhase {
    pub program_id: Uuid,
    pub name: String,
    pub sequence: i32,
    /// Set for courtesy phases that re-expose another phase's levels.
    pub level_source_phase_id: Option<Uuid>,
}

pub struct CreateLevel {
    pub phase_id: Uuid,
    pub name: String,
    pub sequence: i32,
    pub max_unit: i32,
}

pub struct CreateSubject {
    pub level_id: Option<Uuid>,
    pub name: String,
    pub category: SubjectCategory,
    pub sequence: i32,
    pub unit_number: Option<i32>,
    pub skill_slot: Option<i16>,
    pub unit_block_start: Option<i32>,
    pub unit_block_end: Option<i32>,
    pub is_prerequisite: bool,
    pub evaluable: Option<bool>,
}

pub struct CreateElectivePool {
    pub name: String,
    pub subject_ids: Vec<Uuid>,
}

pub struct CurriculumService;

impl CurriculumService {
    pub async fn create_program(
        db: &DatabaseConnection,
        cmd: CreateProgram,
    ) -> Result<programs::Model, AcademyError> {
        let txn = db.begin().await?;
        let code = next_table_code::<programs::Entity, _>(&txn, "PRG-").await?;

        let program = programs::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(cmd.name),
            kind: Set(cmd.kind),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(program)
    }

    pub async fn create_plan(
        db: &DatabaseConnection,
        cmd: CreatePlan,
    ) -> Result<plans::Model, AcademyError> {
        if cmd.total_hours < 0 {
            return Err(AcademyError::Validation(
                "plan total hours cannot be negative".to_string(),
            ));
        }
        if let (Some(from), Some(until)) = (cmd.valid_from, cmd.valid_until)
            && from > until
        {
            return Err(AcademyError::Validation(
                "plan validity window is inverted".to_string(),
            ));
        }

        let txn = db.begin().await?;

        programs::Entity::find_by_id(cmd.program_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("program"))?;

        // Soft invariant: warn (never fail) when two current versions of the
        // same program have overlapping validity windows.
        if cmd.is_current {
            let siblings = plans::Entity::find()
                .filter(plans::Column::ProgramId.eq(cmd.program_id))
                .filter(plans::Column::IsCurrent.eq(true))
                .all(&txn)
                .await?;
            for sibling in siblings {
                if windows_overlap(
                    (cmd.valid_from, cmd.valid_until),
                    (sibling.valid_from, sibling.valid_until),
                ) {
                    log::warn!(
                        "plan '{}' overlaps current-version plan {} of the same program",
                        cmd.name,
                        sibling.code
                    );
                }
            }
        }

        let code = next_table_code::<plans::Entity, _>(&txn, "PLN-").await?;
        let plan = plans::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(cmd.program_id),
            code: Set(code),
            name: Set(cmd.name),
            version: Set(cmd.version),
            valid_from: Set(cmd.valid_from),
            valid_until: Set(cmd.valid_until),
            is_current: Set(cmd.is_current),
            progress_mode: Set(cmd.progress_mode),
            total_hours: Set(cmd.total_hours),
            is_courtesy: Set(cmd.is_courtesy),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        for phase_id in &cmd.phase_ids {
            let phase = phases::Entity::find_by_id(*phase_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("phase"))?;
            if phase.program_id != cmd.program_id {
                txn.rollback().await?;
                return Err(AcademyError::Validation(format!(
                    "phase {} belongs to a different program",
                    phase.code
                )));
            }
            plan_phases::ActiveModel {
                id: Set(Uuid::new_v4()),
                plan_id: Set(plan.id),
                phase_id: Set(*phase_id),
                created_at: Set(now_utc()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(plan)
    }

    pub async fn create_phase(
        db: &DatabaseConnection,
        cmd: CreatePhase,
    ) -> Result<phases::Model, AcademyError> {
        let txn = db.begin().await?;

        programs::Entity::find_by_id(cmd.program_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("program"))?;

        if let Some(source_id) = cmd.level_source_phase_id {
            let source = phases::Entity::find_by_id(source_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("phase"))?;
            if source.program_id != cmd.program_id {
                return Err(AcademyError::Validation(
                    "shared levels must come from a phase of the same program".to_string(),
                ));
            }
        }

        let code = next_table_code::<phases::Entity, _>(&txn, "PH-").await?;
        let phase = phases::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(cmd.program_id),
            code: Set(code),
            name: Set(cmd.name),
            sequence: Set(cmd.sequence),
            level_source_phase_id: Set(cmd.level_source_phase_id),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(phase)
    }

    pub async fn create_level(
        db: &DatabaseConnection,
        cmd: CreateLevel,
    ) -> Result<levels::Model, AcademyError> {
        if cmd.max_unit < 1 {
            return Err(AcademyError::Validation(format!(
                "level max unit must be positive, got {}",
                cmd.max_unit
            )));
        }

        let txn = db.begin().await?;
        phases::Entity::find_by_id(cmd.phase_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("phase"))?;

        let code = next_table_code::<levels::Entity, _>(&txn, "LV-").await?;
        let level = levels::ActiveModel {
            id: Set(Uuid::new_v4()),
            phase_id: Set(cmd.phase_id),
            code: Set(code),
            name: Set(cmd.name),
            sequence: Set(cmd.sequence),
            max_unit: Set(cmd.max_unit),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(level)
    }

    pub async fn create_subject(
        db: &DatabaseConnection,
        cmd: CreateSubject,
    ) -> Result<subjects::Model, AcademyError> {
        category::validate_skill_slot(cmd.category, cmd.skill_slot)
            .map_err(AcademyError::Validation)?;
        category::validate_unit_fields(
            cmd.category,
            cmd.unit_number,
            cmd.unit_block_start,
            cmd.unit_block_end,
        )
        .map_err(AcademyError::Validation)?;

        let txn = db.begin().await?;

        if let Some(level_id) = cmd.level_id {
            levels::Entity::find_by_id(level_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("level"))?;
        }

        // Checkpoints gate their unit: the prerequisite flag cannot be unset.
        let is_prerequisite = cmd.is_prerequisite || cmd.category.forces_prerequisite();
        let evaluable = cmd
            .evaluable
            .unwrap_or_else(|| cmd.category.evaluable_by_default())
            && cmd.category.evaluable_by_default();

        let code = next_table_code::<subjects::Entity, _>(&txn, "A-").await?;
        let subject = subjects::ActiveModel {
            id: Set(Uuid::new_v4()),
            level_id: Set(cmd.level_id),
            code: Set(code),
            name: Set(cmd.name),
            category: Set(cmd.category),
            sequence: Set(cmd.sequence),
            unit_number: Set(cmd.unit_number),
            skill_slot: Set(cmd.skill_slot),
            unit_block_start: Set(cmd.unit_block_start),
            unit_block_end: Set(cmd.unit_block_end),
            is_prerequisite: Set(is_prerequisite),
            evaluable: Set(evaluable),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(subject)
    }

    pub async fn create_elective_pool(
        db: &DatabaseConnection,
        cmd: CreateElectivePool,
    ) -> Result<elective_pools::Model, AcademyError> {
        let txn = db.begin().await?;

        let code = next_table_code::<elective_pools::Entity, _>(&txn, "EP-").await?;
        let pool = elective_pools::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(cmd.name),
            created_at: Set(now_utc()),
            updated_at: Set(now_utc()),
        }
        .insert(&txn)
        .await?;

        for subject_id in &cmd.subject_ids {
            subjects::Entity::find_by_id(*subject_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("subject"))?;
            elective_pool_subjects::ActiveModel {
                id: Set(Uuid::new_v4()),
                pool_id: Set(pool.id),
                subject_id: Set(*subject_id),
                created_at: Set(now_utc()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(pool)
    }

    /// Replaces the prerequisite edge set of a subject, re-running cycle
    /// detection from the modified node before committing.
    pub async fn set_prerequisites(
        db: &DatabaseConnection,
        subject_id: Uuid,
        prerequisite_ids: Vec<Uuid>,
    ) -> Result<(), AcademyError> {
        let txn = db.begin().await?;

        let subject = subjects::Entity::find_by_id(subject_id)
            .one(&txn)
            .await?
            .ok_or(AcademyError::NotFound("subject"))?;

        let subject_level = match subject.level_id {
            Some(level_id) => levels::Entity::find_by_id(level_id).one(&txn).await?,
            None => None,
        };

        for prerequisite_id in &prerequisite_ids {
            if *prerequisite_id == subject_id {
                return Err(AcademyError::CycleDetected {
                    subject: subject.code.clone(),
                });
            }
            let prerequisite = subjects::Entity::find_by_id(*prerequisite_id)
                .one(&txn)
                .await?
                .ok_or(AcademyError::NotFound("subject"))?;

            // A prerequisite cannot sit on a later level than its dependent.
            if let (Some(level), Some(prereq_level_id)) = (&subject_level, prerequisite.level_id) {
                let prereq_level = levels::Entity::find_by_id(prereq_level_id)
                    .one(&txn)
                    .await?
                    .ok_or(AcademyError::NotFound("level"))?;
                if prereq_level.sequence > level.sequence {
                    return Err(AcademyError::Validation(format!(
                        "prerequisite {} sits on a later level than {}",
                        prerequisite.code, subject.code
                    )));
                }
            }
        }

        // Build the full edge map with the candidate edges swapped in, then
        // check whether the subject can reach itself.
        let all_edges = subject_prerequisites::Entity::find().all(&txn).await?;
        let mut graph: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for edge in &all_edges {
            if edge.subject_id != subject_id {
                graph.entry(edge.subject_id).or_default().push(edge.prerequisite_id);
            }
        }
        graph.insert(subject_id, prerequisite_ids.clone());

        if reaches(&graph, subject_id, subject_id) {
            return Err(AcademyError::CycleDetected {
                subject: subject.code.clone(),
            });
        }

        subject_prerequisites::Entity::delete_many()
            .filter(subject_prerequisites::Column::SubjectId.eq(subject_id))
            .exec(&txn)
            .await?;
        for prerequisite_id in prerequisite_ids {
            subject_prerequisites::ActiveModel {
                id: Set(Uuid::new_v4()),
                subject_id: Set(subject_id),
                prerequisite_id: Set(prerequisite_id),
                created_at: Set(now_utc()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Direct prerequisites of a subject.
    pub async fn prerequisites_of<C: ConnectionTrait>(
        conn: &C,
        subject_id: Uuid,
    ) -> Result<Vec<subjects::Model>, AcademyError> {
        let edges = subject_prerequisites::Entity::find()
            .filter(subject_prerequisites::Column::SubjectId.eq(subject_id))
            .all(conn)
            .await?;
        let ids: Vec<Uuid> = edges.iter().map(|e| e.prerequisite_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(ids))
            .all(conn)
            .await?)
    }

    /// Transitive prerequisite closure of a subject (excluding itself),
    /// computed by iterative traversal over the edge table.
    pub async fn prerequisite_closure<C: ConnectionTrait>(
        conn: &C,
        subject_id: Uuid,
    ) -> Result<HashSet<Uuid>, AcademyError> {
        let all_edges = subject_prerequisites::Entity::find().all(conn).await?;
        let mut graph: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for edge in all_edges {
            graph.entry(edge.subject_id).or_default().push(edge.prerequisite_id);
        }

        let mut closure = HashSet::new();
        let mut stack = vec![subject_id];
        while let Some(node) = stack.pop() {
            for next in graph.get(&node).into_iter().flatten() {
                if closure.insert(*next) {
                    stack.push(*next);
                }
            }
        }
        closure.remove(&subject_id);
        Ok(closure)
    }

    /// Flattens a plan into subject order: phases by (sequence, id), levels
    /// by (sequence, id), subjects by (sequence, id). Phases that share
    /// levels with another phase contribute that phase's levels.
    pub async fn plan_order<C: ConnectionTrait>(
        conn: &C,
        plan_id: Uuid,
    ) -> Result<Vec<subjects::Model>, AcademyError> {
        let junction = plan_phases::Entity::find()
            .filter(plan_phases::Column::PlanId.eq(plan_id))
            .all(conn)
            .await?;
        let phase_ids: Vec<Uuid> = junction.iter().map(|j| j.phase_id).collect();
        if phase_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut plan_phases_list = phases::Entity::find()
            .filter(phases::Column::Id.is_in(phase_ids))
            .all(conn)
            .await?;
        plan_phases_list.sort_by_key(|p| (p.sequence, p.id));

        let mut ordered = Vec::new();
        for phase in plan_phases_list {
            // Courtesy phases expose the levels of their source phase.
            let level_owner = phase.level_source_phase_id.unwrap_or(phase.id);
            let mut phase_levels = levels::Entity::find()
                .filter(levels::Column::PhaseId.eq(level_owner))
                .all(conn)
                .await?;
            phase_levels.sort_by_key(|l| (l.sequence, l.id));

            for level in phase_levels {
                let mut level_subjects = subjects::Entity::find()
                    .filter(subjects::Column::LevelId.eq(level.id))
                    .all(conn)
                    .await?;
                level_subjects.sort_by_key(|s| (s.sequence, s.id));
                ordered.extend(level_subjects);
            }
        }
        Ok(ordered)
    }

    /// The subject after `current` in plan order, if any.
    pub async fn next_subject_in_plan<C: ConnectionTrait>(
        conn: &C,
        plan_id: Uuid,
        current_subject_id: Uuid,
    ) -> Result<Option<subjects::Model>, AcademyError> {
        let ordered = Self::plan_order(conn, plan_id).await?;
        let position = ordered.iter().position(|s| s.id == current_subject_id);
        Ok(match position {
            Some(index) => ordered.into_iter().nth(index + 1),
            None => None,
        })
    }

    /// Every subject of a program, in phase/level/subject order. Enrollment
    /// progress rows are generated from this set.
    pub async fn program_subjects<C: ConnectionTrait>(
        conn: &C,
        program_id: Uuid,
    ) -> Result<Vec<subjects::Model>, AcademyError> {
        let mut program_phases = phases::Entity::find()
            .filter(phases::Column::ProgramId.eq(program_id))
            .all(conn)
            .await?;
        program_phases.sort_by_key(|p| (p.sequence, p.id));

        let mut ordered = Vec::new();
        let mut seen_levels = HashSet::new();
        for phase in program_phases {
            if phase.level_source_phase_id.is_some() {
                // Shared levels already contribute through their owner.
                continue;
            }
            let mut phase_levels = levels::Entity::find()
                .filter(levels::Column::PhaseId.eq(phase.id))
                .all(conn)
                .await?;
            phase_levels.sort_by_key(|l| (l.sequence, l.id));
            for level in phase_levels {
                if !seen_levels.insert(level.id) {
                    continue;
                }
                let mut level_subjects = subjects::Entity::find()
                    .filter(subjects::Column::LevelId.eq(level.id))
                    .all(conn)
                    .await?;
                level_subjects.sort_by_key(|s| (s.sequence, s.id));
                ordered.extend(level_subjects);
            }
        }
        Ok(ordered)
    }

    /// Subjects of an elective pool ordered by (sequence, code).
    pub async fn pool_subjects<C: ConnectionTrait>(
        conn: &C,
        pool_id: Uuid,
    ) -> Result<Vec<subjects::Model>, AcademyError> {
        let junction = elective_pool_subjects::Entity::find()
            .filter(elective_pool_subjects::Column::PoolId.eq(pool_id))
            .all(conn)
            .await?;
        let ids: Vec<Uuid> = junction.iter().map(|j| j.subject_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut pool = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(ids))
            .all(conn)
            .await?;
        pool.sort_by(|a, b| (a.sequence, &a.code).cmp(&(b.sequence, &b.code)));
        Ok(pool)
    }

}

/// Whether `subject` can reach `target` through the prerequisite edges.
fn reaches(graph: &HashMap<Uuid, Vec<Uuid>>, from: Uuid, target: Uuid) -> bool {
    let mut visited = HashSet::new();
    let mut stack: Vec<Uuid> = graph.get(&from).cloned().unwrap_or_default();
    while let Some(node) = stack.pop() {
        if node == target {
            return true;
        }
        if visited.insert(node) {
            stack.extend(graph.get(&node).cloned().unwrap_or_default());
        }
    }
    false
}

fn windows_overlap(
    a: (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>),
    b: (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>),
) -> bool {
    let a_from = a.0.unwrap_or(chrono::NaiveDate::MIN);
    let a_until = a.1.unwrap_or(chrono::NaiveDate::MAX);
    let b_from = b.0.unwrap_or(chrono::NaiveDate::MIN);
    let b_until = b.1.unwrap_or(chrono::NaiveDate::MAX);
    a_from <= b_until && b_from <= a_until
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_detects_cycle_paths() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut graph: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        graph.insert(a, vec![b]);
        graph.insert(b, vec![c]);

        assert!(reaches(&graph, a, c));
        assert!(!reaches(&graph, c, a));

        // Closing the loop c -> a makes a reachable from itself.
        graph.insert(c, vec![a]);
        assert!(reaches(&graph, a, a));
    }

    #[test]
    fn test_validity_window_overlap() {
        let date = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert!(windows_overlap(
            (Some(date(2025, 1, 1)), Some(date(2025, 6, 30))),
            (Some(date(2025, 6, 1)), Some(date(2025, 12, 31))),
        ));
        assert!(!windows_overlap(
            (Some(date(2025, 1, 1)), Some(date(2025, 5, 31))),
            (Some(date(2025, 6, 1)), Some(date(2025, 12, 31))),
        ));
        // Open-ended windows overlap everything on that side.
        assert!(windows_overlap(
            (None, None),
            (Some(date(2025, 6, 1)), Some(date(2025, 12, 31))),
        ));
    }
}
