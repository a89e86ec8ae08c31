use crate::{
    entities::{clo, clo_po_mapping, clo_pso_mapping, department, po, program, pso},
    error::ServiceError,
    services::{access::Principal, allocation::active_clos},
};
use log::{debug, info};
use models::outcome::MappingLevel;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// A requested CLO to PO link; incomplete entries are dropped
#[derive(Debug, Clone, Default)]
pub struct PoMappingInput {
    pub clo_id: Option<Uuid>,
    pub po_id: Option<Uuid>,
    pub level: Option<i32>,
}

/// A requested CLO to PSO link; incomplete entries are dropped
#[derive(Debug, Clone, Default)]
pub struct PsoMappingInput {
    pub clo_id: Option<Uuid>,
    pub pso_id: Option<Uuid>,
    pub level: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOutcomes {
    pub course_id: Uuid,
    pub program: Option<program::Model>,
    pub clos: Vec<clo::Model>,
    pub pos: Vec<po::Model>,
    pub psos: Vec<pso::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMappings {
    pub po_mappings: Vec<clo_po_mapping::Model>,
    pub pso_mappings: Vec<clo_pso_mapping::Model>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingReplacement {
    pub clos_affected: usize,
    pub po_mappings: usize,
    pub pso_mappings: usize,
}

pub struct OutcomeMappingService;

impl OutcomeMappingService {
    /// POs and PSOs of the programme the course's department belongs to
    pub async fn available_outcomes(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<AvailableOutcomes, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let program = match department::Entity::find_by_id(course.department_id)
            .one(db)
            .await?
        {
            Some(department) => program::Entity::find_by_id(department.program_id)
                .one(db)
                .await?,
            None => None,
        };

        let (pos, psos) = match &program {
            Some(program) => (
                po::Entity::find()
                    .filter(po::Column::ProgramId.eq(program.id))
                    .order_by_asc(po::Column::Code)
                    .all(db)
                    .await?,
                pso::Entity::find()
                    .filter(pso::Column::ProgramId.eq(program.id))
                    .order_by_asc(pso::Column::Code)
                    .all(db)
                    .await?,
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(AvailableOutcomes {
            course_id: course.id,
            clos: active_clos(db, course.id, None).await?,
            program,
            pos,
            psos,
        })
    }

    /// Replaces all PO and PSO mappings of every CLO named in the request.
    ///
    /// Running the same request twice leaves the same rows behind.
    pub async fn replace(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        po_mappings: Vec<PoMappingInput>,
        pso_mappings: Vec<PsoMappingInput>,
    ) -> Result<MappingReplacement, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let po_links = sanitize(
            po_mappings
                .into_iter()
                .map(|m| (m.clo_id, m.po_id, m.level)),
        );
        let pso_links = sanitize(
            pso_mappings
                .into_iter()
                .map(|m| (m.clo_id, m.pso_id, m.level)),
        );

        let clo_ids: Vec<Uuid> = po_links
            .iter()
            .chain(pso_links.iter())
            .map(|(clo_id, _, _)| *clo_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if clo_ids.is_empty() {
            return Err(ServiceError::NoValidMappings);
        }

        let course_clos: HashSet<Uuid> = clo::Entity::find()
            .filter(clo::Column::CourseId.eq(course.id))
            .filter(clo::Column::Id.is_in(clo_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let foreign: Vec<Uuid> = clo_ids
            .iter()
            .copied()
            .filter(|id| !course_clos.contains(id))
            .collect();
        if !foreign.is_empty() {
            return Err(ServiceError::ForeignClos { clo_ids: foreign });
        }

        let program_id = course_program_id(db, course.department_id).await?;
        let po_ids: BTreeSet<Uuid> = po_links.iter().map(|(_, id, _)| *id).collect();
        if !po_ids.is_empty() {
            let found = po::Entity::find()
                .filter(po::Column::Id.is_in(po_ids.iter().copied().collect::<Vec<_>>()))
                .filter(po::Column::ProgramId.eq(program_id))
                .count(db)
                .await?;
            require_all_found(found, po_ids.len(), "PO")?;
        }
        let pso_ids: BTreeSet<Uuid> = pso_links.iter().map(|(_, id, _)| *id).collect();
        if !pso_ids.is_empty() {
            let found = pso::Entity::find()
                .filter(pso::Column::Id.is_in(pso_ids.iter().copied().collect::<Vec<_>>()))
                .filter(pso::Column::ProgramId.eq(program_id))
                .count(db)
                .await?;
            require_all_found(found, pso_ids.len(), "PSO")?;
        }

        let txn = db.begin().await?;

        clo_po_mapping::Entity::delete_many()
            .filter(clo_po_mapping::Column::CloId.is_in(clo_ids.clone()))
            .exec(&txn)
            .await?;
        clo_pso_mapping::Entity::delete_many()
            .filter(clo_pso_mapping::Column::CloId.is_in(clo_ids.clone()))
            .exec(&txn)
            .await?;

        let po_rows: Vec<clo_po_mapping::ActiveModel> = po_links
            .iter()
            .map(|(clo_id, po_id, level)| clo_po_mapping::ActiveModel {
                id: Set(Uuid::new_v4()),
                clo_id: Set(*clo_id),
                po_id: Set(*po_id),
                level: Set(level.value()),
            })
            .collect();
        let pso_rows: Vec<clo_pso_mapping::ActiveModel> = pso_links
            .iter()
            .map(|(clo_id, pso_id, level)| clo_pso_mapping::ActiveModel {
                id: Set(Uuid::new_v4()),
                clo_id: Set(*clo_id),
                pso_id: Set(*pso_id),
                level: Set(level.value()),
            })
            .collect();

        if !po_rows.is_empty() {
            clo_po_mapping::Entity::insert_many(po_rows).exec(&txn).await?;
        }
        if !pso_rows.is_empty() {
            clo_pso_mapping::Entity::insert_many(pso_rows)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        let replacement = MappingReplacement {
            clos_affected: clo_ids.len(),
            po_mappings: po_links.len(),
            pso_mappings: pso_links.len(),
        };
        info!(
            "User {} replaced mappings of course {}: {} CLO(s), {} PO link(s), {} PSO link(s)",
            principal.user_id(),
            course.code,
            replacement.clos_affected,
            replacement.po_mappings,
            replacement.pso_mappings
        );
        Ok(replacement)
    }

    /// All PO and PSO mappings of the course's CLOs
    pub async fn mappings(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<CourseMappings, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let clo_ids: Vec<Uuid> = clo::Entity::find()
            .filter(clo::Column::CourseId.eq(course.id))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if clo_ids.is_empty() {
            return Ok(CourseMappings {
                po_mappings: Vec::new(),
                pso_mappings: Vec::new(),
            });
        }

        Ok(CourseMappings {
            po_mappings: clo_po_mapping::Entity::find()
                .filter(clo_po_mapping::Column::CloId.is_in(clo_ids.clone()))
                .all(db)
                .await?,
            pso_mappings: clo_pso_mapping::Entity::find()
                .filter(clo_pso_mapping::Column::CloId.is_in(clo_ids))
                .all(db)
                .await?,
        })
    }
}

/// Keeps complete entries with a valid level; the first entry per pair wins
fn sanitize(
    entries: impl IntoIterator<Item = (Option<Uuid>, Option<Uuid>, Option<i32>)>,
) -> Vec<(Uuid, Uuid, MappingLevel)> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for entry in entries {
        let (Some(clo_id), Some(outcome_id), Some(level)) = entry else {
            debug!("Dropping incomplete mapping entry {entry:?}");
            continue;
        };
        let Some(level) = MappingLevel::new(level) else {
            debug!("Dropping mapping {clo_id} -> {outcome_id} with level {level}");
            continue;
        };
        if seen.insert((clo_id, outcome_id)) {
            links.push((clo_id, outcome_id, level));
        }
    }

    links
}

async fn course_program_id<C: ConnectionTrait>(
    db: &C,
    department_id: Uuid,
) -> Result<Uuid, ServiceError> {
    department::Entity::find_by_id(department_id)
        .one(db)
        .await?
        .map(|d| d.program_id)
        .ok_or_else(|| ServiceError::not_found("Department", department_id))
}

fn require_all_found(found: u64, requested: usize, label: &str) -> Result<(), ServiceError> {
    if found as usize != requested {
        return Err(ServiceError::validation(format!(
            "Some {label}s do not belong to this course's programme"
        )));
    }
    Ok(())
}
