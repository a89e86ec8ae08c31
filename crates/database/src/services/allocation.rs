use crate::{
    entities::{assessment_clo, clo},
    error::ServiceError,
    services::{
        access::{self, Principal, find_active_assessment, require_assessment_owner},
        assessment::lifecycle_state,
    },
};
use log::{info, warn};
use models::{
    lifecycle::AssessmentState,
    marks::{allocation_matches, default_weightage, round2},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One CLO's requested share of an assessment
#[derive(Debug, Clone)]
pub struct AllocationInput {
    pub clo_id: Uuid,
    pub marks_allocated: f64,
    pub weightage: Option<f64>,
    pub bloom_level: Option<String>,
}

/// A course CLO with whatever the assessment allocates to it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloAllocation {
    pub clo_id: Uuid,
    pub code: String,
    pub statement: String,
    pub bloom_level: String,
    pub marks_allocated: f64,
    pub weightage: f64,
    pub is_allocated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    pub max_marks: f64,
    pub total_allocated: f64,
    pub remaining: f64,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAllocations {
    pub assessment_id: Uuid,
    pub clos: Vec<CloAllocation>,
    pub summary: AllocationSummary,
}

pub struct AllocationService;

impl AllocationService {
    /// Replaces every CLO allocation of an assessment.
    ///
    /// The allocations must cover the assessment's max marks exactly.
    pub async fn replace(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
        allocations: Vec<AllocationInput>,
    ) -> Result<Vec<assessment_clo::Model>, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        require_assessment_owner(&faculty, &assessment, "modify CLO allocations of")?;

        let (state, marks_count) = lifecycle_state(db, &assessment).await?;
        match state {
            AssessmentState::Open => {}
            AssessmentState::Finalized => {
                return Err(ServiceError::MarksFinalized {
                    finalized_at: assessment.marks_finalized_at,
                });
            }
            AssessmentState::MarksEntered => {
                return Err(ServiceError::LockedByMarks {
                    message: "Cannot modify CLO allocations after marks have been entered".into(),
                    marks_count,
                    disallowed_fields: vec!["clos".into()],
                });
            }
        }

        validate_allocations(&allocations)?;

        let total_allocated: f64 = allocations.iter().map(|a| a.marks_allocated).sum();
        if !allocation_matches(total_allocated, assessment.max_marks) {
            warn!(
                "Allocation for assessment {} sums to {total_allocated}, expected {}",
                assessment.id, assessment.max_marks
            );
            return Err(ServiceError::AllocationMismatch {
                total_allocated,
                max_marks: assessment.max_marks,
            });
        }

        let requested: Vec<Uuid> = allocations.iter().map(|a| a.clo_id).collect();
        let course_clos = active_clos(db, assessment.course_id, Some(&requested)).await?;
        let known: HashSet<Uuid> = course_clos.iter().map(|c| c.id).collect();
        let foreign: Vec<Uuid> = requested
            .iter()
            .copied()
            .filter(|id| !known.contains(id))
            .collect();
        if !foreign.is_empty() {
            return Err(ServiceError::ForeignClos { clo_ids: foreign });
        }

        let txn = db.begin().await?;

        assessment_clo::Entity::delete_many()
            .filter(assessment_clo::Column::AssessmentId.eq(assessment.id))
            .exec(&txn)
            .await?;

        let rows: Vec<assessment_clo::ActiveModel> = allocations
            .iter()
            .map(|a| assessment_clo::ActiveModel {
                id: Set(Uuid::new_v4()),
                assessment_id: Set(assessment.id),
                clo_id: Set(a.clo_id),
                marks_allocated: Set(a.marks_allocated),
                weightage: Set(a
                    .weightage
                    .unwrap_or_else(|| round2(default_weightage(a.marks_allocated, assessment.max_marks)))),
                bloom_level: Set(a.bloom_level.clone()),
            })
            .collect();

        if !rows.is_empty() {
            assessment_clo::Entity::insert_many(rows).exec(&txn).await?;
        }

        let saved = assessment_clo::Entity::find()
            .filter(assessment_clo::Column::AssessmentId.eq(assessment.id))
            .all(&txn)
            .await?;

        txn.commit().await?;

        info!(
            "Faculty {} allocated {} CLO(s) to assessment {}",
            faculty.id,
            saved.len(),
            assessment.id
        );
        Ok(saved)
    }

    /// Every active course CLO with its allocation for the assessment
    pub async fn get(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<AssessmentAllocations, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        require_assessment_owner(&faculty, &assessment, "view CLO allocations of")?;

        let allocations: HashMap<Uuid, assessment_clo::Model> = assessment_clo::Entity::find()
            .filter(assessment_clo::Column::AssessmentId.eq(assessment.id))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.clo_id, a))
            .collect();

        let clos: Vec<CloAllocation> = active_clos(db, assessment.course_id, None)
            .await?
            .into_iter()
            .map(|clo| {
                let allocation = allocations.get(&clo.id);
                CloAllocation {
                    clo_id: clo.id,
                    code: clo.code,
                    statement: clo.statement,
                    bloom_level: allocation
                        .and_then(|a| a.bloom_level.clone())
                        .unwrap_or(clo.bloom_level),
                    marks_allocated: allocation.map_or(0.0, |a| a.marks_allocated),
                    weightage: allocation.map_or(0.0, |a| a.weightage),
                    is_allocated: allocation.is_some(),
                }
            })
            .collect();

        let total_allocated: f64 = allocations.values().map(|a| a.marks_allocated).sum();

        Ok(AssessmentAllocations {
            assessment_id: assessment.id,
            clos,
            summary: AllocationSummary {
                max_marks: assessment.max_marks,
                total_allocated: round2(total_allocated),
                remaining: round2(assessment.max_marks - total_allocated),
                is_complete: allocation_matches(total_allocated, assessment.max_marks),
            },
        })
    }

    /// Active CLOs of a course the faculty teaches
    pub async fn course_clos(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<Vec<clo::Model>, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        access::require_assignment(db, faculty.id, course_id, None).await?;

        active_clos(db, course_id, None).await
    }
}

fn validate_allocations(allocations: &[AllocationInput]) -> Result<(), ServiceError> {
    if allocations.is_empty() {
        return Err(ServiceError::validation("At least one CLO allocation is required"));
    }

    let mut seen = HashSet::new();
    for allocation in allocations {
        if !seen.insert(allocation.clo_id) {
            return Err(ServiceError::validation(format!(
                "CLO {} is allocated more than once",
                allocation.clo_id
            )));
        }
        if !allocation.marks_allocated.is_finite() || allocation.marks_allocated < 0.0 {
            return Err(ServiceError::validation(
                "Allocated marks must be a non-negative number",
            ));
        }
        if allocation
            .weightage
            .is_some_and(|w| !w.is_finite() || w < 0.0)
        {
            return Err(ServiceError::validation("Weightage cannot be negative"));
        }
    }

    Ok(())
}

/// Active CLOs of a course in display order, optionally restricted to ids
pub(crate) async fn active_clos<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
    ids: Option<&[Uuid]>,
) -> Result<Vec<clo::Model>, ServiceError> {
    let mut query = clo::Entity::find()
        .filter(clo::Column::CourseId.eq(course_id))
        .filter(clo::Column::IsActive.eq(true));

    if let Some(ids) = ids {
        query = query.filter(clo::Column::Id.is_in(ids.to_vec()));
    }

    Ok(query
        .order_by_asc(clo::Column::DisplayOrder)
        .order_by_asc(clo::Column::Code)
        .all(db)
        .await?)
}
