use crate::{
    entities::{clo, course, course_faculty, department, faculty, po, program},
    error::ServiceError,
    services::{
        access::Principal,
        assessment::{CourseBrief, FacultyBrief},
    },
};
use chrono::{Datelike, Utc};
use models::catalog::CourseType;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
};
use uuid::Uuid;

/// Entries in each top-N ranking
const TOP_N: usize = 5;
const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_courses: u64,
    #[serde(rename = "activeCLOs")]
    pub active_clos: u64,
    pub programmes_count: u64,
    pub program_outcomes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadCourse {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub course_type: CourseType,
}

/// Teaching load of one faculty member in one term
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermLoad {
    pub year: i32,
    pub semester: i32,
    pub total_credits: i32,
    pub course_count: usize,
    pub courses: Vec<WorkloadCourse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyWorkload {
    pub faculty: FacultyBrief,
    pub department: String,
    pub assignments: Vec<course_faculty::Model>,
    pub workload_summary: Vec<TermLoad>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOverview {
    pub total_assignments: u64,
    pub current_year_assignments: u64,
    pub current_year: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterCount {
    pub semester: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFaculty {
    pub faculty_id: Uuid,
    pub name: String,
    pub designation: Option<String>,
    pub assignment_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCourse {
    pub course_id: Uuid,
    pub code: String,
    pub name: String,
    pub semester: i32,
    pub faculty_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    pub overview: AssignmentOverview,
    pub by_semester: Vec<SemesterCount>,
    pub top_faculties: Vec<TopFaculty>,
    pub top_courses: Vec<TopCourse>,
}

/// Filters for the department assignment listing
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub faculty_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub active_courses: u64,
    pub active_faculties: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRow {
    #[serde(flatten)]
    pub assignment: course_faculty::Model,
    pub faculty: Option<FacultyBrief>,
    pub course: Option<CourseBrief>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub total_assignments: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub semesters: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAssignments {
    pub department: DepartmentSummary,
    pub assignments: Vec<AssignmentRow>,
    pub summary: PageSummary,
    pub filters: FilterOptions,
}

/// Read-only rollups for heads of department
pub struct StatsService;

impl StatsService {
    pub async fn dashboard(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<DashboardStats, ServiceError> {
        let department = principal.headed_department(db).await?;

        let total_courses = course::Entity::find()
            .filter(course::Column::DepartmentId.eq(department.id))
            .filter(course::Column::IsActive.eq(true))
            .count(db)
            .await?;

        let course_ids = department_course_ids(db, department.id).await?;
        let active_clos = if course_ids.is_empty() {
            0
        } else {
            clo::Entity::find()
                .filter(clo::Column::CourseId.is_in(course_ids))
                .filter(clo::Column::IsActive.eq(true))
                .count(db)
                .await?
        };

        let programmes_count = program::Entity::find()
            .filter(program::Column::Id.eq(department.program_id))
            .count(db)
            .await?;
        let program_outcomes = po::Entity::find()
            .filter(po::Column::ProgramId.eq(department.program_id))
            .count(db)
            .await?;

        Ok(DashboardStats {
            total_courses,
            active_clos,
            programmes_count,
            program_outcomes,
        })
    }

    /// A faculty member's assignments grouped by term
    pub async fn faculty_workload(
        db: &DatabaseConnection,
        principal: &Principal,
        faculty_id: Uuid,
        year: Option<i32>,
    ) -> Result<FacultyWorkload, ServiceError> {
        let faculty = principal.require_faculty_hod(db, faculty_id).await?;
        let department = department::Entity::find_by_id(faculty.department_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", faculty.department_id))?;

        let mut query = course_faculty::Entity::find()
            .filter(course_faculty::Column::FacultyId.eq(faculty.id));
        if let Some(year) = year {
            query = query.filter(course_faculty::Column::Year.eq(year));
        }
        let rows = query
            .find_also_related(course::Entity)
            .order_by_desc(course_faculty::Column::Year)
            .order_by_asc(course_faculty::Column::Semester)
            .all(db)
            .await?;

        // Newest year first, semesters ascending within a year
        let mut terms: BTreeMap<(Reverse<i32>, i32), TermLoad> = BTreeMap::new();
        for (assignment, course) in &rows {
            let Some(course) = course else { continue };
            let load = terms
                .entry((Reverse(assignment.year), assignment.semester))
                .or_insert_with(|| TermLoad {
                    year: assignment.year,
                    semester: assignment.semester,
                    total_credits: 0,
                    course_count: 0,
                    courses: Vec::new(),
                });
            load.total_credits += course.credits;
            load.course_count += 1;
            load.courses.push(WorkloadCourse {
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                credits: course.credits,
                course_type: course.course_type,
            });
        }

        Ok(FacultyWorkload {
            faculty: FacultyBrief::from(&faculty),
            department: department.name,
            assignments: rows.into_iter().map(|(assignment, _)| assignment).collect(),
            workload_summary: terms.into_values().collect(),
        })
    }

    /// Assignment counts for the caller's department
    pub async fn assignment_stats(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<AssignmentStats, ServiceError> {
        let department = principal.headed_department(db).await?;
        let current_year = Utc::now().year();

        let course_ids = department_course_ids(db, department.id).await?;
        if course_ids.is_empty() {
            return Ok(AssignmentStats {
                overview: AssignmentOverview {
                    total_assignments: 0,
                    current_year_assignments: 0,
                    current_year,
                },
                by_semester: Vec::new(),
                top_faculties: Vec::new(),
                top_courses: Vec::new(),
            });
        }

        let total_assignments = course_faculty::Entity::find()
            .filter(course_faculty::Column::CourseId.is_in(course_ids.clone()))
            .count(db)
            .await?;

        let this_year = course_faculty::Entity::find()
            .filter(course_faculty::Column::CourseId.is_in(course_ids))
            .filter(course_faculty::Column::Year.eq(current_year))
            .all(db)
            .await?;

        let mut by_semester: BTreeMap<i32, usize> = BTreeMap::new();
        let mut per_faculty: HashMap<Uuid, usize> = HashMap::new();
        let mut per_course: HashMap<Uuid, usize> = HashMap::new();
        for assignment in &this_year {
            *by_semester.entry(assignment.semester).or_default() += 1;
            *per_faculty.entry(assignment.faculty_id).or_default() += 1;
            *per_course.entry(assignment.course_id).or_default() += 1;
        }

        let top_faculty_ids = top_n(per_faculty);
        let faculties: HashMap<Uuid, faculty::Model> = faculty::Entity::find()
            .filter(faculty::Column::Id.is_in(top_faculty_ids.iter().map(|(id, _)| *id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        let top_course_ids = top_n(per_course);
        let courses: HashMap<Uuid, course::Model> = course::Entity::find()
            .filter(course::Column::Id.is_in(top_course_ids.iter().map(|(id, _)| *id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(AssignmentStats {
            overview: AssignmentOverview {
                total_assignments,
                current_year_assignments: this_year.len() as u64,
                current_year,
            },
            by_semester: by_semester
                .into_iter()
                .map(|(semester, count)| SemesterCount { semester, count })
                .collect(),
            top_faculties: top_faculty_ids
                .into_iter()
                .map(|(faculty_id, assignment_count)| {
                    let faculty = faculties.get(&faculty_id);
                    TopFaculty {
                        faculty_id,
                        name: faculty.map_or_else(|| "Unknown".into(), |f| f.name.clone()),
                        designation: faculty.and_then(|f| f.designation.clone()),
                        assignment_count,
                    }
                })
                .collect(),
            top_courses: top_course_ids
                .into_iter()
                .map(|(course_id, faculty_count)| {
                    let course = courses.get(&course_id);
                    TopCourse {
                        course_id,
                        code: course.map_or_else(|| "Unknown".into(), |c| c.code.clone()),
                        name: course.map_or_else(|| "Unknown".into(), |c| c.name.clone()),
                        semester: course.map_or(0, |c| c.semester),
                        faculty_count,
                    }
                })
                .collect(),
        })
    }

    /// Paginated, filterable assignments across the caller's department
    pub async fn department_assignments(
        db: &DatabaseConnection,
        principal: &Principal,
        filter: AssignmentFilter,
    ) -> Result<DepartmentAssignments, ServiceError> {
        let department = principal.headed_department(db).await?;
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let course_ids = department_course_ids(db, department.id).await?;

        let mut condition =
            Condition::all().add(course_faculty::Column::CourseId.is_in(course_ids.clone()));
        if let Some(semester) = filter.semester {
            condition = condition.add(course_faculty::Column::Semester.eq(semester));
        }
        if let Some(year) = filter.year {
            condition = condition.add(course_faculty::Column::Year.eq(year));
        }
        if let Some(faculty_id) = filter.faculty_id {
            condition = condition.add(course_faculty::Column::FacultyId.eq(faculty_id));
        }
        if let Some(course_id) = filter.course_id {
            condition = condition.add(course_faculty::Column::CourseId.eq(course_id));
        }

        let query = course_faculty::Entity::find()
            .filter(condition)
            .order_by_desc(course_faculty::Column::Year)
            .order_by_desc(course_faculty::Column::Semester)
            .order_by_desc(course_faculty::Column::CreatedAt);

        let total_assignments = query.clone().count(db).await?;
        let assignments = query.paginate(db, limit).fetch_page(page - 1).await?;

        let faculties: HashMap<Uuid, faculty::Model> = faculty::Entity::find()
            .filter(faculty::Column::Id.is_in(assignments.iter().map(|a| a.faculty_id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        let courses: HashMap<Uuid, course::Model> = course::Entity::find()
            .filter(course::Column::Id.is_in(assignments.iter().map(|a| a.course_id).collect::<Vec<_>>()))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut years = distinct_values(db, &course_ids, course_faculty::Column::Year).await?;
        years.reverse();
        let semesters = distinct_values(db, &course_ids, course_faculty::Column::Semester).await?;

        let active_faculties = faculty::Entity::find()
            .filter(faculty::Column::DepartmentId.eq(department.id))
            .filter(faculty::Column::IsActive.eq(true))
            .count(db)
            .await?;
        let active_courses = course::Entity::find()
            .filter(course::Column::DepartmentId.eq(department.id))
            .filter(course::Column::IsActive.eq(true))
            .count(db)
            .await?;

        Ok(DepartmentAssignments {
            department: DepartmentSummary {
                id: department.id,
                name: department.name,
                code: department.code,
                active_courses,
                active_faculties,
            },
            assignments: assignments
                .into_iter()
                .map(|assignment| AssignmentRow {
                    faculty: faculties.get(&assignment.faculty_id).map(FacultyBrief::from),
                    course: courses.get(&assignment.course_id).map(CourseBrief::from),
                    assignment,
                })
                .collect(),
            summary: PageSummary {
                total_assignments,
                current_page: page,
                total_pages: total_assignments.div_ceil(limit),
                limit,
            },
            filters: FilterOptions { years, semesters },
        })
    }
}

async fn department_course_ids<C: ConnectionTrait>(
    db: &C,
    department_id: Uuid,
) -> Result<Vec<Uuid>, ServiceError> {
    Ok(course::Entity::find()
        .select_only()
        .column(course::Column::Id)
        .filter(course::Column::DepartmentId.eq(department_id))
        .into_tuple::<Uuid>()
        .all(db)
        .await?)
}

/// Distinct values of an integer assignment column, ascending
async fn distinct_values<C: ConnectionTrait>(
    db: &C,
    course_ids: &[Uuid],
    column: course_faculty::Column,
) -> Result<Vec<i32>, ServiceError> {
    Ok(course_faculty::Entity::find()
        .select_only()
        .column(column)
        .distinct()
        .filter(course_faculty::Column::CourseId.is_in(course_ids.to_vec()))
        .order_by_asc(column)
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// The `TOP_N` largest counts, ties broken by id for a stable order
fn top_n(counts: HashMap<Uuid, usize>) -> Vec<(Uuid, usize)> {
    let mut ranked: Vec<(Uuid, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(TOP_N);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_orders_by_count_and_truncates() {
        let ids: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
        let counts: HashMap<Uuid, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let ranked = top_n(counts);
        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0], (ids[6], 6));
        assert_eq!(ranked[4], (ids[2], 2));
    }
}
