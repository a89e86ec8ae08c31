use database::services::assignment::{AssignmentUpdate, NewAssignment};
use models::term::Term;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignFacultyRequest {
    pub faculty_id: Uuid,
    pub semester: i32,
    pub year: i32,
    pub teaching_methodology: Option<String>,
    pub assessment_mode: Option<String>,
}

impl From<AssignFacultyRequest> for NewAssignment {
    fn from(req: AssignFacultyRequest) -> Self {
        Self {
            faculty_id: req.faculty_id,
            semester: req.semester,
            year: req.year,
            teaching_methodology: req.teaching_methodology,
            assessment_mode: req.assessment_mode,
        }
    }
}

/// Identifies the assignment by term; `newFacultyId` reassigns it (HOD only)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub semester: i32,
    pub year: i32,
    pub teaching_methodology: Option<String>,
    pub assessment_mode: Option<String>,
    pub new_faculty_id: Option<Uuid>,
}

impl UpdateAssignmentRequest {
    pub fn into_parts(self) -> (Term, AssignmentUpdate) {
        (
            Term::new(self.semester, self.year),
            AssignmentUpdate {
                teaching_methodology: self.teaching_methodology,
                assessment_mode: self.assessment_mode,
                new_faculty_id: self.new_faculty_id,
            },
        )
    }
}
