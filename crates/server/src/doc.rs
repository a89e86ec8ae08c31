use crate::{
    dtos::{
        ResponseEnvelope,
        assessment::{
            AllocateClosRequest, BulkMarksRequest, CloAllocationRequest, CreateAssessmentRequest,
            MarkEntryRequest, UpdateAssessmentRequest,
        },
        assignment::{AssignFacultyRequest, UpdateAssignmentRequest},
        course::{
            CreateCloRequest, CreateCourseRequest, MapOutcomesRequest, PoMappingRequest,
            PsoMappingRequest, UpdateCloRequest, UpdateCourseRequest,
        },
        validation::{ValidateAssessmentRequest, ValidateMarksRequest},
    },
    routes::{assessments, assignments, faculty, health, hod, root, validation},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        assessments::create_assessment,
        assessments::course_assessments,
        assessments::available_marks,
        assessments::course_clos,
        assessments::course_students,
        assessments::get_assessment,
        assessments::update_assessment,
        assessments::delete_assessment,
        assessments::assessment_clos,
        assessments::allocate_clos,
        assessments::assessment_marks,
        assessments::enter_marks,
        assessments::student_marks,
        assessments::finalize_marks,
        assessments::unfinalize_marks,
        assessments::finalization_status,
        validation::has_practical,
        validation::validate_assessment,
        validation::validate_marks,
        assignments::department_faculties,
        assignments::available_faculties,
        assignments::course_assignments,
        assignments::assign_faculty,
        assignments::update_assignment,
        assignments::remove_assignment,
        faculty::profile,
        faculty::current_assignments,
        faculty::all_assignments,
        hod::dashboard,
        hod::programmes,
        hod::auto_code,
        hod::list_courses,
        hod::create_course,
        hod::get_course,
        hod::update_course,
        hod::delete_course,
        hod::list_clos,
        hod::create_clo,
        hod::update_clo,
        hod::available_outcomes,
        hod::course_mappings,
        hod::map_outcomes,
        hod::faculty_workload,
        hod::department_assignments,
        hod::assignment_stats
    ),
    components(schemas(
        ResponseEnvelope,
        CreateAssessmentRequest,
        UpdateAssessmentRequest,
        AllocateClosRequest,
        CloAllocationRequest,
        BulkMarksRequest,
        MarkEntryRequest,
        ValidateAssessmentRequest,
        ValidateMarksRequest,
        AssignFacultyRequest,
        UpdateAssignmentRequest,
        CreateCourseRequest,
        UpdateCourseRequest,
        CreateCloRequest,
        UpdateCloRequest,
        MapOutcomesRequest,
        PoMappingRequest,
        PsoMappingRequest
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Assessments", description = "Assessment lifecycle within the course marks cap"),
        (name = "Allocations", description = "Distribution of assessment marks over CLOs"),
        (name = "Marks", description = "Marks entry and mark sheets"),
        (name = "Validation", description = "Dry runs that never write"),
        (name = "Assignments", description = "Faculty to course assignments"),
        (name = "Faculty", description = "Self-service views for faculty"),
        (name = "HOD", description = "Department catalog and statistics"),
        (name = "Outcome mapping", description = "CLO to PO and PSO mappings"),
    ),
    info(
        title = "OBE Records API",
        version = "1.0.0",
        description = "Outcome-based academic records: assessments, CLO allocations, marks and outcome mappings",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/assessments/{id}/marks"));
        assert!(doc.paths.paths.contains_key("/api/hod/courses/{course_id}/mappings"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("jwt"));
        assert!(components.schemas.contains_key("CreateAssessmentRequest"));
    }
}
