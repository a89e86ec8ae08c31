mod common;

use common::{TERM, allocate, create_assessment, fixture, insert_course, insert_student, setup};
use database::{
    ServiceError,
    services::{
        assessment::AssessmentService,
        validation::{AssessmentProposal, MarkProposal, ValidationService},
    },
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

fn proposal(fx: &common::Fixture, kind: &str, max_marks: f64) -> AssessmentProposal {
    AssessmentProposal {
        course_id: fx.course.id,
        assessment_type: kind.into(),
        max_marks,
        semester: TERM.semester,
        year: TERM.year,
    }
}

#[tokio::test]
async fn test_assessment_dry_run_mirrors_create() {
    let db = setup().await;
    let fx = fixture(&db).await;
    create_assessment(&db, &fx, "Midterm", 60.0).await;

    let verdict = ValidationService::validate_assessment(&db, &fx.lecturer, proposal(&fx, "quiz", 50.0))
        .await
        .unwrap();
    assert!(!verdict.allowed);
    assert_eq!(verdict.marks_validation.remaining, 40.0);
    assert_eq!(verdict.marks_validation.proposed_total, 110.0);
    assert!(verdict.practical_validation.is_none());
    assert_eq!(verdict.course_credits, 4);
    assert_eq!(verdict.recommended_practical_marks, 25.0);

    let verdict = ValidationService::validate_assessment(&db, &fx.lecturer, proposal(&fx, "Practical", 25.0))
        .await
        .unwrap();
    assert!(verdict.allowed);
    assert!(verdict.practical_validation.unwrap().allowed);

    // Nothing was written by the dry runs
    let stored = database::entities::assessment::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn test_has_practical_reports_existing() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let check = ValidationService::has_practical(&db, &fx.lecturer, fx.course.id, TERM)
        .await
        .unwrap();
    assert!(!check.has_practical);

    let created = AssessmentService::create(
        &db,
        &fx.lecturer,
        common::new_assessment(fx.course.id, "Lab", "practical", 25.0),
    )
    .await
    .unwrap();

    let check = ValidationService::has_practical(&db, &fx.colleague, fx.course.id, TERM)
        .await
        .unwrap();
    assert!(check.has_practical);
    assert_eq!(check.existing_assessment.unwrap().id, created.assessment.id);

    let verdict = ValidationService::validate_assessment(&db, &fx.lecturer, proposal(&fx, "practical", 10.0))
        .await
        .unwrap();
    assert!(!verdict.allowed);
    assert!(verdict.marks_validation.allowed);

    let err = ValidationService::has_practical(&db, &fx.outsider, fx.course.id, TERM)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotAssigned { .. }));
}

#[tokio::test]
async fn test_recommended_practical_marks_by_credits() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let seminar = insert_course(&db, &fx.department, "CS590", 2).await;
    common::assign(&db, &seminar, &fx.lecturer_profile, TERM).await;

    let mut input = proposal(&fx, "quiz", 10.0);
    input.course_id = seminar.id;
    let verdict = ValidationService::validate_assessment(&db, &fx.lecturer, input)
        .await
        .unwrap();
    assert_eq!(verdict.recommended_practical_marks, 0.0);
    assert_eq!(verdict.marks_validation.max_course_marks, 50.0);
}

#[tokio::test]
async fn test_mark_dry_run() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 12.0), (1, 8.0)]).await;

    let mark = |student_id: Uuid, clo: usize, marks_obtained: f64| MarkProposal {
        assessment_id: id,
        student_id,
        clo_id: fx.clos[clo].id,
        marks_obtained,
    };

    let verdict = ValidationService::validate_marks(&db, &fx.lecturer, mark(fx.students[0].id, 0, 10.0))
        .await
        .unwrap();
    assert!(verdict.allowed);
    assert_eq!(verdict.max_marks, 12.0);

    let verdict = ValidationService::validate_marks(&db, &fx.lecturer, mark(fx.students[0].id, 0, 15.0))
        .await
        .unwrap();
    assert!(!verdict.allowed);
    assert!(verdict.enrolled);

    let stranger = insert_student(&db, &fx.department, "21CS099").await;
    let verdict = ValidationService::validate_marks(&db, &fx.lecturer, mark(stranger.id, 0, 5.0))
        .await
        .unwrap();
    assert!(!verdict.allowed);
    assert!(!verdict.enrolled);

    let err = ValidationService::validate_marks(&db, &fx.lecturer, mark(fx.students[0].id, 2, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    AssessmentService::finalize(&db, &fx.lecturer, id)
        .await
        .unwrap();
    let verdict = ValidationService::validate_marks(&db, &fx.lecturer, mark(fx.students[0].id, 0, 10.0))
        .await
        .unwrap();
    assert!(!verdict.allowed);
}
