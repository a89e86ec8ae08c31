mod common;

use common::{TERM, fixture, insert_department, insert_faculty, setup};
use database::{
    ServiceError,
    entities::course_faculty,
    services::assignment::{AssignmentService, AssignmentUpdate, NewAssignment},
};
use models::term::Term;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

fn new_assignment(faculty_id: Uuid, term: Term) -> NewAssignment {
    NewAssignment {
        faculty_id,
        semester: term.semester,
        year: term.year,
        teaching_methodology: Some("Flipped classroom".into()),
        assessment_mode: None,
    }
}

#[tokio::test]
async fn test_assign_faculty_once_per_term() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let view = AssignmentService::assign(
        &db,
        &fx.hod,
        fx.course.id,
        new_assignment(fx.outsider_profile.id, TERM),
    )
    .await
    .unwrap();
    assert_eq!(view.assignment.faculty_id, fx.outsider_profile.id);
    assert_eq!(view.faculty_email.as_deref(), Some("outsider@test.edu"));

    let err = AssignmentService::assign(
        &db,
        &fx.hod,
        fx.course.id,
        new_assignment(fx.outsider_profile.id, TERM),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::UniqueConstraintViolation(_)));

    // Same faculty, another term
    AssignmentService::assign(
        &db,
        &fx.hod,
        fx.course.id,
        new_assignment(fx.outsider_profile.id, Term::new(2, TERM.year)),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_assign_rejects_foreign_or_missing_faculty() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let physics = insert_department(&db, &fx.program, "PHY").await;
    let (_, visitor) = insert_faculty(&db, &physics, "visitor@test.edu", "Marie Curie").await;
    let err = AssignmentService::assign(&db, &fx.hod, fx.course.id, new_assignment(visitor.id, TERM))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = AssignmentService::assign(
        &db,
        &fx.hod,
        fx.course.id,
        new_assignment(Uuid::new_v4(), TERM),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Faculty", .. }));

    let err = AssignmentService::assign(
        &db,
        &fx.lecturer,
        fx.course.id,
        new_assignment(fx.outsider_profile.id, TERM),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_faculty_updates_only_own_assignment() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let view = AssignmentService::update(
        &db,
        &fx.lecturer,
        fx.course.id,
        fx.lecturer_profile.id,
        TERM,
        AssignmentUpdate {
            assessment_mode: Some("Continuous".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(view.assignment.assessment_mode.as_deref(), Some("Continuous"));

    let err = AssignmentService::update(
        &db,
        &fx.lecturer,
        fx.course.id,
        fx.colleague_profile.id,
        TERM,
        AssignmentUpdate {
            assessment_mode: Some("Continuous".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = AssignmentService::update(
        &db,
        &fx.lecturer,
        fx.course.id,
        fx.lecturer_profile.id,
        TERM,
        AssignmentUpdate {
            new_faculty_id: Some(fx.outsider_profile.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_hod_reassigns_course() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let view = AssignmentService::update(
        &db,
        &fx.hod,
        fx.course.id,
        fx.lecturer_profile.id,
        TERM,
        AssignmentUpdate {
            teaching_methodology: Some("Studio".into()),
            new_faculty_id: Some(fx.outsider_profile.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(view.assignment.faculty_id, fx.outsider_profile.id);
    assert_eq!(view.assignment.teaching_methodology.as_deref(), Some("Studio"));

    let rows = course_faculty::Entity::find()
        .filter(course_faculty::Column::CourseId.eq(fx.course.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rows.iter().any(|r| r.faculty_id == fx.lecturer_profile.id));

    // Moving onto someone already teaching the course in that term is refused
    let err = AssignmentService::update(
        &db,
        &fx.hod,
        fx.course.id,
        fx.outsider_profile.id,
        TERM,
        AssignmentUpdate {
            new_faculty_id: Some(fx.colleague_profile.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::UniqueConstraintViolation(_)));
}

#[tokio::test]
async fn test_remove_assignment() {
    let db = setup().await;
    let fx = fixture(&db).await;

    AssignmentService::remove(&db, &fx.hod, fx.course.id, fx.colleague_profile.id, TERM)
        .await
        .unwrap();
    let err = AssignmentService::remove(&db, &fx.hod, fx.course.id, fx.colleague_profile.id, TERM)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));

    let listing = AssignmentService::list_for_course(&db, &fx.hod, fx.course.id, None, None)
        .await
        .unwrap();
    assert_eq!(listing.assignments.len(), 1);
    assert_eq!(
        listing.assignments[0].faculty.as_ref().map(|f| f.id),
        Some(fx.lecturer_profile.id)
    );
}

#[tokio::test]
async fn test_available_and_department_faculties() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let available = AssignmentService::available_faculties(&db, &fx.hod, fx.course.id, Some(TERM))
        .await
        .unwrap();
    let ids: Vec<_> = available.faculties.iter().map(|f| f.faculty.id).collect();
    assert_eq!(ids, vec![fx.outsider_profile.id]);
    assert_eq!(available.current_year, Some(TERM.year));

    let everyone = AssignmentService::available_faculties(&db, &fx.hod, fx.course.id, None)
        .await
        .unwrap();
    assert_eq!(everyone.faculties.len(), 3);

    let department = AssignmentService::department_faculties(&db, &fx.hod)
        .await
        .unwrap();
    let names: Vec<_> = department.iter().map(|f| f.faculty.name.as_str()).collect();
    assert_eq!(names, ["Ada Lovelace", "Alan Turing", "Grace Hopper"]);
    assert_eq!(department[0].assignments.len(), 1);
    assert!(department[2].assignments.is_empty());
}
