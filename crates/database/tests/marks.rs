mod common;

use common::{TERM, allocate, create_assessment, enroll, fixture, insert_student, setup};
use database::{
    ServiceError,
    entities::mark,
    services::{
        assessment::AssessmentService,
        marks::{MarkEntry, MarksService},
    },
};
use models::term::Term;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

fn entry(student_id: Uuid, clo_id: Uuid, marks_obtained: f64) -> MarkEntry {
    MarkEntry {
        student_id,
        clo_id,
        marks_obtained,
    }
}

#[tokio::test]
async fn test_marks_bounded_by_clo_allocation() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 12.0), (1, 8.0)]).await;
    let student = fx.students[0].id;

    let err = MarksService::enter_bulk(&db, &fx.lecturer, id, vec![entry(student, fx.clos[0].id, 15.0)])
        .await
        .unwrap_err();
    match err {
        ServiceError::AllEntriesInvalid { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].error, "Marks (15) cannot exceed maximum allowed (12)");
        }
        other => panic!("expected AllEntriesInvalid, got {other:?}"),
    }

    let result = MarksService::enter_bulk(&db, &fx.lecturer, id, vec![entry(student, fx.clos[0].id, 10.0)])
        .await
        .unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.error_count, 0);
}

#[tokio::test]
async fn test_bulk_entry_is_idempotent_per_cell() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 12.0), (1, 8.0)]).await;
    let student = fx.students[0].id;

    MarksService::enter_bulk(&db, &fx.lecturer, id, vec![entry(student, fx.clos[0].id, 7.0)])
        .await
        .unwrap();
    let first = mark::Entity::find()
        .filter(mark::Column::AssessmentId.eq(id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    MarksService::enter_bulk(&db, &fx.colleague, id, vec![entry(student, fx.clos[0].id, 9.5)])
        .await
        .unwrap();
    let rows = mark::Entity::find()
        .filter(mark::Column::AssessmentId.eq(id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].marks_obtained, 9.5);
    assert_eq!(rows[0].entered_by_id, Some(fx.colleague_profile.id));
    assert!(rows[0].updated_at >= first.updated_at);
}

#[tokio::test]
async fn test_bulk_entry_partial_success() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 12.0), (1, 8.0)]).await;

    let stranger = insert_student(&db, &fx.department, "21CS099").await;
    let entries = vec![
        entry(fx.students[0].id, fx.clos[0].id, 12.0),
        entry(fx.students[0].id, fx.clos[1].id, 8.0),
        entry(fx.students[1].id, fx.clos[0].id, -1.0),
        entry(fx.students[1].id, fx.clos[2].id, 3.0),
        entry(stranger.id, fx.clos[0].id, 5.0),
        entry(fx.students[2].id, fx.clos[1].id, 0.0),
    ];

    let result = MarksService::enter_bulk(&db, &fx.lecturer, id, entries)
        .await
        .unwrap();
    assert_eq!(result.success_count, 3);
    assert_eq!(result.error_count, 3);
    assert!(result.errors.iter().any(|e| e.student_id == stranger.id));
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.clo_id == Some(fx.clos[2].id) && e.error.contains("not allocated"))
    );

    let rows = mark::Entity::find()
        .filter(mark::Column::AssessmentId.eq(id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_enrollment_is_per_term() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 20.0)]).await;

    let late = insert_student(&db, &fx.department, "22CS001").await;
    enroll(&db, &fx.course, &late, Term::new(2, TERM.year)).await;

    let err = MarksService::enter_bulk(&db, &fx.lecturer, id, vec![entry(late.id, fx.clos[0].id, 5.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AllEntriesInvalid { .. }));
}

#[tokio::test]
async fn test_entry_refused_when_finalized_or_unauthorized() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 20.0)]).await;
    let student = fx.students[0].id;

    let err = MarksService::enter_bulk(&db, &fx.outsider, id, vec![entry(student, fx.clos[0].id, 5.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = MarksService::enter_bulk(&db, &fx.lecturer, id, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    AssessmentService::finalize(&db, &fx.lecturer, id)
        .await
        .unwrap();
    let err = MarksService::enter_bulk(&db, &fx.lecturer, id, vec![entry(student, fx.clos[0].id, 5.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::MarksFinalized { .. }));
}

#[tokio::test]
async fn test_mark_sheet_and_statistics() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 12.0), (1, 8.0)]).await;

    MarksService::enter_bulk(
        &db,
        &fx.lecturer,
        id,
        vec![
            entry(fx.students[0].id, fx.clos[0].id, 12.0),
            entry(fx.students[0].id, fx.clos[1].id, 8.0),
            entry(fx.students[1].id, fx.clos[0].id, 6.0),
        ],
    )
    .await
    .unwrap();

    let sheet = MarksService::assessment_marks(&db, &fx.colleague, id)
        .await
        .unwrap();
    assert_eq!(sheet.clos.len(), 2);
    assert_eq!(sheet.students.len(), 3);
    assert_eq!(sheet.students[0].student.roll_number, "21CS001");
    assert_eq!(sheet.students[0].total_obtained, 20.0);
    assert_eq!(sheet.students[0].percentage, 100.0);
    assert_eq!(sheet.students[2].marks[0].marks_obtained, None);

    assert_eq!(sheet.statistics.total_students, 3);
    assert_eq!(sheet.statistics.students_with_marks, 2);
    assert_eq!(sheet.statistics.highest_marks, 20.0);
    assert_eq!(sheet.statistics.lowest_marks, 0.0);
    assert_eq!(sheet.statistics.average_marks, 8.67);

    assert_eq!(sheet.summary.total_possible, 60.0);
    assert_eq!(sheet.summary.total_obtained, 26.0);
    assert_eq!(sheet.summary.completion_percentage, 50.0);

    let one = MarksService::student_marks(&db, &fx.lecturer, id, fx.students[1].id)
        .await
        .unwrap();
    assert_eq!(one.total_obtained, 6.0);
    assert_eq!(one.marks[0].percentage, 50.0);
    assert!(one.marks[1].entered_at.is_none());
}

#[tokio::test]
async fn test_course_students_roster() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let roster = MarksService::course_students(&db, &fx.lecturer, fx.course.id, Some(TERM))
        .await
        .unwrap();
    let rolls: Vec<_> = roster.iter().map(|s| s.roll_number.as_str()).collect();
    assert_eq!(rolls, ["21CS001", "21CS002", "21CS003"]);

    let err = MarksService::course_students(&db, &fx.outsider, fx.course.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotAssigned { .. }));
}
