mod common;

use common::{TERM, assign, fixture, insert_course, setup};
use database::{ServiceError, services::faculty::FacultyService};
use models::term::Term;

#[tokio::test]
async fn test_profile_includes_department_and_assignments() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let profile = FacultyService::profile(&db, &fx.lecturer).await.unwrap();
    assert_eq!(profile.faculty.id, fx.lecturer_profile.id);
    assert_eq!(profile.email, "lecturer@test.edu");
    assert_eq!(profile.department.map(|d| d.id), Some(fx.department.id));
    assert_eq!(profile.assignments.len(), 1);
    assert_eq!(
        profile.assignments[0].course.as_ref().map(|c| c.code.as_str()),
        Some("CS501")
    );

    let json = serde_json::to_value(
        FacultyService::profile(&db, &fx.outsider).await.unwrap(),
    )
    .unwrap();
    assert_eq!(json["name"], "Grace Hopper");
    assert_eq!(json["assignments"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_assignments_for_term_list_active_clos() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let lab = insert_course(&db, &fx.department, "CS502", 2).await;
    assign(&db, &lab, &fx.lecturer_profile, Term::new(2, TERM.year)).await;

    let current = FacultyService::assignments_for(&db, &fx.lecturer, TERM)
        .await
        .unwrap();
    assert_eq!(current.name, "Ada Lovelace");
    assert_eq!((current.current_year, current.current_semester), (TERM.year, TERM.semester));
    assert_eq!(current.assignments.len(), 1);
    let codes: Vec<_> = current.assignments[0]
        .clos
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(codes, ["CLO1", "CLO2", "CLO3"]);

    let all = FacultyService::all_assignments(&db, &fx.lecturer)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Same year, first semester listed first
    assert_eq!(all[0].assignment.semester, 1);
    assert_eq!(all[1].assignment.course_id, lab.id);
}

#[tokio::test]
async fn test_requires_faculty_profile() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let err = FacultyService::profile(&db, &fx.hod).await.unwrap_err();
    assert!(matches!(err, ServiceError::FacultyProfileNotFound));

    let err = FacultyService::current_assignments(&db, &fx.hod)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::FacultyProfileNotFound));
}
