mod common;

use chrono::{Datelike, Utc};
use common::{TERM, assign, fixture, insert_course, setup};
use database::{
    ServiceError,
    services::stats::{AssignmentFilter, StatsService},
};
use models::term::Term;

#[tokio::test]
async fn test_dashboard_counts_department_catalog() {
    let db = setup().await;
    let fx = fixture(&db).await;
    insert_course(&db, &fx.department, "CS502", 3).await;

    let stats = StatsService::dashboard(&db, &fx.hod).await.unwrap();
    assert_eq!(stats.total_courses, 2);
    assert_eq!(stats.active_clos, 3);
    assert_eq!(stats.programmes_count, 1);
    assert_eq!(stats.program_outcomes, 2);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["activeCLOs"], 3);

    let err = StatsService::dashboard(&db, &fx.lecturer).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_workload_groups_terms_newest_first() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let lab = insert_course(&db, &fx.department, "CS502", 2).await;
    assign(&db, &lab, &fx.lecturer_profile, TERM).await;
    assign(&db, &lab, &fx.lecturer_profile, Term::new(2, TERM.year + 1)).await;

    let workload = StatsService::faculty_workload(&db, &fx.hod, fx.lecturer_profile.id, None)
        .await
        .unwrap();
    assert_eq!(workload.assignments.len(), 3);
    assert_eq!(workload.workload_summary.len(), 2);

    let newest = &workload.workload_summary[0];
    assert_eq!((newest.year, newest.semester), (TERM.year + 1, 2));
    assert_eq!(newest.total_credits, 2);

    let current = &workload.workload_summary[1];
    assert_eq!(current.course_count, 2);
    assert_eq!(current.total_credits, 6);

    let filtered = StatsService::faculty_workload(&db, &fx.hod, fx.lecturer_profile.id, Some(TERM.year))
        .await
        .unwrap();
    assert_eq!(filtered.workload_summary.len(), 1);
}

#[tokio::test]
async fn test_assignment_stats_for_current_year() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let this_year = Term::new(1, Utc::now().year());
    assign(&db, &fx.course, &fx.outsider_profile, this_year).await;
    let lab = insert_course(&db, &fx.department, "CS502", 2).await;
    assign(&db, &lab, &fx.outsider_profile, Term::new(2, this_year.year)).await;

    let stats = StatsService::assignment_stats(&db, &fx.hod).await.unwrap();
    assert_eq!(stats.overview.total_assignments, 4);
    assert_eq!(stats.overview.current_year, this_year.year);
    // The fixture assignments belong to another year
    let expected_this_year = if TERM.year == this_year.year { 4 } else { 2 };
    assert_eq!(stats.overview.current_year_assignments, expected_this_year);
    assert_eq!(stats.top_faculties[0].faculty_id, fx.outsider_profile.id);
    assert_eq!(stats.top_faculties[0].assignment_count, 2);
}

#[tokio::test]
async fn test_department_assignments_paginate() {
    let db = setup().await;
    let fx = fixture(&db).await;
    assign(&db, &fx.course, &fx.outsider_profile, TERM).await;
    assign(&db, &fx.course, &fx.lecturer_profile, Term::new(2, TERM.year)).await;

    let page = StatsService::department_assignments(
        &db,
        &fx.hod,
        AssignmentFilter {
            limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.summary.total_assignments, 4);
    assert_eq!(page.summary.total_pages, 2);
    assert_eq!(page.assignments.len(), 2);
    assert_eq!(page.filters.semesters, vec![1, 2]);
    assert_eq!(page.filters.years, vec![TERM.year]);
    assert_eq!(page.department.active_faculties, 3);

    let second = StatsService::department_assignments(
        &db,
        &fx.hod,
        AssignmentFilter {
            limit: Some(2),
            page: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second.assignments.len(), 2);

    let narrowed = StatsService::department_assignments(
        &db,
        &fx.hod,
        AssignmentFilter {
            faculty_id: Some(fx.lecturer_profile.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(narrowed.summary.total_assignments, 2);
    assert_eq!(narrowed.summary.limit, 20);
}
