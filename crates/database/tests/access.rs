mod common;

use common::{TERM, create_assessment, fixture, insert_department, insert_user, principal, setup};
use database::{
    ServiceError,
    entities::user,
    services::access::{
        Principal, can_view_assessment, find_active_assessment, require_assignment,
    },
};
use models::{role::Role, term::Term};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

#[tokio::test]
async fn test_resolve_rejects_unknown_or_inactive_users() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let err = Principal::resolve(&db, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));

    let mut retired: user::ActiveModel = fx.outsider.user.clone().into();
    retired.is_active = Set(false);
    retired.update(&db).await.unwrap();
    let err = Principal::resolve(&db, fx.outsider.user_id())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));
}

#[tokio::test]
async fn test_department_management_scope() {
    let db = setup().await;
    let fx = fixture(&db).await;

    assert!(fx.hod.can_manage_department(&fx.department));
    assert!(!fx.lecturer.can_manage_department(&fx.department));

    let headed = fx.hod.headed_department(&db).await.unwrap();
    assert_eq!(headed.id, fx.department.id);

    let err = fx.lecturer.headed_department(&db).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    // A HOD role alone does not grant another department
    let physics = insert_department(&db, &fx.program, "PHY").await;
    let err = fx
        .hod
        .require_department_manager(&db, physics.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let stray = insert_user(&db, Role::Hod, Some(physics.id), "stray@test.edu").await;
    let err = principal(&db, stray.id)
        .await
        .headed_department(&db)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_admin_bypasses_department_checks() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let admin = insert_user(&db, Role::Admin, Some(fx.department.id), "admin@test.edu").await;
    let admin = principal(&db, admin.id).await;

    assert!(admin.is_admin());
    assert!(admin.can_manage_department(&fx.department));
    let course = admin.require_course_hod(&db, fx.course.id).await.unwrap();
    assert_eq!(course.id, fx.course.id);
    let headed = admin.headed_department(&db).await.unwrap();
    assert_eq!(headed.id, fx.department.id);
}

#[tokio::test]
async fn test_faculty_scope_checks() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let err = fx.hod.faculty_profile(&db).await.unwrap_err();
    assert!(matches!(err, ServiceError::FacultyProfileNotFound));

    require_assignment(&db, fx.lecturer_profile.id, fx.course.id, Some(TERM))
        .await
        .unwrap();
    let err = require_assignment(
        &db,
        fx.lecturer_profile.id,
        fx.course.id,
        Some(Term::new(2, TERM.year)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotAssigned { .. }));

    let id = create_assessment(&db, &fx, "Quiz", 10.0).await;
    let assessment = find_active_assessment(&db, id).await.unwrap();
    assert!(can_view_assessment(&db, &fx.colleague_profile, &assessment).await.unwrap());
    assert!(!can_view_assessment(&db, &fx.outsider_profile, &assessment).await.unwrap());

    let err = find_active_assessment(&db, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Assessment", .. }));
}
