mod common;

use common::{allocate, create_assessment, fixture, insert_raw_mark, setup};
use database::{
    ServiceError,
    entities::{assessment, clo, clo_po_mapping, course, course_faculty, student_course_enrollment},
    services::{
        course::{CloPatch, CoursePatch, CourseService, NewClo, NewCourse},
        outcome_mapping::{OutcomeMappingService, PoMappingInput},
    },
};
use models::catalog::{CourseCategory, CourseType};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn new_course(code: &str, name: &str) -> NewCourse {
    NewCourse {
        code: code.into(),
        name: name.into(),
        semester: Some(3),
        credits: 3,
        course_type: Some("practical".into()),
        category: Some("core".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_course_in_headed_department() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let created = CourseService::create(&db, &fx.hod, new_course("C010", "Machine Learning Lab"))
        .await
        .unwrap();
    assert_eq!(created.department_id, fx.department.id);
    assert_eq!(created.slug, "machine-learning-lab");
    assert_eq!(created.course_type, CourseType::Practical);
    assert_eq!(created.category, Some(CourseCategory::Core));
    assert_eq!(created.created_by_id, Some(fx.hod.user_id()));

    let err = CourseService::create(&db, &fx.hod, new_course("C011", "Machine Learning Lab"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UniqueConstraintViolation(_)));

    let mut bad = new_course("C012", "Networks");
    bad.course_type = Some("seminar".into());
    let err = CourseService::create(&db, &fx.hod, bad).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid type"));

    let mut bad = new_course("C012", "Networks");
    bad.credits = 0;
    let err = CourseService::create(&db, &fx.hod, bad).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = CourseService::create(&db, &fx.lecturer, new_course("C013", "Compilers"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_auto_code_follows_latest_course() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let code = CourseService::auto_code(&db, &fx.hod, fx.program.id)
        .await
        .unwrap();
    assert_eq!(code, "C502");

    CourseService::create(&db, &fx.hod, new_course("C010", "Compilers"))
        .await
        .unwrap();
    let code = CourseService::auto_code(&db, &fx.hod, fx.program.id)
        .await
        .unwrap();
    assert_eq!(code, "C011");

    let empty = common::insert_program(&db, "ma-english").await;
    let code = CourseService::auto_code(&db, &fx.hod, empty.id)
        .await
        .unwrap();
    assert_eq!(code, "C001");
}

#[tokio::test]
async fn test_programmes_and_listing() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let programmes = CourseService::programmes(&db, &fx.hod).await.unwrap();
    assert_eq!(programmes.len(), 1);
    assert_eq!(programmes[0].id, fx.program.id);

    let listing = CourseService::list(&db, &fx.hod, None).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].active_clos, 3);
    assert_eq!(listing[0].faculties.len(), 2);
    assert_eq!(listing[0].department_name, fx.department.name);

    let other = common::insert_program(&db, "ma-english").await;
    let listing = CourseService::list(&db, &fx.hod, Some(other.id))
        .await
        .unwrap();
    assert!(listing.is_empty());

    let err = CourseService::list(&db, &fx.lecturer, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_update_and_get_course() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let updated = CourseService::update(
        &db,
        &fx.hod,
        fx.course.id,
        CoursePatch {
            name: Some("Advanced Databases".into()),
            credits: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Advanced Databases");
    assert_eq!(updated.credits, 3);
    // Renaming without an explicit slug keeps the slug stable
    assert_eq!(updated.slug, fx.course.slug);

    let detail = CourseService::get(&db, &fx.hod, fx.course.id).await.unwrap();
    assert_eq!(detail.clos.len(), 3);
    assert_eq!(detail.department.id, fx.department.id);
    assert_eq!(detail.program.map(|p| p.id), Some(fx.program.id));

    let err = CourseService::get(&db, &fx.lecturer, fx.course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_clo_crud() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let created = CourseService::create_clo(
        &db,
        &fx.hod,
        fx.course.id,
        NewClo {
            code: "CLO4".into(),
            statement: "Design a normalised schema".into(),
            bloom_level: "Create".into(),
            display_order: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.attainment_threshold, 60.0);
    assert_eq!(created.version, 1);

    let err = CourseService::create_clo(
        &db,
        &fx.hod,
        fx.course.id,
        NewClo {
            code: "CLO4".into(),
            statement: "Duplicate".into(),
            bloom_level: "Apply".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::UniqueConstraintViolation(_)));

    let err = CourseService::create_clo(
        &db,
        &fx.hod,
        fx.course.id,
        NewClo {
            code: "CLO5".into(),
            statement: "Out of range".into(),
            bloom_level: "Apply".into(),
            attainment_threshold: Some(120.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let retired = CourseService::update_clo(
        &db,
        &fx.hod,
        fx.clos[2].id,
        CloPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!retired.is_active);

    let codes: Vec<_> = CourseService::list_clos(&db, &fx.hod, fx.course.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, ["CLO1", "CLO2", "CLO4"]);
}

#[tokio::test]
async fn test_delete_cascades_owned_rows() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 20.0)]).await;
    OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![PoMappingInput {
            clo_id: Some(fx.clos[0].id),
            po_id: Some(fx.pos[0].id),
            level: Some(3),
        }],
        Vec::new(),
    )
    .await
    .unwrap();

    let removal = CourseService::delete(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();
    assert_eq!(removal.clos_deleted, 3);
    assert_eq!(removal.assessments_deleted, 1);
    assert_eq!(removal.assignments_deleted, 2);
    assert_eq!(removal.enrollments_deleted, 3);

    assert!(course::Entity::find_by_id(fx.course.id).one(&db).await.unwrap().is_none());
    let leftovers = clo::Entity::find()
        .filter(clo::Column::CourseId.eq(fx.course.id))
        .count(&db)
        .await
        .unwrap()
        + assessment::Entity::find()
            .filter(assessment::Column::CourseId.eq(fx.course.id))
            .count(&db)
            .await
            .unwrap()
        + course_faculty::Entity::find()
            .filter(course_faculty::Column::CourseId.eq(fx.course.id))
            .count(&db)
            .await
            .unwrap()
        + student_course_enrollment::Entity::find()
            .filter(student_course_enrollment::Column::CourseId.eq(fx.course.id))
            .count(&db)
            .await
            .unwrap()
        + clo_po_mapping::Entity::find().count(&db).await.unwrap();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_delete_refused_once_marks_exist() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let id = create_assessment(&db, &fx, "Quiz", 20.0).await;
    allocate(&db, &fx, id, &[(0, 20.0)]).await;
    insert_raw_mark(&db, fx.students[0].id, id, fx.clos[0].id, 12.0).await;

    let err = CourseService::delete(&db, &fx.hod, fx.course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::LockedByMarks { marks_count: 1, .. }));
    assert!(course::Entity::find_by_id(fx.course.id).one(&db).await.unwrap().is_some());
}
