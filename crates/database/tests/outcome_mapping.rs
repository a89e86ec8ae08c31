mod common;

use common::{fixture, insert_clo, insert_course, insert_program, setup};
use database::{
    ServiceError,
    entities::po,
    services::outcome_mapping::{OutcomeMappingService, PoMappingInput, PsoMappingInput},
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

fn po_link(clo_id: Uuid, po_id: Uuid, level: i32) -> PoMappingInput {
    PoMappingInput {
        clo_id: Some(clo_id),
        po_id: Some(po_id),
        level: Some(level),
    }
}

fn pso_link(clo_id: Uuid, pso_id: Uuid, level: i32) -> PsoMappingInput {
    PsoMappingInput {
        clo_id: Some(clo_id),
        pso_id: Some(pso_id),
        level: Some(level),
    }
}

#[tokio::test]
async fn test_replace_is_idempotent() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let request = || {
        (
            vec![
                po_link(fx.clos[0].id, fx.pos[0].id, 3),
                po_link(fx.clos[0].id, fx.pos[1].id, 1),
                po_link(fx.clos[1].id, fx.pos[0].id, 2),
            ],
            vec![pso_link(fx.clos[1].id, fx.psos[0].id, 2)],
        )
    };

    let (pos, psos) = request();
    let first = OutcomeMappingService::replace(&db, &fx.hod, fx.course.id, pos, psos)
        .await
        .unwrap();
    assert_eq!(first.clos_affected, 2);
    assert_eq!(first.po_mappings, 3);
    assert_eq!(first.pso_mappings, 1);
    let before = OutcomeMappingService::mappings(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();

    let (pos, psos) = request();
    OutcomeMappingService::replace(&db, &fx.hod, fx.course.id, pos, psos)
        .await
        .unwrap();
    let after = OutcomeMappingService::mappings(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();

    let pairs = |m: &database::services::outcome_mapping::CourseMappings| {
        let mut pos: Vec<_> = m
            .po_mappings
            .iter()
            .map(|r| (r.clo_id, r.po_id, r.level))
            .collect();
        pos.sort();
        let mut psos: Vec<_> = m
            .pso_mappings
            .iter()
            .map(|r| (r.clo_id, r.pso_id, r.level))
            .collect();
        psos.sort();
        (pos, psos)
    };
    assert_eq!(pairs(&before), pairs(&after));
    assert_eq!(after.po_mappings.len(), 3);
}

#[tokio::test]
async fn test_replace_only_touches_named_clos() {
    let db = setup().await;
    let fx = fixture(&db).await;

    OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![
            po_link(fx.clos[0].id, fx.pos[0].id, 3),
            po_link(fx.clos[1].id, fx.pos[0].id, 2),
        ],
        Vec::new(),
    )
    .await
    .unwrap();

    OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![po_link(fx.clos[0].id, fx.pos[1].id, 1)],
        Vec::new(),
    )
    .await
    .unwrap();

    let mappings = OutcomeMappingService::mappings(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();
    assert_eq!(mappings.po_mappings.len(), 2);
    assert!(
        mappings
            .po_mappings
            .iter()
            .any(|m| m.clo_id == fx.clos[1].id && m.po_id == fx.pos[0].id && m.level == 2)
    );
    assert!(
        !mappings
            .po_mappings
            .iter()
            .any(|m| m.clo_id == fx.clos[0].id && m.po_id == fx.pos[0].id)
    );
}

#[tokio::test]
async fn test_incomplete_and_out_of_range_entries_are_dropped() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let err = OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![
            PoMappingInput {
                clo_id: Some(fx.clos[0].id),
                po_id: None,
                level: Some(2),
            },
            po_link(fx.clos[0].id, fx.pos[0].id, 4),
        ],
        vec![pso_link(fx.clos[0].id, fx.psos[0].id, -1)],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NoValidMappings));

    // First occurrence of a pair wins; a level of zero is a valid entry
    let result = OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![
            po_link(fx.clos[0].id, fx.pos[0].id, 0),
            po_link(fx.clos[0].id, fx.pos[0].id, 3),
        ],
        Vec::new(),
    )
    .await
    .unwrap();
    assert_eq!(result.po_mappings, 1);
    let mappings = OutcomeMappingService::mappings(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();
    assert_eq!(mappings.po_mappings[0].level, 0);
}

#[tokio::test]
async fn test_rejects_foreign_clos_and_outcomes() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let other = insert_course(&db, &fx.department, "CS502", 3).await;
    let foreign_clo = insert_clo(&db, &other, "CLO1", 0).await;
    let err = OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![po_link(foreign_clo.id, fx.pos[0].id, 2)],
        Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::ForeignClos { .. }));

    let elsewhere = insert_program(&db, "msc-math").await;
    let foreign_po = po::ActiveModel {
        id: Set(Uuid::new_v4()),
        program_id: Set(elsewhere.id),
        code: Set("PO1".into()),
        statement: Set("Elsewhere".into()),
    }
    .insert(&db)
    .await
    .unwrap();
    let err = OutcomeMappingService::replace(
        &db,
        &fx.hod,
        fx.course.id,
        vec![po_link(fx.clos[0].id, foreign_po.id, 2)],
        Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_only_department_hod_maps_outcomes() {
    let db = setup().await;
    let fx = fixture(&db).await;

    let err = OutcomeMappingService::replace(
        &db,
        &fx.lecturer,
        fx.course.id,
        vec![po_link(fx.clos[0].id, fx.pos[0].id, 2)],
        Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let available = OutcomeMappingService::available_outcomes(&db, &fx.hod, fx.course.id)
        .await
        .unwrap();
    assert_eq!(available.clos.len(), 3);
    assert_eq!(available.pos.len(), 2);
    assert_eq!(available.psos.len(), 1);
    assert_eq!(available.program.map(|p| p.id), Some(fx.program.id));
}
