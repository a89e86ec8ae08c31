use chrono::Utc;
use database::{
    db::{create_connection, migrate},
    entities::{course, department, faculty, po, program, pso, user},
};
use log::{error, info};
use models::{
    catalog::{CourseCategory, CourseType, ProgramType},
    role::Role,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use std::{env, process};
use uuid::Uuid;

const PROGRAM_OUTCOMES: [(&str, &str); 3] = [
    (
        "PO1",
        "Apply knowledge of computing and mathematics to solve problems",
    ),
    (
        "PO2",
        "Design and evaluate software systems that meet specified needs",
    ),
    (
        "PO3",
        "Communicate technical work effectively to varied audiences",
    ),
];

const PROGRAM_SPECIFIC_OUTCOMES: [(&str, &str); 2] = [
    (
        "PSO1",
        "Build data-driven applications using modern tooling",
    ),
    ("PSO2", "Analyse datasets and present findings responsibly"),
];

/// Reads an account id from the environment so seeded users match token subjects
fn account_id(var: &str) -> Uuid {
    env::var(var)
        .ok()
        .and_then(|value| Uuid::parse_str(&value).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[allow(clippy::too_many_arguments)]
async fn program(
    db: &DatabaseConnection,
    slug: &str,
    name: &str,
    code: &str,
    program_type: ProgramType,
    level: Option<&str>,
    parent_id: Option<Uuid>,
    duration: Option<i32>,
) -> Result<program::Model, DbErr> {
    if let Some(existing) = program::Entity::find()
        .filter(program::Column::Slug.eq(slug))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    program::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        code: Set(code.into()),
        slug: Set(slug.into()),
        program_type: Set(program_type),
        level: Set(level.map(Into::into)),
        parent_id: Set(parent_id),
        duration: Set(duration),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

async fn user(
    db: &DatabaseConnection,
    id: Uuid,
    email: &str,
    name: &str,
    role: Role,
    department_id: Uuid,
) -> Result<user::Model, DbErr> {
    match user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.name = Set(name.into());
            active.role = Set(role);
            active.department_id = Set(Some(department_id));
            active.update(db).await
        }
        None => {
            user::ActiveModel {
                id: Set(id),
                name: Set(name.into()),
                email: Set(email.into()),
                role: Set(role),
                department_id: Set(Some(department_id)),
                is_active: Set(true),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await
        }
    }
}

async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    program(
        db,
        "pg",
        "Postgraduate",
        "PG",
        ProgramType::Level,
        Some("PG"),
        None,
        None,
    )
    .await?;
    let ug = program(
        db,
        "ug",
        "Undergraduate",
        "UG",
        ProgramType::Level,
        Some("UG"),
        None,
        None,
    )
    .await?;
    let bsc = program(
        db,
        "bsc-computer-science",
        "BSc Computer Science",
        "BSC-CS",
        ProgramType::Degree,
        None,
        Some(ug.id),
        Some(3),
    )
    .await?;

    let cs = match department::Entity::find()
        .filter(department::Column::Slug.eq("computer-science"))
        .one(db)
        .await?
    {
        Some(existing) => existing,
        None => {
            department::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set("Computer Science".into()),
                code: Set("CS".into()),
                slug: Set("computer-science".into()),
                program_id: Set(bsc.id),
                hod_id: Set(None),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?
        }
    };

    let hod = user(
        db,
        account_id("SEED_HOD_ID"),
        "hod@college.edu",
        "Test HOD",
        Role::Hod,
        cs.id,
    )
    .await?;
    let mut head = cs.clone().into_active_model();
    head.hod_id = Set(Some(hod.id));
    let cs = head.update(db).await?;
    info!("HOD account {} heads {}", hod.id, cs.name);

    let lecturer = user(
        db,
        account_id("SEED_FACULTY_ID"),
        "faculty@college.edu",
        "Test Faculty",
        Role::Faculty,
        cs.id,
    )
    .await?;
    if faculty::Entity::find()
        .filter(faculty::Column::UserId.eq(lecturer.id))
        .one(db)
        .await?
        .is_none()
    {
        faculty::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(lecturer.id),
            department_id: Set(cs.id),
            name: Set(lecturer.name.clone()),
            designation: Set(Some("Assistant Professor".into())),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
    }
    info!("Faculty account {}", lecturer.id);

    let existing_pos = po::Entity::find()
        .filter(po::Column::ProgramId.eq(bsc.id))
        .all(db)
        .await?;
    for (code, statement) in PROGRAM_OUTCOMES {
        if existing_pos.iter().any(|p| p.code == code) {
            continue;
        }
        po::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(bsc.id),
            code: Set(code.into()),
            statement: Set(statement.into()),
        }
        .insert(db)
        .await?;
    }

    let existing_psos = pso::Entity::find()
        .filter(pso::Column::ProgramId.eq(bsc.id))
        .all(db)
        .await?;
    for (code, statement) in PROGRAM_SPECIFIC_OUTCOMES {
        if existing_psos.iter().any(|p| p.code == code) {
            continue;
        }
        pso::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(bsc.id),
            code: Set(code.into()),
            statement: Set(statement.into()),
        }
        .insert(db)
        .await?;
    }

    let now = Utc::now();
    match course::Entity::find()
        .filter(course::Column::Slug.eq("data-science"))
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.semester = Set(5);
            active.credits = Set(4);
            active.course_type = Set(CourseType::Theory);
            active.department_id = Set(cs.id);
            active.created_by_id = Set(Some(hod.id));
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            course::ActiveModel {
                id: Set(Uuid::new_v4()),
                code: Set("DS101".into()),
                name: Set("Data Science".into()),
                slug: Set("data-science".into()),
                semester: Set(5),
                credits: Set(4),
                course_type: Set(CourseType::Theory),
                category: Set(Some(CourseCategory::Core)),
                description: Set(Some("Test course for API development".into())),
                department_id: Set(cs.id),
                created_by_id: Set(Some(hod.id)),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

/// Seeds a minimal catalog for local development
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let Ok(database_url) = env::var("DATABASE_URL") else {
        error!("DATABASE_URL must be set");
        process::exit(1);
    };

    let result = async {
        let db = create_connection(&database_url, 1).await?;
        migrate(&db).await?;
        seed(&db).await
    }
    .await;

    match result {
        Ok(()) => info!("Seeding completed"),
        Err(err) => {
            error!("Seeding failed: {err}");
            process::exit(1);
        }
    }
}
