#![allow(dead_code)]

use chrono::Utc;
use database::{
    db::{create_connection, migrate},
    entities::{
        clo, course, course_faculty, department, faculty, mark, po, program, pso, student,
        student_course_enrollment, user,
    },
    services::{
        access::Principal,
        allocation::{AllocationInput, AllocationService},
        assessment::{AssessmentService, NewAssessment},
    },
};
use models::{
    catalog::{CourseType, EnrollmentStatus, ProgramType},
    role::Role,
    term::Term,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

pub const TERM: Term = Term {
    year: 2025,
    semester: 1,
};

/// A department with its HOD, two assigned lecturers, one unassigned
/// lecturer, a 4-credit course with three CLOs and three enrolled students
pub struct Fixture {
    pub program: program::Model,
    pub department: department::Model,
    pub hod: Principal,
    pub lecturer: Principal,
    pub lecturer_profile: faculty::Model,
    pub colleague: Principal,
    pub colleague_profile: faculty::Model,
    pub outsider: Principal,
    pub outsider_profile: faculty::Model,
    pub course: course::Model,
    pub clos: Vec<clo::Model>,
    pub students: Vec<student::Model>,
    pub pos: Vec<po::Model>,
    pub psos: Vec<pso::Model>,
}

pub async fn setup() -> DatabaseConnection {
    let db = create_connection("sqlite::memory:", 1)
        .await
        .expect("connect to in-memory database");
    migrate(&db).await.expect("apply migrations");
    db
}

pub async fn fixture(db: &DatabaseConnection) -> Fixture {
    let program = insert_program(db, "bsc-cs").await;
    let department = insert_department(db, &program, "CS").await;

    let hod_user = insert_user(db, Role::Hod, Some(department.id), "hod@test.edu").await;
    let mut head: department::ActiveModel = department.into();
    head.hod_id = Set(Some(hod_user.id));
    let department = head.update(db).await.expect("set hod");

    let (lecturer, lecturer_profile) =
        insert_faculty(db, &department, "lecturer@test.edu", "Ada Lovelace").await;
    let (colleague, colleague_profile) =
        insert_faculty(db, &department, "colleague@test.edu", "Alan Turing").await;
    let (outsider, outsider_profile) =
        insert_faculty(db, &department, "outsider@test.edu", "Grace Hopper").await;

    let course = insert_course(db, &department, "CS501", 4).await;
    assign(db, &course, &lecturer_profile, TERM).await;
    assign(db, &course, &colleague_profile, TERM).await;

    let mut clos = Vec::new();
    for (i, code) in ["CLO1", "CLO2", "CLO3"].into_iter().enumerate() {
        clos.push(insert_clo(db, &course, code, i as i32).await);
    }

    let mut students = Vec::new();
    for roll in ["21CS001", "21CS002", "21CS003"] {
        let student = insert_student(db, &department, roll).await;
        enroll(db, &course, &student, TERM).await;
        students.push(student);
    }

    let mut pos = Vec::new();
    for code in ["PO1", "PO2"] {
        pos.push(
            po::ActiveModel {
                id: Set(Uuid::new_v4()),
                program_id: Set(program.id),
                code: Set(code.into()),
                statement: Set(format!("{code} statement")),
            }
            .insert(db)
            .await
            .expect("insert po"),
        );
    }
    let psos = vec![
        pso::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(program.id),
            code: Set("PSO1".into()),
            statement: Set("PSO1 statement".into()),
        }
        .insert(db)
        .await
        .expect("insert pso"),
    ];

    Fixture {
        program,
        department,
        hod: principal(db, hod_user.id).await,
        lecturer: principal(db, lecturer.id).await,
        lecturer_profile,
        colleague: principal(db, colleague.id).await,
        colleague_profile,
        outsider: principal(db, outsider.id).await,
        outsider_profile,
        course,
        clos,
        students,
        pos,
        psos,
    }
}

pub async fn principal(db: &DatabaseConnection, user_id: Uuid) -> Principal {
    Principal::resolve(db, user_id)
        .await
        .expect("resolve principal")
}

pub async fn insert_program(db: &DatabaseConnection, slug: &str) -> program::Model {
    program::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Program {slug}")),
        code: Set(slug.to_uppercase()),
        slug: Set(slug.into()),
        program_type: Set(ProgramType::Degree),
        level: Set(None),
        parent_id: Set(None),
        duration: Set(Some(3)),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert program")
}

pub async fn insert_department(
    db: &DatabaseConnection,
    program: &program::Model,
    code: &str,
) -> department::Model {
    department::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Department {code}")),
        code: Set(code.into()),
        slug: Set(code.to_lowercase()),
        program_id: Set(program.id),
        hod_id: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert department")
}

pub async fn insert_user(
    db: &DatabaseConnection,
    role: Role,
    department_id: Option<Uuid>,
    email: &str,
) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(email.split('@').next().unwrap_or(email).into()),
        email: Set(email.into()),
        role: Set(role),
        department_id: Set(department_id),
        is_active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn insert_faculty(
    db: &DatabaseConnection,
    department: &department::Model,
    email: &str,
    name: &str,
) -> (user::Model, faculty::Model) {
    let user = insert_user(db, Role::Faculty, Some(department.id), email).await;
    let profile = faculty::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        department_id: Set(department.id),
        name: Set(name.into()),
        designation: Set(Some("Assistant Professor".into())),
        is_active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert faculty");
    (user, profile)
}

pub async fn insert_course(
    db: &DatabaseConnection,
    department: &department::Model,
    code: &str,
    credits: i32,
) -> course::Model {
    let now = Utc::now();
    course::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.into()),
        name: Set(format!("Course {code}")),
        slug: Set(code.to_lowercase()),
        semester: Set(5),
        credits: Set(credits),
        course_type: Set(CourseType::Theory),
        category: Set(None),
        description: Set(None),
        department_id: Set(department.id),
        created_by_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert course")
}

pub async fn insert_clo(
    db: &DatabaseConnection,
    course: &course::Model,
    code: &str,
    display_order: i32,
) -> clo::Model {
    let now = Utc::now();
    clo::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course.id),
        code: Set(code.into()),
        statement: Set(format!("{code} statement")),
        bloom_level: Set("Apply".into()),
        attainment_threshold: Set(60.0),
        display_order: Set(display_order),
        version: Set(1),
        is_active: Set(true),
        created_by_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert clo")
}

pub async fn insert_student(
    db: &DatabaseConnection,
    department: &department::Model,
    roll_number: &str,
) -> student::Model {
    let email = format!("{}@students.test.edu", roll_number.to_lowercase());
    let user = insert_user(db, Role::Student, Some(department.id), &email).await;
    student::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        roll_number: Set(roll_number.into()),
        admission_year: Set(2021),
        current_semester: Set(5),
        department_id: Set(Some(department.id)),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert student")
}

pub async fn enroll(
    db: &DatabaseConnection,
    course: &course::Model,
    student: &student::Model,
    term: Term,
) {
    student_course_enrollment::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student.id),
        course_id: Set(course.id),
        semester: Set(term.semester),
        year: Set(term.year),
        status: Set(EnrollmentStatus::Enrolled),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert enrollment");
}

pub async fn assign(
    db: &DatabaseConnection,
    course: &course::Model,
    faculty: &faculty::Model,
    term: Term,
) -> course_faculty::Model {
    let now = Utc::now();
    course_faculty::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course.id),
        faculty_id: Set(faculty.id),
        semester: Set(term.semester),
        year: Set(term.year),
        teaching_methodology: Set(None),
        assessment_mode: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert assignment")
}

pub fn new_assessment(course_id: Uuid, title: &str, kind: &str, max_marks: f64) -> NewAssessment {
    NewAssessment {
        course_id,
        title: title.into(),
        description: None,
        max_marks,
        weightage: 10.0,
        assessment_type: kind.into(),
        mode: None,
        sub_type: None,
        semester: TERM.semester,
        year: TERM.year,
        scheduled_date: None,
        submission_deadline: None,
    }
}

/// Creates an assessment as the fixture lecturer
pub async fn create_assessment(
    db: &DatabaseConnection,
    fx: &Fixture,
    title: &str,
    max_marks: f64,
) -> Uuid {
    AssessmentService::create(
        db,
        &fx.lecturer,
        new_assessment(fx.course.id, title, "quiz", max_marks),
    )
    .await
    .expect("create assessment")
    .assessment
    .id
}

pub async fn allocate(
    db: &DatabaseConnection,
    fx: &Fixture,
    assessment_id: Uuid,
    shares: &[(usize, f64)],
) {
    let allocations = shares
        .iter()
        .map(|&(clo, marks_allocated)| AllocationInput {
            clo_id: fx.clos[clo].id,
            marks_allocated,
            weightage: None,
            bloom_level: None,
        })
        .collect();
    AllocationService::replace(db, &fx.lecturer, assessment_id, allocations)
        .await
        .expect("allocate clos");
}

/// Writes a mark directly, bypassing the entry checks
pub async fn insert_raw_mark(
    db: &DatabaseConnection,
    student_id: Uuid,
    assessment_id: Uuid,
    clo_id: Uuid,
    marks_obtained: f64,
) {
    let now = Utc::now();
    mark::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        assessment_id: Set(assessment_id),
        clo_id: Set(clo_id),
        marks_obtained: Set(marks_obtained),
        entered_by_id: Set(None),
        entered_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert mark");
}
