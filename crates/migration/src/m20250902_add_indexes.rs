use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Unique natural keys
        for index in [
            unique_index("idx_programs_slug", Programs::Table, &[Programs::Slug]),
            unique_index(
                "idx_departments_slug",
                Departments::Table,
                &[Departments::Slug],
            ),
            unique_index("idx_users_email", Users::Table, &[Users::Email]),
            unique_index("idx_faculties_user_id", Faculties::Table, &[Faculties::UserId]),
            unique_index(
                "idx_students_roll_number",
                Students::Table,
                &[Students::RollNumber],
            ),
            unique_index("idx_courses_slug", Courses::Table, &[Courses::Slug]),
            unique_index("idx_clos_course_code", Clos::Table, &[Clos::CourseId, Clos::Code]),
            unique_index(
                "idx_program_outcomes_program_code",
                ProgramOutcomes::Table,
                &[ProgramOutcomes::ProgramId, ProgramOutcomes::Code],
            ),
            unique_index(
                "idx_program_specific_outcomes_program_code",
                ProgramSpecificOutcomes::Table,
                &[
                    ProgramSpecificOutcomes::ProgramId,
                    ProgramSpecificOutcomes::Code,
                ],
            ),
            unique_index(
                "idx_clo_po_mappings_pair",
                CloPoMappings::Table,
                &[CloPoMappings::CloId, CloPoMappings::PoId],
            ),
            unique_index(
                "idx_clo_pso_mappings_pair",
                CloPsoMappings::Table,
                &[CloPsoMappings::CloId, CloPsoMappings::PsoId],
            ),
            unique_index(
                "idx_course_faculties_assignment",
                CourseFaculties::Table,
                &[
                    CourseFaculties::CourseId,
                    CourseFaculties::FacultyId,
                    CourseFaculties::Semester,
                    CourseFaculties::Year,
                ],
            ),
            unique_index(
                "idx_assessment_clos_pair",
                AssessmentClos::Table,
                &[AssessmentClos::AssessmentId, AssessmentClos::CloId],
            ),
            unique_index(
                "idx_marks_student_assessment_clo",
                Marks::Table,
                &[Marks::StudentId, Marks::AssessmentId, Marks::CloId],
            ),
            unique_index(
                "idx_student_course_enrollments_term",
                StudentCourseEnrollments::Table,
                &[
                    StudentCourseEnrollments::StudentId,
                    StudentCourseEnrollments::CourseId,
                    StudentCourseEnrollments::Semester,
                    StudentCourseEnrollments::Year,
                ],
            ),
        ] {
            manager.create_index(index).await?;
        }

        // Index on assessments for the per-term marks cap lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_assessments_course_term")
                    .table(Assessments::Table)
                    .col(Assessments::CourseId)
                    .col(Assessments::Semester)
                    .col(Assessments::Year)
                    .to_owned(),
            )
            .await?;

        // Index on marks.assessment_id for mark sheets
        manager
            .create_index(
                Index::create()
                    .name("idx_marks_assessment_id")
                    .table(Marks::Table)
                    .col(Marks::AssessmentId)
                    .to_owned(),
            )
            .await?;

        // Index on enrollments for course rosters
        manager
            .create_index(
                Index::create()
                    .name("idx_student_course_enrollments_course_term")
                    .table(StudentCourseEnrollments::Table)
                    .col(StudentCourseEnrollments::CourseId)
                    .col(StudentCourseEnrollments::Semester)
                    .col(StudentCourseEnrollments::Year)
                    .to_owned(),
            )
            .await?;

        // Index on course_faculties.faculty_id for workload rollups
        manager
            .create_index(
                Index::create()
                    .name("idx_course_faculties_faculty_id")
                    .table(CourseFaculties::Table)
                    .col(CourseFaculties::FacultyId)
                    .to_owned(),
            )
            .await?;

        // Index on clos.course_id
        manager
            .create_index(
                Index::create()
                    .name("idx_clos_course_id")
                    .table(Clos::Table)
                    .col(Clos::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_clos_course_id",
            "idx_course_faculties_faculty_id",
            "idx_student_course_enrollments_course_term",
            "idx_marks_assessment_id",
            "idx_assessments_course_term",
            "idx_student_course_enrollments_term",
            "idx_marks_student_assessment_clo",
            "idx_assessment_clos_pair",
            "idx_course_faculties_assignment",
            "idx_clo_pso_mappings_pair",
            "idx_clo_po_mappings_pair",
            "idx_program_specific_outcomes_program_code",
            "idx_program_outcomes_program_code",
            "idx_clos_course_code",
            "idx_courses_slug",
            "idx_students_roll_number",
            "idx_faculties_user_id",
            "idx_users_email",
            "idx_departments_slug",
            "idx_programs_slug",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

fn unique_index<T, C>(name: &str, table: T, cols: &[C]) -> IndexCreateStatement
where
    T: Iden + 'static,
    C: Iden + Clone + 'static,
{
    let mut index = Index::create();
    index.name(name).table(table).unique();
    for col in cols {
        index.col(col.clone());
    }
    index.to_owned()
}

#[derive(Iden, Clone)]
enum Programs {
    Table,
    Slug,
}

#[derive(Iden, Clone)]
enum Departments {
    Table,
    Slug,
}

#[derive(Iden, Clone)]
enum Users {
    Table,
    Email,
}

#[derive(Iden, Clone)]
enum Faculties {
    Table,
    UserId,
}

#[derive(Iden, Clone)]
enum Students {
    Table,
    RollNumber,
}

#[derive(Iden, Clone)]
enum Courses {
    Table,
    Slug,
}

#[derive(Iden, Clone)]
enum Clos {
    Table,
    CourseId,
    Code,
}

#[derive(Iden, Clone)]
enum ProgramOutcomes {
    Table,
    ProgramId,
    Code,
}

#[derive(Iden, Clone)]
enum ProgramSpecificOutcomes {
    Table,
    ProgramId,
    Code,
}

#[derive(Iden, Clone)]
enum CloPoMappings {
    Table,
    CloId,
    PoId,
}

#[derive(Iden, Clone)]
enum CloPsoMappings {
    Table,
    CloId,
    PsoId,
}

#[derive(Iden, Clone)]
enum CourseFaculties {
    Table,
    CourseId,
    FacultyId,
    Semester,
    Year,
}

#[derive(Iden, Clone)]
enum Assessments {
    Table,
    CourseId,
    Semester,
    Year,
}

#[derive(Iden, Clone)]
enum AssessmentClos {
    Table,
    AssessmentId,
    CloId,
}

#[derive(Iden, Clone)]
enum Marks {
    Table,
    StudentId,
    AssessmentId,
    CloId,
}

#[derive(Iden, Clone)]
enum StudentCourseEnrollments {
    Table,
    StudentId,
    CourseId,
    Semester,
    Year,
}
