use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create programs table
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Programs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::Code).string().not_null())
                    .col(ColumnDef::new(Programs::Slug).string().not_null())
                    .col(
                        ColumnDef::new(Programs::ProgramType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Programs::Level).string())
                    .col(ColumnDef::new(Programs::ParentId).uuid())
                    .col(ColumnDef::new(Programs::Duration).integer())
                    .col(
                        ColumnDef::new(Programs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_programs_parent_id")
                            .from(Programs::Table, Programs::ParentId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create departments table; hod_id is resolved against users without a
        // foreign key because the two tables reference each other
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::Code).string().not_null())
                    .col(ColumnDef::new(Departments::Slug).string().not_null())
                    .col(ColumnDef::new(Departments::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(Departments::HodId).uuid())
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_program_id")
                            .from(Departments::Table, Departments::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Users::DepartmentId).uuid())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_department_id")
                            .from(Users::Table, Users::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create faculties table
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Faculties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Faculties::UserId).uuid().not_null())
                    .col(ColumnDef::new(Faculties::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Faculties::Name).string().not_null())
                    .col(ColumnDef::new(Faculties::Designation).string())
                    .col(
                        ColumnDef::new(Faculties::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Faculties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculties_user_id")
                            .from(Faculties::Table, Faculties::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculties_department_id")
                            .from(Faculties::Table, Faculties::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::UserId).uuid().not_null())
                    .col(ColumnDef::new(Students::RollNumber).string().not_null())
                    .col(ColumnDef::new(Students::AdmissionYear).integer().not_null())
                    .col(
                        ColumnDef::new(Students::CurrentSemester)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::DepartmentId).uuid())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_user_id")
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_department_id")
                            .from(Students::Table, Students::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Code).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Slug).string().not_null())
                    .col(ColumnDef::new(Courses::Semester).integer().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(ColumnDef::new(Courses::CourseType).string_len(16).not_null())
                    .col(ColumnDef::new(Courses::Category).string_len(16))
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Courses::CreatedById).uuid())
                    .col(
                        ColumnDef::new(Courses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_department_id")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_created_by_id")
                            .from(Courses::Table, Courses::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create clos table
        manager
            .create_table(
                Table::create()
                    .table(Clos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clos::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Clos::Code).string().not_null())
                    .col(ColumnDef::new(Clos::Statement).text().not_null())
                    .col(ColumnDef::new(Clos::BloomLevel).string().not_null())
                    .col(
                        ColumnDef::new(Clos::AttainmentThreshold)
                            .double()
                            .not_null()
                            .default(60.0),
                    )
                    .col(
                        ColumnDef::new(Clos::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Clos::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Clos::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Clos::CreatedById).uuid())
                    .col(
                        ColumnDef::new(Clos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clos_course_id")
                            .from(Clos::Table, Clos::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create program_outcomes and program_specific_outcomes tables
        manager
            .create_table(
                Table::create()
                    .table(ProgramOutcomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgramOutcomes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProgramOutcomes::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(ProgramOutcomes::Code).string().not_null())
                    .col(ColumnDef::new(ProgramOutcomes::Statement).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_outcomes_program_id")
                            .from(ProgramOutcomes::Table, ProgramOutcomes::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProgramSpecificOutcomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgramSpecificOutcomes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgramSpecificOutcomes::ProgramId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgramSpecificOutcomes::Code)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgramSpecificOutcomes::Statement)
                            .text()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_specific_outcomes_program_id")
                            .from(
                                ProgramSpecificOutcomes::Table,
                                ProgramSpecificOutcomes::ProgramId,
                            )
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create clo_po_mappings and clo_pso_mappings tables
        manager
            .create_table(
                Table::create()
                    .table(CloPoMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CloPoMappings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CloPoMappings::CloId).uuid().not_null())
                    .col(ColumnDef::new(CloPoMappings::PoId).uuid().not_null())
                    .col(ColumnDef::new(CloPoMappings::Level).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clo_po_mappings_clo_id")
                            .from(CloPoMappings::Table, CloPoMappings::CloId)
                            .to(Clos::Table, Clos::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clo_po_mappings_po_id")
                            .from(CloPoMappings::Table, CloPoMappings::PoId)
                            .to(ProgramOutcomes::Table, ProgramOutcomes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CloPsoMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CloPsoMappings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CloPsoMappings::CloId).uuid().not_null())
                    .col(ColumnDef::new(CloPsoMappings::PsoId).uuid().not_null())
                    .col(ColumnDef::new(CloPsoMappings::Level).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clo_pso_mappings_clo_id")
                            .from(CloPsoMappings::Table, CloPsoMappings::CloId)
                            .to(Clos::Table, Clos::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clo_pso_mappings_pso_id")
                            .from(CloPsoMappings::Table, CloPsoMappings::PsoId)
                            .to(ProgramSpecificOutcomes::Table, ProgramSpecificOutcomes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_faculties table
        manager
            .create_table(
                Table::create()
                    .table(CourseFaculties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseFaculties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseFaculties::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CourseFaculties::FacultyId).uuid().not_null())
                    .col(ColumnDef::new(CourseFaculties::Semester).integer().not_null())
                    .col(ColumnDef::new(CourseFaculties::Year).integer().not_null())
                    .col(ColumnDef::new(CourseFaculties::TeachingMethodology).text())
                    .col(ColumnDef::new(CourseFaculties::AssessmentMode).text())
                    .col(
                        ColumnDef::new(CourseFaculties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseFaculties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_faculties_course_id")
                            .from(CourseFaculties::Table, CourseFaculties::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_faculties_faculty_id")
                            .from(CourseFaculties::Table, CourseFaculties::FacultyId)
                            .to(Faculties::Table, Faculties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assessments table
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assessments::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Assessments::FacultyId).uuid().not_null())
                    .col(ColumnDef::new(Assessments::Title).string().not_null())
                    .col(ColumnDef::new(Assessments::Description).text())
                    .col(ColumnDef::new(Assessments::MaxMarks).double().not_null())
                    .col(
                        ColumnDef::new(Assessments::Weightage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Assessments::AssessmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::Mode).string())
                    .col(ColumnDef::new(Assessments::SubType).string())
                    .col(ColumnDef::new(Assessments::Semester).integer().not_null())
                    .col(ColumnDef::new(Assessments::Year).integer().not_null())
                    .col(ColumnDef::new(Assessments::ScheduledDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Assessments::SubmissionDeadline)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(Assessments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Assessments::IsMarksFinalized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assessments::MarksFinalizedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(Assessments::MarksFinalizedById).uuid())
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessments_course_id")
                            .from(Assessments::Table, Assessments::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessments_faculty_id")
                            .from(Assessments::Table, Assessments::FacultyId)
                            .to(Faculties::Table, Faculties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assessment_clos table
        manager
            .create_table(
                Table::create()
                    .table(AssessmentClos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentClos::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssessmentClos::AssessmentId).uuid().not_null())
                    .col(ColumnDef::new(AssessmentClos::CloId).uuid().not_null())
                    .col(
                        ColumnDef::new(AssessmentClos::MarksAllocated)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentClos::Weightage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(AssessmentClos::BloomLevel).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_clos_assessment_id")
                            .from(AssessmentClos::Table, AssessmentClos::AssessmentId)
                            .to(Assessments::Table, Assessments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assessment_clos_clo_id")
                            .from(AssessmentClos::Table, AssessmentClos::CloId)
                            .to(Clos::Table, Clos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create marks table
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Marks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Marks::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Marks::AssessmentId).uuid().not_null())
                    .col(ColumnDef::new(Marks::CloId).uuid().not_null())
                    .col(ColumnDef::new(Marks::MarksObtained).double().not_null())
                    .col(ColumnDef::new(Marks::EnteredById).uuid())
                    .col(
                        ColumnDef::new(Marks::EnteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Marks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_student_id")
                            .from(Marks::Table, Marks::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_assessment_id")
                            .from(Marks::Table, Marks::AssessmentId)
                            .to(Assessments::Table, Assessments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_clo_id")
                            .from(Marks::Table, Marks::CloId)
                            .to(Clos::Table, Clos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create student_course_enrollments table
        manager
            .create_table(
                Table::create()
                    .table(StudentCourseEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::StudentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::Semester)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::Year)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourseEnrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_course_enrollments_student_id")
                            .from(
                                StudentCourseEnrollments::Table,
                                StudentCourseEnrollments::StudentId,
                            )
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_course_enrollments_course_id")
                            .from(
                                StudentCourseEnrollments::Table,
                                StudentCourseEnrollments::CourseId,
                            )
                            .to(Courses::Table, Courses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(StudentCourseEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssessmentClos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseFaculties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CloPsoMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CloPoMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProgramSpecificOutcomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProgramOutcomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faculties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Programs {
    Table,
    Id,
    Name,
    Code,
    Slug,
    ProgramType,
    Level,
    ParentId,
    Duration,
    CreatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
    Code,
    Slug,
    ProgramId,
    HodId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    DepartmentId,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Faculties {
    Table,
    Id,
    UserId,
    DepartmentId,
    Name,
    Designation,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    UserId,
    RollNumber,
    AdmissionYear,
    CurrentSemester,
    DepartmentId,
    CreatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Name,
    Slug,
    Semester,
    Credits,
    CourseType,
    Category,
    Description,
    DepartmentId,
    CreatedById,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Clos {
    Table,
    Id,
    CourseId,
    Code,
    Statement,
    BloomLevel,
    AttainmentThreshold,
    DisplayOrder,
    Version,
    IsActive,
    CreatedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProgramOutcomes {
    Table,
    Id,
    ProgramId,
    Code,
    Statement,
}

#[derive(Iden)]
enum ProgramSpecificOutcomes {
    Table,
    Id,
    ProgramId,
    Code,
    Statement,
}

#[derive(Iden)]
enum CloPoMappings {
    Table,
    Id,
    CloId,
    PoId,
    Level,
}

#[derive(Iden)]
enum CloPsoMappings {
    Table,
    Id,
    CloId,
    PsoId,
    Level,
}

#[derive(Iden)]
enum CourseFaculties {
    Table,
    Id,
    CourseId,
    FacultyId,
    Semester,
    Year,
    TeachingMethodology,
    AssessmentMode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Assessments {
    Table,
    Id,
    CourseId,
    FacultyId,
    Title,
    Description,
    MaxMarks,
    Weightage,
    AssessmentType,
    Mode,
    SubType,
    Semester,
    Year,
    ScheduledDate,
    SubmissionDeadline,
    IsActive,
    IsMarksFinalized,
    MarksFinalizedAt,
    MarksFinalizedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AssessmentClos {
    Table,
    Id,
    AssessmentId,
    CloId,
    MarksAllocated,
    Weightage,
    BloomLevel,
}

#[derive(Iden)]
enum Marks {
    Table,
    Id,
    StudentId,
    AssessmentId,
    CloId,
    MarksObtained,
    EnteredById,
    EnteredAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentCourseEnrollments {
    Table,
    Id,
    StudentId,
    CourseId,
    Semester,
    Year,
    Status,
    CreatedAt,
}
