pub mod assessment;
pub mod assessment_clo;
pub mod clo;
pub mod clo_po_mapping;
pub mod clo_pso_mapping;
pub mod course;
pub mod course_faculty;
pub mod department;
pub mod faculty;
pub mod mark;
pub mod po;
pub mod program;
pub mod pso;
pub mod student;
pub mod student_course_enrollment;
pub mod user;
