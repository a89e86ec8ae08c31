pub mod access;
pub mod allocation;
pub mod assessment;
pub mod assignment;
pub mod course;
pub mod faculty;
pub mod marks;
pub mod outcome_mapping;
pub mod stats;
pub mod validation;
