use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[cfg(feature = "database")]
use sea_orm::{DeriveActiveEnum, EnumIter, sea_query::StringLen};

/// Delivery type of a course
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CourseType {
    #[cfg_attr(feature = "database", sea_orm(string_value = "THEORY"))]
    Theory,
    #[cfg_attr(feature = "database", sea_orm(string_value = "PRACTICAL"))]
    Practical,
    #[cfg_attr(feature = "database", sea_orm(string_value = "BOTH"))]
    Both,
}

/// Curriculum bucket a course is counted under
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CourseCategory {
    /// Multidisciplinary
    #[cfg_attr(feature = "database", sea_orm(string_value = "MAD"))]
    Mad,
    /// Value added
    #[cfg_attr(feature = "database", sea_orm(string_value = "VAC"))]
    Vac,
    /// Skill enhancement
    #[cfg_attr(feature = "database", sea_orm(string_value = "SEC"))]
    Sec,
    #[cfg_attr(feature = "database", sea_orm(string_value = "CORE"))]
    Core,
    #[cfg_attr(feature = "database", sea_orm(string_value = "VOCATIONAL"))]
    Vocational,
}

/// Programs form a tree: levels (UG, PG) contain degrees
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ProgramType {
    #[cfg_attr(feature = "database", sea_orm(string_value = "LEVEL"))]
    Level,
    #[cfg_attr(feature = "database", sea_orm(string_value = "DEGREE"))]
    Degree,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(
    feature = "database",
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EnrollmentStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "ENROLLED"))]
    Enrolled,
    #[cfg_attr(feature = "database", sea_orm(string_value = "DROPPED"))]
    Dropped,
    #[cfg_attr(feature = "database", sea_orm(string_value = "COMPLETED"))]
    Completed,
}

/// Assessment types are free-form labels; only "practical" carries a rule.
pub fn is_practical(assessment_type: &str) -> bool {
    assessment_type.trim().eq_ignore_ascii_case("practical")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_course_type_parsing() {
        assert_eq!(CourseType::from_str("THEORY").unwrap(), CourseType::Theory);
        assert_eq!(CourseType::from_str("both").unwrap(), CourseType::Both);
        assert!(CourseType::from_str("LAB").is_err());
    }

    #[test]
    fn test_category_round_trip_through_display() {
        for category in [
            CourseCategory::Mad,
            CourseCategory::Vac,
            CourseCategory::Sec,
            CourseCategory::Core,
            CourseCategory::Vocational,
        ] {
            assert_eq!(CourseCategory::from_str(&category.to_string()).unwrap(), category);
        }
    }

    #[test]
    fn test_enrollment_status_serde() {
        let status: EnrollmentStatus = serde_json::from_str("\"DROPPED\"").unwrap();
        assert_eq!(status, EnrollmentStatus::Dropped);
    }

    #[test]
    fn test_is_practical() {
        assert!(is_practical("practical"));
        assert!(is_practical("Practical "));
        assert!(!is_practical("assignment"));
        assert!(!is_practical("practical-quiz"));
    }
}
