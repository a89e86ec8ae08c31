use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[cfg(feature = "database")]
use sea_orm::{DeriveActiveEnum, EnumIter, sea_query::StringLen};

/// Role carried by every user account
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
pub enum Role {
    #[cfg_attr(feature = "database", sea_orm(string_value = "ADMIN"))]
    Admin,
    /// Head of a department
    #[cfg_attr(feature = "database", sea_orm(string_value = "HOD"))]
    Hod,
    #[cfg_attr(feature = "database", sea_orm(string_value = "FACULTY"))]
    Faculty,
    #[cfg_attr(feature = "database", sea_orm(string_value = "STUDENT"))]
    Student,
}

impl Role {
    /// Whether the role may act on department-scoped catalog data
    pub fn manages_departments(self) -> bool {
        matches!(self, Self::Admin | Self::Hod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("HOD").unwrap(), Role::Hod);
        assert_eq!(Role::from_str("faculty").unwrap(), Role::Faculty);
        assert!(Role::from_str("DEAN").is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::Student.as_ref(), "STUDENT");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Hod).unwrap();
        assert_eq!(json, "\"HOD\"");
        let role: Role = serde_json::from_str("\"FACULTY\"").unwrap();
        assert_eq!(role, Role::Faculty);
    }

    #[test]
    fn test_manages_departments() {
        assert!(Role::Hod.manages_departments());
        assert!(Role::Admin.manages_departments());
        assert!(!Role::Faculty.manages_departments());
    }
}
