use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Strength of a CLO's contribution to a PO or PSO, from 0 (none) to 3 (high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MappingLevel(u8);

impl MappingLevel {
    pub const MAX: u8 = 3;

    pub fn new(level: i32) -> Option<Self> {
        u8::try_from(level)
            .ok()
            .filter(|l| *l <= Self::MAX)
            .map(Self)
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

impl TryFrom<i32> for MappingLevel {
    type Error = String;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("Mapping level must be between 0 and 3, got {level}"))
    }
}

impl From<MappingLevel> for i32 {
    fn from(level: MappingLevel) -> Self {
        level.value()
    }
}

impl Display for MappingLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Attainment thresholds are percentages
pub fn valid_attainment_threshold(threshold: f64) -> bool {
    threshold.is_finite() && (0.0..=100.0).contains(&threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_level_bounds() {
        assert_eq!(MappingLevel::new(0).map(MappingLevel::value), Some(0));
        assert_eq!(MappingLevel::new(3).map(MappingLevel::value), Some(3));
        assert!(MappingLevel::new(4).is_none());
        assert!(MappingLevel::new(-1).is_none());
    }

    #[test]
    fn test_mapping_level_serde() {
        let level: MappingLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level.value(), 2);
        assert!(serde_json::from_str::<MappingLevel>("7").is_err());
        assert_eq!(serde_json::to_string(&level).unwrap(), "2");
    }

    #[test]
    fn test_attainment_threshold() {
        assert!(valid_attainment_threshold(60.0));
        assert!(valid_attainment_threshold(0.0));
        assert!(valid_attainment_threshold(100.0));
        assert!(!valid_attainment_threshold(100.5));
        assert!(!valid_attainment_threshold(f64::NAN));
    }
}
