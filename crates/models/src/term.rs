use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// An academic term, identified by semester number and calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    pub year: i32,
    pub semester: i32,
}

impl Term {
    pub fn new(semester: i32, year: i32) -> Self {
        Self { year, semester }
    }

    /// The term a calendar date falls in.
    ///
    /// January through June is the even (second) semester, July through
    /// December the odd (first) one.
    pub fn containing(date: NaiveDate) -> Self {
        let semester = if date.month() <= 6 { 2 } else { 1 };
        Self::new(semester, date.year())
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// Semester numbers run from 1 to 8 across a degree
    pub fn is_valid(&self) -> bool {
        (1..=8).contains(&self.semester) && (2000..=2100).contains(&self.year)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "semester {} of {}", self.semester, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_containing() {
        let spring = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(Term::containing(spring), Term::new(2, 2025));

        let june = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(Term::containing(june), Term::new(2, 2025));

        let july = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(Term::containing(july), Term::new(1, 2025));
    }

    #[test]
    fn test_term_ordering() {
        assert!(Term::new(2, 2024) < Term::new(1, 2025));
        assert!(Term::new(1, 2025) < Term::new(2, 2025));
    }

    #[test]
    fn test_term_validity() {
        assert!(Term::new(1, 2025).is_valid());
        assert!(!Term::new(0, 2025).is_valid());
        assert!(!Term::new(9, 2025).is_valid());
        assert!(!Term::new(3, 1999).is_valid());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::new(3, 2025).to_string(), "semester 3 of 2025");
    }
}
