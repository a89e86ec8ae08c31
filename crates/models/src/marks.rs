use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Each credit of a course is worth this many assessment marks
pub const MARKS_PER_CREDIT: f64 = 25.0;

/// Tolerance used when comparing sums of fractional marks
pub const MARKS_EPSILON: f64 = 1e-6;

/// Upper bound on the total assessment marks of a course
pub fn max_course_marks(credits: i32) -> f64 {
    f64::from(credits.max(0)) * MARKS_PER_CREDIT
}

/// Rounds to two decimal places for presentation
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `allocated` that `obtained` represents, as a percentage.
///
/// Returns 0 when nothing is allocated.
pub fn percentage(obtained: f64, allocated: f64) -> f64 {
    if allocated <= 0.0 {
        return 0.0;
    }
    obtained / allocated * 100.0
}

/// Weightage of a CLO allocation when the caller does not supply one
pub fn default_weightage(marks_allocated: f64, max_marks: f64) -> f64 {
    percentage(marks_allocated, max_marks)
}

/// Whether a set of CLO allocations covers an assessment's max marks exactly
pub fn allocation_matches(total_allocated: f64, max_marks: f64) -> bool {
    (total_allocated - max_marks).abs() <= MARKS_EPSILON
}

/// Marks suggested for a course's single practical component.
///
/// Three and four credit courses carry one credit of practical work.
pub fn recommended_practical_marks(credits: i32) -> f64 {
    match credits {
        3 | 4 => MARKS_PER_CREDIT,
        _ => 0.0,
    }
}

/// Running total of assessment marks against a course's cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksCap {
    pub max_course_marks: f64,
    pub current_total: f64,
}

impl MarksCap {
    pub fn new(credits: i32, current_total: f64) -> Self {
        Self {
            max_course_marks: max_course_marks(credits),
            current_total,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.max_course_marks - self.current_total).max(0.0)
    }

    /// Whether an assessment worth `requested` marks still fits under the cap
    pub fn fits(&self, requested: f64) -> bool {
        self.current_total + requested <= self.max_course_marks + MARKS_EPSILON
    }

    pub fn percentage_used(&self) -> f64 {
        percentage(self.current_total, self.max_course_marks)
    }

    pub fn with_added(self, marks: f64) -> Self {
        Self {
            current_total: self.current_total + marks,
            ..self
        }
    }

    /// Dry-run verdict for adding an assessment worth `requested` marks
    pub fn verdict(&self, requested: f64) -> CapVerdict {
        let allowed = self.fits(requested);
        let message = if allowed {
            format!(
                "Assessment can be created. {} marks will remain after this assessment.",
                round2(self.remaining() - requested)
            )
        } else {
            format!(
                "Cannot create assessment. Total marks would exceed {}. Currently using {} marks, only {} remaining.",
                self.max_course_marks,
                self.current_total,
                round2(self.remaining())
            )
        };

        CapVerdict {
            allowed,
            max_course_marks: self.max_course_marks,
            current_total: self.current_total,
            proposed_total: self.current_total + requested,
            remaining: self.remaining(),
            message,
        }
    }
}

/// Outcome of checking a proposed assessment against the marks cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapVerdict {
    pub allowed: bool,
    pub max_course_marks: f64,
    pub current_total: f64,
    pub proposed_total: f64,
    pub remaining: f64,
    pub message: String,
}

/// Reason a single mark value is unacceptable for its CLO allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum MarkRejection {
    NotANumber,
    Negative { obtained: f64 },
    ExceedsAllocation { obtained: f64, allocated: f64 },
}

impl Display for MarkRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotANumber => write!(f, "Marks must be a finite number"),
            Self::Negative { .. } => write!(f, "Marks cannot be negative"),
            Self::ExceedsAllocation {
                obtained,
                allocated,
            } => write!(
                f,
                "Marks ({obtained}) cannot exceed maximum allowed ({allocated})"
            ),
        }
    }
}

/// Checks a mark value against the marks allocated to its CLO
pub fn check_mark(obtained: f64, allocated: f64) -> Result<(), MarkRejection> {
    if !obtained.is_finite() {
        return Err(MarkRejection::NotANumber);
    }
    if obtained < 0.0 {
        return Err(MarkRejection::Negative { obtained });
    }
    if obtained > allocated + MARKS_EPSILON {
        return Err(MarkRejection::ExceedsAllocation {
            obtained,
            allocated,
        });
    }
    Ok(())
}

/// Summary statistics over per-student assessment totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStatistics {
    pub total_students: usize,
    pub students_with_marks: usize,
    pub average_marks: f64,
    pub highest_marks: f64,
    pub lowest_marks: f64,
}

impl ScoreStatistics {
    /// Computes statistics from every student's total.
    ///
    /// A student counts as having marks once any of their CLO marks is
    /// nonzero. An empty roster yields all zeros.
    pub fn from_totals(totals: &[f64], students_with_marks: usize) -> Self {
        if totals.is_empty() {
            return Self::default();
        }

        let sum: f64 = totals.iter().sum();
        let highest = totals.iter().copied().fold(f64::MIN, f64::max);
        let lowest = totals.iter().copied().fold(f64::MAX, f64::min);

        Self {
            total_students: totals.len(),
            students_with_marks,
            average_marks: round2(sum / totals.len() as f64),
            highest_marks: highest,
            lowest_marks: lowest,
        }
    }
}
