use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Fields of an assessment that stay editable after marks are entered
pub const EDITABLE_AFTER_MARKS: [&str; 3] = ["description", "scheduledDate", "submissionDeadline"];

/// Where an assessment is in its marking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentState {
    /// No marks yet; structure may change freely
    Open,
    /// Marks exist; structure is locked
    MarksEntered,
    /// Marks are locked against further entry
    Finalized,
}

impl AssessmentState {
    pub fn derive(is_marks_finalized: bool, marks_count: u64) -> Self {
        match (is_marks_finalized, marks_count) {
            (true, _) => Self::Finalized,
            (false, 0) => Self::Open,
            (false, _) => Self::MarksEntered,
        }
    }

    /// Whether the structural fields (max marks, type, CLO allocations) may change
    pub fn structure_editable(self) -> bool {
        self == Self::Open
    }

    pub fn accepts_marks(self) -> bool {
        self != Self::Finalized
    }

    pub fn can_finalize(self) -> bool {
        self != Self::Finalized
    }
}
