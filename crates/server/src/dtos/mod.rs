pub mod assessment;
pub mod assignment;
pub mod course;
pub mod validation;

use database::ServiceError;
use models::term::Term;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Response body shared by every endpoint
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    pub message: Option<String>,
    /// Machine-readable error kind, e.g. `MARKS_CAP_EXCEEDED`
    pub error: Option<String>,
    #[schema(value_type = Object)]
    pub details: Option<Value>,
}

/// Optional term filter; semester and year are given together or not at all
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermQuery {
    pub semester: Option<i32>,
    pub year: Option<i32>,
}

impl TermQuery {
    pub fn term(&self) -> Result<Option<Term>, ServiceError> {
        match (self.semester, self.year) {
            (Some(semester), Some(year)) => Ok(Some(Term::new(semester, year))),
            (None, None) => Ok(None),
            _ => Err(ServiceError::validation("semester and year must be given together")),
        }
    }
}

/// A required term, as query parameters
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequiredTermQuery {
    pub semester: i32,
    pub year: i32,
}

impl From<RequiredTermQuery> for Term {
    fn from(query: RequiredTermQuery) -> Self {
        Term::new(query.semester, query.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_query_both_parts() {
        let query = TermQuery {
            semester: Some(1),
            year: Some(2025),
        };
        assert_eq!(query.term().unwrap(), Some(Term::new(1, 2025)));
        assert_eq!(TermQuery::default().term().unwrap(), None);
    }

    #[test]
    fn test_term_query_rejects_half_term() {
        let semester_only = TermQuery {
            semester: Some(1),
            year: None,
        };
        let year_only = TermQuery {
            semester: None,
            year: Some(2025),
        };
        for query in [semester_only, year_only] {
            assert!(matches!(query.term(), Err(ServiceError::Validation(_))));
        }
    }
}
