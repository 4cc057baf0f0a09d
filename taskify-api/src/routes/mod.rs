/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, me)
/// - `priorities`: Priority catalog
/// - `categories`: Category management
/// - `todos`: Todo management

use crate::error::{ApiError, ValidationErrorDetail};
use serde::Deserialize;
use taskify_shared::db::repo::{DEFAULT_LIMIT, DEFAULT_SKIP, MAX_PAGE_PARAM};

pub mod auth;
pub mod categories;
pub mod health;
pub mod priorities;
pub mod todos;

/// Folds validator failures into the 422 response shape, one detail per
/// failed field rule.
pub(crate) fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Pagination query parameters shared by list endpoints.
///
/// Both values are bounded to the i32 range; out-of-range requests are
/// rejected at the boundary instead of being silently clamped.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// Number of rows to skip
    #[serde(default = "default_skip")]
    pub skip: i64,

    /// Maximum number of rows to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_skip() -> i64 {
    DEFAULT_SKIP
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Validates both parameters against the accepted range.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(0..=MAX_PAGE_PARAM).contains(&self.skip) {
            return Err(ApiError::BadRequest(format!(
                "skip must be between 0 and {}",
                MAX_PAGE_PARAM
            )));
        }
        if !(0..=MAX_PAGE_PARAM).contains(&self.limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 0 and {}",
                MAX_PAGE_PARAM
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn test_validation_errors_carry_field_and_message() {
        let sample = Sample {
            email: "not-an-email".to_string(),
        };
        let err = validation_errors(sample.validate().unwrap_err());
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "email");
                assert_eq!(details[0].message, "Invalid email format");
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.skip, 0);
        assert_eq!(pagination.limit, 100);
        assert!(pagination.validate().is_ok());
    }

    #[test]
    fn test_pagination_rejects_negative_values() {
        let pagination = Pagination { skip: -1, limit: 10 };
        assert!(pagination.validate().is_err());

        let pagination = Pagination { skip: 0, limit: -5 };
        assert!(pagination.validate().is_err());
    }

    #[test]
    fn test_pagination_rejects_values_beyond_i32() {
        let pagination = Pagination {
            skip: MAX_PAGE_PARAM + 1,
            limit: 10,
        };
        assert!(pagination.validate().is_err());
    }
}
