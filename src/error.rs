use std::collections::BTreeMap;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    DateOrdering,
    MinimumStay,
    RangeConstraint,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip)]
    pub field: String,
    pub kind: ValidationKind,
    pub message: String,
}

/// One or more field-scoped validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, kind: ValidationKind, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, kind, message);
        errors
    }

    pub fn push(&mut self, field: &str, kind: ValidationKind, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Kind of the first failure recorded against `field`.
    pub fn kind_of(&self, field: &str) -> Option<ValidationKind> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.kind)
    }

    pub fn message_of(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn by_field(&self) -> BTreeMap<&str, Vec<&FieldError>> {
        let mut grouped: BTreeMap<&str, Vec<&FieldError>> = BTreeMap::new();
        for error in &self.errors {
            grouped.entry(error.field.as_str()).or_default().push(error);
        }
        grouped
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let kind = match failure.code.as_ref() {
                    "range" => ValidationKind::RangeConstraint,
                    _ => ValidationKind::Invalid,
                };
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", failure.code));
                out.push(&field, kind, message);
            }
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),
    #[error("a listing with host_id {host_id:?} already exists")]
    HostConflict { host_id: String },
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        AppError::NotFound { resource, id }
    }

    /// Field errors carried by a validation failure, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<&'a str, Vec<&'a FieldError>>>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::HostConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => ErrorResponse {
                error: "validation_failed",
                message: None,
                fields: Some(errors.by_field()),
            },
            AppError::HostConflict { .. } => ErrorResponse {
                error: "conflict",
                message: Some(self.to_string()),
                fields: None,
            },
            AppError::NotFound { .. } => ErrorResponse {
                error: "not_found",
                message: Some(self.to_string()),
                fields: None,
            },
            AppError::Database(_) | AppError::Migrate(_) => {
                log::error!("{self}");
                ErrorResponse {
                    error: "internal_error",
                    message: None,
                    fields: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_of_reports_first_failure_for_field() {
        let mut errors = FieldErrors::single("check_out", ValidationKind::DateOrdering, "bad order");
        errors.push("check_out", ValidationKind::MinimumStay, "too short");
        assert_eq!(errors.kind_of("check_out"), Some(ValidationKind::DateOrdering));
        assert_eq!(errors.kind_of("check_in"), None);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::from(FieldErrors::single(
            "rating",
            ValidationKind::RangeConstraint,
            "out of range",
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_and_not_found_statuses() {
        let conflict = AppError::HostConflict {
            host_id: "HOST1".into(),
        };
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::not_found("listing", 3).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
