use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by the marketplace store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Validation failed for one or more fields.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Seed data is inconsistent with the store's id sequencing.
    #[error("invalid seed data: {message}")]
    InvalidSeed { message: String },

    /// Seed file could not be read.
    #[error("seed io error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload or seed document could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl StoreError {
    /// Returns the validation issues when this error came from schema validation.
    pub fn validation_issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            StoreError::Validation(err) => Some(&err.issues),
            _ => None,
        }
    }
}

/// Collection of validation issues encountered while preparing a record.
#[derive(Debug, Clone, Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Names of the offending fields, in the order they were reported.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !fields.contains(&issue.field.as_str()) {
                fields.push(issue.field.as_str());
            }
        }
        fields
    }

    pub fn has_issue(&self, field: &str, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field && issue.code == code)
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_deduplicated_in_report_order() {
        let err = ValidationError::new([
            ValidationIssue::new("username", "validation.length", "length must be at least 3"),
            ValidationIssue::new("email", "validation.email", "value must be a valid email address"),
            ValidationIssue::new("username", "validation.invalid_type", "expected string"),
        ]);
        assert_eq!(err.fields(), vec!["username", "email"]);
        assert!(err.has_issue("email", "validation.email"));
        assert!(!err.has_issue("email", "validation.length"));
    }

    #[test]
    fn display_lists_every_issue() {
        let err = ValidationError::single("royaltyPercentage", "validation.range", "value must be at most 25");
        assert_eq!(err.to_string(), "royaltyPercentage: value must be at most 25");
        let wrapped = StoreError::from(err);
        assert_eq!(wrapped.validation_issues().map(|issues| issues.len()), Some(1));
    }
}
