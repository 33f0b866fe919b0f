use thiserror::Error;

/// Input that fails application-level validation before touching the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid Bash Points value: {0}")]
    InvalidPoints(String),

    #[error("Points change must not be zero")]
    ZeroPoints,

    #[error("Event must end after it starts")]
    InvalidTimeRange,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("{0} is already taken")]
    Duplicate(String),
}

/// Trim a required text field, rejecting blanks.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Optional text inputs: blank clears the field.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
