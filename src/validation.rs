//! Input validation performed before anything reaches the store.
//!
//! Each check is pure; the db layer runs the relevant check at the top of
//! every mutating operation so that malformed input never turns into a
//! partial write.

use crate::domain::ProblemKind;

/// A rejected input, with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

fn reject(msg: impl Into<String>) -> Result<(), ValidationError> {
    Err(ValidationError(msg.into()))
}

/// Subject names must be non-empty after trimming.
pub fn subject_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return reject("subject name must not be empty");
    }
    Ok(())
}

/// Series names must be non-empty after trimming.
pub fn series_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return reject("series name must not be empty");
    }
    Ok(())
}

/// Numbered kinds require a positive number; session kinds take none.
pub fn problem_number(kind: ProblemKind, number: Option<u32>) -> Result<(), ValidationError> {
    match (kind.requires_number(), number) {
        (true, None) => reject(format!("{} requires a number", kind.display_name())),
        (true, Some(0)) => reject("problem number must be a positive integer"),
        (false, Some(_)) => reject(format!("{} takes no number", kind.display_name())),
        _ => Ok(()),
    }
}

/// Attempt ordinals start at 1.
pub fn attempt_no(no: u32) -> Result<(), ValidationError> {
    if no == 0 {
        return reject("attempt number must be a positive integer");
    }
    Ok(())
}

/// Minutes, when given, must be positive.
pub fn minutes(minutes: Option<u32>) -> Result<(), ValidationError> {
    if minutes == Some(0) {
        return reject("minutes must be positive");
    }
    Ok(())
}
