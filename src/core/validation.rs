//! Validation errors and range checks for run parameters

use crate::core::error_handling::ContextualError;
use std::fmt;

/// One or more problems with user-supplied settings
///
/// Several issues can be collected and reported together so the user can
/// fix every argument in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
    issues: Vec<String>,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            issues: vec![message.to_string()],
        }
    }

    /// Combine every collected issue into one error
    pub fn from_issues(issues: Vec<String>) -> Self {
        let message = match issues.len() {
            1 => issues[0].clone(),
            _ => format!("{} invalid settings: {}", issues.len(), issues.join("; ")),
        };
        Self { message, issues }
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Check that `value` lies in `min..=max`
pub fn validate_range(name: &str, value: i64, min: i64, max: i64) -> Result<(), String> {
    if value < min || value > max {
        Err(format!(
            "{} must be between {} and {} (got {})",
            name, min, max, value
        ))
    } else {
        Ok(())
    }
}

/// Check that `value` is strictly positive
pub fn validate_positive(name: &str, value: i64) -> Result<(), String> {
    if value <= 0 {
        Err(format!("{} must be greater than 0 (got {})", name, value))
    } else {
        Ok(())
    }
}
