//! Run parameter validation tests

use crate::common::parse_args;
use prioflow::app::error::AppError;
use prioflow::core::error_handling::{fatal_line, ContextualError};

#[test]
fn test_every_invalid_argument_listed() {
    let err = parse_args(&["-1", "0", "0", "-3"]).validate().unwrap_err();

    assert_eq!(err.issues().len(), 4);
    assert!(err.to_string().starts_with("4 invalid settings: "));
}

#[test]
fn test_only_invalid_arguments_listed() {
    let err = parse_args(&["5", "12", "5", "5"]).validate().unwrap_err();

    assert_eq!(
        err.issues(),
        ["Number of consumers must be between 1 and 10 (got 12)"]
    );
}

#[test]
fn test_validation_failure_is_user_actionable() {
    let err = AppError::from(parse_args(&["1", "1", "25", "1"]).validate().unwrap_err());

    assert!(err.is_user_actionable());
    assert_eq!(
        fatal_line(&err, "Argument validation"),
        "Queue size must be between 1 and 20 (got 25)"
    );
}
