//! Shared error reporting utilities
//!
//! Every error type in the crate distinguishes between failures the user can
//! fix (bad arguments, bad configuration) and system failures, so the final
//! fatal log line can be specific without dumping internals.

/// Errors that know whether their message is meant for the user
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the error carries a message the user can act on directly
    ///
    /// Argument validation and configuration errors are user-actionable.
    /// Thread spawn failures and lock poisoning are not.
    fn is_user_actionable(&self) -> bool;

    /// The user-facing message for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at the detail level its kind deserves
///
/// User-actionable errors log their own message; system errors log
/// `operation_context` and leave the internals to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use prioflow::core::error_handling::log_error_with_context;
/// # use prioflow::queue::QueueError;
/// let err = QueueError::InvalidCapacity { capacity: 0, max: 20 };
/// log_error_with_context(&err, "Queue initialisation");
/// // Logs: "FATAL: Queue capacity is outside the supported range"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_line(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// The text that follows `FATAL:` for `error`
pub fn fatal_line<'a, E: ContextualError + ?Sized>(
    error: &'a E,
    operation_context: &'a str,
) -> &'a str {
    match (error.is_user_actionable(), error.user_message()) {
        (true, Some(user_msg)) => user_msg,
        _ => operation_context,
    }
}
