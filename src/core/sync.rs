//! Synchronization utilities for robust mutex handling
//!
//! Lock and condition-variable results are converted into domain errors
//! instead of being unwrapped, so a panic in one worker surfaces as an
//! error in the others rather than cascading panics.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Works for anything returning a `LockResult`, which covers both
/// `Mutex::lock` and `Condvar::wait`.
///
/// # Arguments
/// * `result` - The result from a lock or wait operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use prioflow::core::sync::handle_mutex_poison;
/// use prioflow::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Synchronisation { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "lock poisoned after a panic occurred while it was held: {:?}",
            poison_err
        ))
    })
}
