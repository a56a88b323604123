//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid queue capacity {capacity} (must be between 1 and {max})")]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Failed to allocate queue storage for {capacity} items: {message}")]
    Allocation { capacity: usize, message: String },

    #[error("Queue operation cancelled")]
    Cancelled,

    #[error("Queue synchronisation failed: {message}")]
    Synchronisation { message: String },
}

impl QueueError {
    /// True when the caller should stop working rather than report a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueueError::Cancelled)
    }
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, QueueError::InvalidCapacity { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::InvalidCapacity { .. } => {
                Some("Queue capacity is outside the supported range")
            }
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
