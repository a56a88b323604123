//! Worker Error Types

use crate::queue::QueueError;
use crate::worker::Role;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Failed to start {role} {id}: {message}")]
    Spawn {
        role: Role,
        id: usize,
        message: String,
    },

    #[error("Worker thread '{name}' panicked")]
    Panicked { name: String },

    #[error("{role} {id} stopped on a queue failure: {source}")]
    Queue {
        role: Role,
        id: usize,
        #[source]
        source: QueueError,
    },
}

impl crate::core::error_handling::ContextualError for WorkerError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type WorkerResult<T> = Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;
    use std::error::Error;

    #[test]
    fn test_messages_name_the_worker() {
        let spawn = WorkerError::Spawn {
            role: Role::Consumer,
            id: 3,
            message: "Resource temporarily unavailable".into(),
        };
        assert_eq!(
            spawn.to_string(),
            "Failed to start consumer 3: Resource temporarily unavailable"
        );

        let panicked = WorkerError::Panicked {
            name: "producer-2".into(),
        };
        assert_eq!(panicked.to_string(), "Worker thread 'producer-2' panicked");
    }

    #[test]
    fn test_queue_failure_keeps_source() {
        let err = WorkerError::Queue {
            role: Role::Producer,
            id: 1,
            source: QueueError::Synchronisation {
                message: "poisoned".into(),
            },
        };

        assert!(err.source().is_some());
        assert!(!err.is_user_actionable());
        assert!(err.user_message().is_none());
    }
}
