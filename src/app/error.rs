//! Application-level error type

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::queue::QueueError;
use crate::worker::WorkerError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration file {path}: {message}", path = .path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to initialise logging: {message}")]
    Logging { message: String },

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("Failed to start the coordinating runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Worker join task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Failed to render the summary: {0}")]
    Summary(#[from] serde_json::Error),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config { .. } => true,
            AppError::Validation(e) => e.is_user_actionable(),
            AppError::Queue(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config { message, .. } => Some(message),
            AppError::Validation(e) => e.user_message(),
            AppError::Queue(e) => e.user_message(),
            _ => None,
        }
    }
}
