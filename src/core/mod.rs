//! Core services and infrastructure

pub mod cancellation;
pub mod error_handling;
pub mod logging;
pub mod shutdown;
pub mod styles; // colour roles for the summary and clap help
pub mod sync;
pub mod time;
pub mod validation;
pub mod version;
