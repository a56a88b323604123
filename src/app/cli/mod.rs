//! Command-line parsing, configuration file and validation

pub mod args;
pub mod config;
pub mod validation;

pub use args::Args;
pub use config::default_config_path;
pub use validation::RunSettings;
