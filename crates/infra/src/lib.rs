//! Infrastructure layer: job persistence, background execution, configuration.

pub mod config;
pub mod jobs;

pub use config::{AppConfig, ConfigError};
