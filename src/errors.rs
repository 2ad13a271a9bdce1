use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Please enter your API key to continue.")]
    MissingCredential,
    #[error("An error occurred: {0}")]
    GenerationService(String),
    #[error("temperature must be between 0.0 and 1.0 (got {0})")]
    TemperatureOutOfRange(f32),
    #[error("temperature must be a number between 0.0 and 1.0 (got '{0}')")]
    InvalidTemperature(String),
    #[error("unknown {field} '{value}' (expected one of: {expected})")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("invalid lesson date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("config file {path}: {detail}")]
    Config { path: PathBuf, detail: String },
}
