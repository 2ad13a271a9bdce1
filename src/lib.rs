pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod log;
pub mod planner;
pub mod prompt;
pub mod provider;
pub mod ux;
pub mod wire;
