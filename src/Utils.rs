//! different utility modules used throughout the project
/// terminal and file logging set up from the configuration
pub mod logger;
/// run configuration read from a TOML file
pub mod config;
