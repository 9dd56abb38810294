use crate::Utils::config::{ConfigError, QuadConfig};
use chrono::Local;
use log::{LevelFilter, debug};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

pub fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(ConfigError::LogLevel(other.to_string())),
    }
}

/// Terminal logger, plus a `log_<date>_<time>.txt` file when `log_to_file` is set.
/// Only the first call in a process installs a logger; later calls are no-ops.
pub fn init_logger(config: &QuadConfig) -> Result<(), ConfigError> {
    let level = parse_log_level(config.loglevel())?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if config.log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(level, Config::default(), File::create(name)?));
    }
    if CombinedLogger::init(loggers).is_err() {
        debug!("logger already initialized");
    }
    Ok(())
}
