//! Run configuration read from a TOML file. Every field is optional:
//! ```toml
//! loglevel = "debug"
//! log_to_file = true
//! imaginary_tolerance = 1e-12
//!
//! [default_n]
//! trapecio = 20
//! ```
use crate::numerical::newton_cotes_rules::NewtonCotesRule;
use crate::symbolic::evaluator::IMAGINARY_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read the configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("loglevel must be debug, info, warn, error or off, got '{0}'")]
    LogLevel(String),
}

/// Number of subintervals used when a request does not give `n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSubintervals {
    pub trapecio: usize,
    pub boole: usize,
    pub simpson38: usize,
    pub simpson13: usize,
}

impl Default for DefaultSubintervals {
    fn default() -> Self {
        Self {
            trapecio: 10,
            boole: 4,
            simpson38: 3,
            simpson13: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadConfig {
    /// "debug", "info", "warn", "error" or "off"
    pub loglevel: Option<String>,
    pub log_to_file: bool,
    pub default_n: DefaultSubintervals,
    pub imaginary_tolerance: f64,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self {
            loglevel: Some("info".to_string()),
            log_to_file: false,
            default_n: DefaultSubintervals::default(),
            imaginary_tolerance: IMAGINARY_TOLERANCE,
        }
    }
}

impl QuadConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: QuadConfig = toml::from_str(content)?;
        crate::Utils::logger::parse_log_level(config.loglevel())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn loglevel(&self) -> &str {
        self.loglevel.as_deref().unwrap_or("info")
    }

    /// `n` of a request that does not set it
    pub fn default_n(&self, rule: NewtonCotesRule) -> usize {
        match rule {
            NewtonCotesRule::Trapezoidal => self.default_n.trapecio,
            NewtonCotesRule::Boole => self.default_n.boole,
            NewtonCotesRule::Simpson38 => self.default_n.simpson38,
            NewtonCotesRule::Simpson13 => self.default_n.simpson13,
            NewtonCotesRule::OpenSimpson13 => 4,
        }
    }
}
