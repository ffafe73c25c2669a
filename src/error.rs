use serde::{Serialize, Deserialize};
use std::fmt;

/// Error type for the fallible edges of the crate (config loading, snapshot I/O).
/// Engine operations themselves never fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressError {
    pub message: String,
    pub stage: String,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl ProgressError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        ProgressError {
            message: message.into(),
            stage: stage.to_string(),
            context: None,
            source: None,
        }
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProgressError {}

impl From<std::io::Error> for ProgressError {
    fn from(err: std::io::Error) -> Self {
        ProgressError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        ProgressError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<toml::de::Error> for ProgressError {
    fn from(err: toml::de::Error) -> Self {
        ProgressError::new(
            format!("TOML error: {}", err),
            "config"
        ).with_source("toml")
    }
}

/// Rejected string forms of the closed enums (difficulty, feature key, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown difficulty: {0}")]
    Difficulty(String),
    #[error("unknown feature key: {0}")]
    FeatureKey(String),
    #[error("unknown achievement category: {0}")]
    Category(String),
    #[error("unknown rarity: {0}")]
    Rarity(String),
}
