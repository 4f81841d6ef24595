use std::path::PathBuf;

use thiserror::Error;

/// Error type for a decompression computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecoError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid config {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("decompression did not converge after {iterations} stop minutes")]
    NonConvergence { iterations: u32 },

    #[error("no safety-stop-only bottom time up to {max_trial_minutes} min")]
    SearchExhausted { max_trial_minutes: u32 },
}

impl DecoError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        DecoError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        DecoError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Error type for parsing host text entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("empty {field}")]
    Empty { field: &'static str },

    #[error("parse error in {field} at position {position}: {message}")]
    Parse {
        field: &'static str,
        position: usize,
        message: String,
    },

    #[error(transparent)]
    OutOfRange(#[from] DecoError),
}

/// Error type for loading a [`crate::config::DecoConfig`] from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] DecoError),
}
