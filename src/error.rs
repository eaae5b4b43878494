//! Error types shared by the library
//!
//! Startup failures are collected in [`ResourceError`] so a session can refuse
//! to start without taking the whole process down. High score I/O has its own
//! error type because callers usually log it and carry on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A resource needed before a session can start was unavailable
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),
}

/// Reading or writing the persisted high score failed
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file {path} could not be accessed")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("high score file {path} does not contain a score: {contents:?}")]
    Parse { path: PathBuf, contents: String },
}
