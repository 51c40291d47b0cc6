//! Error types for forthcon.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for forthcon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Serial transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Command source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Session configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error is a prompt wait that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Channel(ChannelError::PromptTimeout(_)))
    }
}

/// Transport layer errors (opening and talking to the serial device).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The named serial port could not be opened
    #[error("Device unavailable: {port}: {source}")]
    DeviceUnavailable {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The reader side of the port went away
    #[error("Serial device disconnected")]
    Disconnected,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (prompt matching, transcript).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The prompt marker did not show up in time
    #[error("Prompt not seen within {0:?}")]
    PromptTimeout(Duration),

    /// Invalid regex pattern
    #[error("Invalid prompt pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Writing the operator transcript failed
    #[error("Transcript write failed: {0}")]
    Transcript(#[source] io::Error),
}

/// Driver layer errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Errors produced while loading command lines.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be read
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors produced while loading a session file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for a session
    #[error("Invalid session file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its domain
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Result type alias using forthcon's Error.
pub type Result<T> = std::result::Result<T, Error>;
