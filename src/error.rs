//! Error types for recipient extraction, learning and dispatch

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting the recipient of a message
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The message file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The guessed encoding cannot decode the message bytes
    #[error("Failed to decode content as {encoding}")]
    Decode { encoding: &'static str },

    /// The content is not a mail message
    #[error("Failed to parse email structure: {0}")]
    Parse(String),

    /// A `Received` header opens a recipient marker but never closes it
    #[error("Unterminated recipient marker in Received header: {0}")]
    MalformedMarker(String),
}

/// Errors raised by a [`crate::Learner`]
#[derive(Error, Debug)]
pub enum LearnError {
    /// The learning command could not be started
    #[error("Failed to run {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a whole dispatch run
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
