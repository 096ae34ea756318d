/*!
 * Error types for the subtrack application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::session::Phase;

/// Errors reported by the decoding collaborator
#[derive(Error, Debug)]
pub enum DecoderError {
    /// The decoder was used before `initialize` succeeded
    #[error("Decoder not initialized")]
    NotInitialized,

    /// No input has been loaded into the work area
    #[error("No input loaded")]
    NoInput,

    /// The requested stream selector does not exist in the input
    #[error("Stream selector not found: {0}")]
    SelectorNotFound(String),

    /// The stream exists but could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The decoder process could not be started
    #[error("Failed to start decoder: {0}")]
    Spawn(String),

    /// Work area I/O failure
    #[error("Decoder I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecoderError {
    /// True when the failure says something about the stream itself rather
    /// than about the decoder infrastructure.
    pub fn is_stream_failure(&self) -> bool {
        matches!(self, Self::SelectorNotFound(_) | Self::DecodeError(_))
    }
}

/// Errors surfaced by the extraction pipeline and the session state machine
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The decoding collaborator failed to start
    #[error("Failed to initialize decoder: {0}")]
    InitializationFailed(String),

    /// Probing failed for reasons other than "no more streams"
    #[error("Stream discovery failed: {0}")]
    DiscoveryFailed(String),

    /// A single stream extraction failed, aborting the sequence
    #[error("Failed to extract subtitle track {index}: {reason}")]
    ExtractionFailed {
        /// Stream index that failed
        index: usize,
        /// Decoder failure description
        reason: String,
    },

    /// Extraction was requested without any stream
    #[error("No subtitle track selected")]
    NoStreamsSelected,

    /// The index does not name a discovered stream
    #[error("Subtitle track {0} is not available")]
    InvalidSelection(usize),

    /// The operation is not allowed in the current phase
    #[error("Cannot {action} while session is {phase}")]
    InvalidTransition {
        /// Phase the session was in
        phase: Phase,
        /// Rejected operation
        action: &'static str,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the decoding collaborator
    #[error("Decoder error: {0}")]
    Decoder(#[from] DecoderError),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
