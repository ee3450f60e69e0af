//! # Playback Error Types
//!
//! Errors returned by the media manager.

use bridge_traits::BridgeError;
use std::fmt;
use thiserror::Error;

/// Transport operations that exist on the manager but have no implementation
/// on any platform yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PlayPrevious,
    StepBackward,
    StepForward,
    ToggleShuffle,
    PlayFile,
    PlayDirectory,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::PlayPrevious => "play_previous",
            Operation::StepBackward => "step_backward",
            Operation::StepForward => "step_forward",
            Operation::ToggleShuffle => "toggle_shuffle",
            Operation::PlayFile => "play_file",
            Operation::PlayDirectory => "play_directory",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// The operation is declared but not supported.
    #[error("Operation not implemented: {0}")]
    NotImplemented(Operation),

    /// No native player exists yet; call `init()` first.
    #[error("Playback adapter not initialized")]
    AdapterNotInitialized,

    // ========================================================================
    // Queue Errors
    // ========================================================================
    /// A URI could not be resolved into a media item. Playback was not started.
    #[error("Failed to resolve media item {uri}: {source}")]
    ExtractionFailed {
        uri: String,
        #[source]
        source: BridgeError,
    },

    /// A newer call replaced the queue while this one was resolving URIs.
    #[error("Queue replaced by a newer playback request")]
    Superseded,

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// The native adapter, extractor or volume controller failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` when the operation is not supported, as opposed to a
    /// playback failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PlaybackError::NotImplemented(_))
    }

    /// Returns `true` if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            PlaybackError::Superseded | PlaybackError::AdapterNotInitialized => true,
            PlaybackError::ExtractionFailed { source, .. } | PlaybackError::Bridge(source) => {
                matches!(source, BridgeError::NotAvailable(_) | BridgeError::Io(_))
            }
            PlaybackError::NotImplemented(_) => false,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
