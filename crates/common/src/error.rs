//! Error types shared across jumpcam crates.

use std::path::PathBuf;

/// Top-level error type for jumpcam operations.
#[derive(Debug, thiserror::Error)]
pub enum JumpcamError {
    /// The frame source could not be opened at startup.
    #[error("Frame source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// A single frame read failed after the source was running.
    #[error("Frame read failed: {message}")]
    FrameRead { message: String },

    #[error("Input injection error: {message}")]
    Input { message: String },

    #[error("Presenter error: {message}")]
    Presenter { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using JumpcamError.
pub type JumpcamResult<T> = Result<T, JumpcamError>;

impl JumpcamError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
        }
    }

    pub fn frame_read(msg: impl Into<String>) -> Self {
        Self::FrameRead {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn presenter(msg: impl Into<String>) -> Self {
        Self::Presenter {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error should end a running loop as end-of-stream
    /// rather than be escalated to the caller.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::FrameRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_message_names_the_cause() {
        let err = JumpcamError::source_unavailable("/dev/video0 busy");
        assert_eq!(
            err.to_string(),
            "Frame source unavailable: /dev/video0 busy"
        );
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn frame_read_is_end_of_stream() {
        assert!(JumpcamError::frame_read("timeout").is_end_of_stream());
        assert!(!JumpcamError::input("uinput gone").is_end_of_stream());
    }
}
