//! Error types for the effectdl workspace.

use thiserror::Error;

/// A shared error type for all effectdl crates.
///
/// Variants follow the failure classes of the synchronization protocol:
/// transport, decode, auth, storage, plus the pagination guard and
/// caller-driven cancellation.
#[derive(Error, Debug)]
pub enum DlError {
    /// Network failure or non-2xx response from a remote endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed payload (JSON body, base64 image data, ...).
    #[error("decode error: {format}: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// Login rejected or session expired.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Local blob-store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// The pagination loop exceeded the configured page cap.
    #[error("page limit exceeded after {pages} pages")]
    PageLimitExceeded { pages: u32 },

    /// The caller aborted the operation via its cancellation token.
    #[error("operation cancelled")]
    Cancelled,
}

impl DlError {
    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Decode error for the given payload format ("JSON", "base64", ...).
    pub fn decode(format: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }

    /// Creates an Auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Check if this is an Auth error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a Storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<std::io::Error> for DlError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for DlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            format: "JSON",
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for DlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                format: "JSON",
                message: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A type alias for `Result<T, DlError>`.
pub type Result<T> = std::result::Result<T, DlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DlError = io.into();
        assert!(err.is_storage());
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DlError = json_err.into();
        assert!(matches!(err, DlError::Decode { format: "JSON", .. }));
    }

    #[test]
    fn test_display_includes_page_count() {
        let err = DlError::PageLimitExceeded { pages: 500 };
        assert!(err.to_string().contains("500"));
    }
}
