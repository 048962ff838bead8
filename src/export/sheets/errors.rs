//! Google Sheets error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::clients::HttpError;
use crate::error::ConfigError;

/// Errors returned by the Sheets API client.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The HTTP exchange with the Sheets API failed.
    #[error("Google Sheets request failed: {0}")]
    Http(#[from] HttpError),

    /// The Sheets API answered with a body we could not interpret.
    #[error("Unexpected response from Google Sheets: {detail}")]
    UnexpectedResponse {
        /// What was missing or malformed.
        detail: String,
    },
}

/// Errors that can occur while loading, saving or refreshing a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The token file could not be read or written.
    #[error("Failed to access token file '{}': {source}", .path.display())]
    Io {
        /// The token file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The token file is not valid authorized-user JSON.
    #[error("Invalid token file: {0}")]
    Json(#[from] serde_json::Error),

    /// The credential's token URI is not a valid endpoint.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The credential cannot be refreshed without a refresh token and client id.
    #[error("Credential has no refresh token; authorize again to obtain one.")]
    MissingRefreshToken,

    /// The token endpoint rejected the refresh request.
    #[error("Token refresh failed with status {status}: {message}")]
    RefreshFailed {
        /// The HTTP status code returned, or 0 for network errors.
        status: u16,
        /// The error message from the response.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_failed_message() {
        let error = CredentialError::RefreshFailed {
            status: 400,
            message: r#"{"error":"invalid_grant"}"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("invalid_grant"));
    }

    #[test]
    fn test_unexpected_response_message() {
        let error = SheetsError::UnexpectedResponse {
            detail: "missing updatedCells".to_string(),
        };
        assert!(error.to_string().contains("missing updatedCells"));
    }
}
