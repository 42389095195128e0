// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system. The
//! split mirrors the pipeline's two-tier error model: everything in
//! [`AppError`] is fatal to the run, while per-file upload failures are
//! caught at the upload loop and never surface as an `AppError`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Google Drive API error reasons as a typed vocabulary.
///
/// Instead of matching against magic strings like `"userRateLimitExceeded"`,
/// the domain vocabulary is encoded in the type system. Each variant tells
/// you exactly what the Drive API reported about a failed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveErrorCode {
    /// Per-user or per-app request quota exhausted
    RateLimited,
    /// The parent folder (or file) does not exist or is invisible to us
    NotFound,
    /// Access token invalid or expired
    Unauthorized,
    /// The authenticated user may not write to the target folder
    PermissionDenied,
    /// The request itself was malformed
    BadRequest,
    /// The account's storage quota is full
    StorageQuotaExceeded,
    /// Drive internal server error
    InternalError,
    /// Drive is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error reason this client doesn't recognize yet
    Unknown(String),
}

impl DriveErrorCode {
    /// Parse a Drive API error `reason` string into the typed vocabulary.
    pub fn from_reason(reason: &str) -> Self {
        match reason {
            "rateLimitExceeded" | "userRateLimitExceeded" | "dailyLimitExceeded" => {
                Self::RateLimited
            }
            "notFound" => Self::NotFound,
            "authError" => Self::Unauthorized,
            "insufficientFilePermissions" | "appNotAuthorizedToFile" | "domainPolicy"
            | "forbidden" => Self::PermissionDenied,
            "badRequest" | "invalid" => Self::BadRequest,
            "storageQuotaExceeded" | "quotaExceeded" => Self::StorageQuotaExceeded,
            "internalError" | "backendError" => Self::InternalError,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error means the bearer token was rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether this error means the target simply doesn't exist — for
    /// uploads, almost always a wrong folder id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for DriveErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rateLimitExceeded"),
            Self::NotFound => write!(f, "notFound"),
            Self::Unauthorized => write!(f, "authError"),
            Self::PermissionDenied => write!(f, "insufficientFilePermissions"),
            Self::BadRequest => write!(f, "badRequest"),
            Self::StorageQuotaExceeded => write!(f, "storageQuotaExceeded"),
            Self::InternalError => write!(f, "internalError"),
            Self::ServiceUnavailable => write!(f, "serviceUnavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(reason) => write!(f, "{}", reason),
        }
    }
}

/// Main application error type. Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Failed to run {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("No network connectivity: probe of {probe} failed ({reason})")]
    NoConnectivity { probe: String, reason: String },

    #[error("Drive API returned an error ({code}): {message}")]
    DriveService {
        code: DriveErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Authentication and credential-storage failures. All fatal: the upload
/// phase either starts with a valid session or not at all.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Client secrets not found at {path}: {source}")]
    MissingSecrets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Client secrets at {path} are not in Google's installed-app format: {source}")]
    MalformedSecrets {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Network error during authentication: {0}")]
    Network(String),

    #[error("Credential store error: {0}")]
    Storage(String),

    #[error("No authorization code was entered")]
    MissingCode,

    #[error("IO error during authentication: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
#[allow(dead_code)]
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_error_code_parses_known_reasons() {
        assert_eq!(
            DriveErrorCode::from_reason("userRateLimitExceeded"),
            DriveErrorCode::RateLimited
        );
        assert_eq!(
            DriveErrorCode::from_reason("notFound"),
            DriveErrorCode::NotFound
        );
        assert_eq!(
            DriveErrorCode::from_reason("storageQuotaExceeded"),
            DriveErrorCode::StorageQuotaExceeded
        );
        assert_eq!(
            DriveErrorCode::from_reason("somethingNew"),
            DriveErrorCode::Unknown("somethingNew".to_string())
        );
    }

    #[test]
    fn drive_error_code_from_status_maps_well_known_codes() {
        assert_eq!(
            DriveErrorCode::from_http_status(401),
            DriveErrorCode::Unauthorized
        );
        assert_eq!(
            DriveErrorCode::from_http_status(404),
            DriveErrorCode::NotFound
        );
        assert_eq!(
            DriveErrorCode::from_http_status(418),
            DriveErrorCode::HttpStatus(418)
        );
    }

    #[test]
    fn classification_helpers() {
        assert!(DriveErrorCode::Unauthorized.is_auth_failure());
        assert!(!DriveErrorCode::NotFound.is_auth_failure());
        assert!(DriveErrorCode::NotFound.is_not_found());
    }
}
