// src/drive/token_store.rs
//! Credential token persistence.
//!
//! The token is opaque to everything outside this module: a small JSON
//! document on disk, loaded and saved through the [`TokenStore`] trait so
//! the auth flow can be tested against an in-memory store.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_EXPIRY_SKEW_SECS;
use crate::error::AuthError;

/// A persisted OAuth credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Google only returns this on the first grant; refreshes keep the old one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expiry: DateTime<Utc>,
}

impl StoredToken {
    /// Usable if the expiry is still more than a small skew away, so a
    /// token does not expire mid-upload.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry - Duration::seconds(TOKEN_EXPIRY_SKEW_SECS) > now
    }
}

/// Load/save seam for the persisted credential.
pub trait TokenStore {
    /// Returns the stored token, or `None` when nothing usable is stored.
    /// Missing and corrupt files both load as `None`; the auth flow then
    /// falls back to interactive authorization.
    fn load(&self) -> Option<StoredToken>;

    /// Persists the token. Failure here is fatal: continuing would force
    /// an interactive login on every run.
    fn save(&self, token: &StoredToken) -> Result<(), AuthError>;
}

/// Disk implementation: one JSON file at a configured path.
pub struct JsonFileTokenStore {
    path: PathBuf,
}

impl JsonFileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for JsonFileTokenStore {
    fn load(&self) -> Option<StoredToken> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Could not read token file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                log::warn!(
                    "Token file {} is corrupt, ignoring it: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(token)
            .map_err(|e| AuthError::Storage(format!("could not serialize token: {}", e)))?;
        fs::write(&self.path, json)?;

        log::debug!("Persisted credential token to {}", self.path.display());
        Ok(())
    }
}
