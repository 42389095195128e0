// src/drive/auth.rs
//! OAuth 2.0 installed-app flow for the Drive API.
//!
//! Credential resolution runs in order of decreasing convenience: a stored
//! token that is still valid is used as-is; an expired token with a refresh
//! token is refreshed in place; anything else falls back to the interactive
//! console flow (open the authorization URL, have the user paste the code
//! back). Whatever is obtained gets persisted through the [`TokenStore`].
//! Every failure on this path is fatal: the upload phase either starts with
//! a valid session or not at all.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::constants::{
    DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI, DRIVE_OAUTH_SCOPE, OAUTH_HTTP_TIMEOUT_SECS,
    OAUTH_REDIRECT_URI,
};
use crate::drive::client::DriveClient;
use crate::drive::token_store::{JsonFileTokenStore, StoredToken, TokenStore};
use crate::error::{AppError, AuthError};
use crate::pipeline::{RemoteStore, RemoteStoreProvider};

/// Bearer token for Drive API requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact the token in display
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "{}...", prefix)
    }
}

/// OAuth client registration, read from a Google-format
/// `client_secrets.json` (the `{"installed": {...}}` shape the Cloud
/// Console emits for desktop apps).
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledAppSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: InstalledAppSecrets,
}

impl InstalledAppSecrets {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AuthError::MissingSecrets {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: SecretsFile =
            serde_json::from_str(&raw).map_err(|e| AuthError::MalformedSecrets {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(file.installed)
    }
}

/// What the auth flow should do next, given what is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStep {
    /// The stored token is still valid; use it directly.
    UseStored(StoredToken),
    /// The stored token expired but can be refreshed.
    Refresh { refresh_token: String },
    /// Nothing usable is stored; run the interactive flow.
    Interactive,
}

/// Pure decision function for credential resolution.
pub fn next_step(stored: Option<StoredToken>, now: DateTime<Utc>) -> AuthStep {
    match stored {
        Some(token) if token.is_valid_at(now) => AuthStep::UseStored(token),
        Some(token) => match token.refresh_token {
            Some(refresh_token) => AuthStep::Refresh { refresh_token },
            None => AuthStep::Interactive,
        },
        None => AuthStep::Interactive,
    }
}

#[derive(Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenEndpointResponse {
    /// Google omits `refresh_token` on refresh responses; the previous one
    /// stays valid and is carried over.
    fn into_stored(self, previous_refresh: Option<String>, now: DateTime<Utc>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: now + Duration::seconds(self.expires_in),
        }
    }
}

/// Runs the credential resolution flow against a token store.
pub struct Authenticator<'a, S: TokenStore> {
    secrets: InstalledAppSecrets,
    store: &'a S,
    http: Client,
}

impl<'a, S: TokenStore> Authenticator<'a, S> {
    pub fn new(secrets: InstalledAppSecrets, store: &'a S) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(StdDuration::from_secs(OAUTH_HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            secrets,
            store,
            http,
        })
    }

    /// Resolves a usable access token, persisting any newly obtained
    /// credential before returning it.
    pub async fn obtain(&self) -> Result<AccessToken, AppError> {
        match next_step(self.store.load(), Utc::now()) {
            AuthStep::UseStored(token) => {
                log::debug!("Using stored access token (valid until {})", token.expiry);
                Ok(AccessToken::new(token.access_token))
            }
            AuthStep::Refresh { refresh_token } => {
                log::info!("Stored access token expired, refreshing");
                let token = self.refresh(&refresh_token).await?;
                self.store.save(&token)?;
                Ok(AccessToken::new(token.access_token))
            }
            AuthStep::Interactive => {
                log::info!("No usable stored credential, starting interactive authorization");
                let token = self.interactive().await?;
                self.store.save(&token)?;
                Ok(AccessToken::new(token.access_token))
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.secrets.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::debug!("Token refresh rejected ({}): {}", status, body);
            return Err(classify_refresh_error(&body));
        }

        let tokens: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenRefresh(format!("invalid response: {}", e)))?;

        Ok(tokens.into_stored(Some(refresh_token.to_string()), Utc::now()))
    }

    async fn interactive(&self) -> Result<StoredToken, AuthError> {
        let auth_url = self.build_authorize_url()?;

        println!("🔐 Authorization required.");
        println!("Open this URL in your browser and approve access:");
        println!("\n  {}\n", auth_url);
        if webbrowser::open(auth_url.as_str()).is_ok() {
            println!("(a browser window should have opened)");
        }
        println!("After approving, copy the 'code' parameter from the address bar.");

        let code = prompt_for_code(&mut io::stdin().lock())?;
        self.exchange_code(&code).await
    }

    fn build_authorize_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.secrets.auth_uri,
            &[
                ("client_id", self.secrets.client_id.as_str()),
                ("redirect_uri", OAUTH_REDIRECT_URI),
                ("response_type", "code"),
                ("scope", DRIVE_OAUTH_SCOPE),
                // offline + consent: make Google hand back a refresh token
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::TokenExchange(format!("invalid auth_uri: {}", e)))
    }

    async fn exchange_code(&self, code: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", OAUTH_REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.secrets.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!(
                "status {}: {}",
                status, body
            )));
        }

        let tokens: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("invalid response: {}", e)))?;

        Ok(tokens.into_stored(None, Utc::now()))
    }
}

/// Reads the pasted authorization code from the given input.
fn prompt_for_code(input: &mut impl BufRead) -> Result<String, AuthError> {
    print!("Paste the authorization code here: ");
    io::stdout().flush()?;

    let mut code = String::new();
    input.read_line(&mut code)?;

    let code = code.trim();
    if code.is_empty() {
        return Err(AuthError::MissingCode);
    }
    Ok(code.to_string())
}

fn classify_refresh_error(body: &str) -> AuthError {
    let code = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));

    let message = match code.as_deref() {
        Some("invalid_grant") => "refresh token expired or revoked",
        Some("invalid_client") => "client id or secret rejected",
        _ => "token refresh failed",
    };

    AuthError::TokenRefresh(message.into())
}

/// Builds an authenticated Drive client on demand.
///
/// The orchestrator only constructs the remote store once the folder id
/// and connectivity checks have passed, so authentication (including the
/// interactive flow) never runs for doomed or export-only invocations.
pub struct DriveConnector {
    secrets_path: PathBuf,
    token_path: PathBuf,
}

impl DriveConnector {
    pub fn new(secrets_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            secrets_path: secrets_path.into(),
            token_path: token_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl RemoteStoreProvider for DriveConnector {
    async fn connect(&self) -> Result<Box<dyn RemoteStore + Send + Sync>, AppError> {
        let secrets = InstalledAppSecrets::load(&self.secrets_path)?;
        let store = JsonFileTokenStore::new(&self.token_path);

        let authenticator = Authenticator::new(secrets, &store)?;
        let token = authenticator.obtain().await?;

        Ok(Box::new(DriveClient::new(token)?))
    }
}
