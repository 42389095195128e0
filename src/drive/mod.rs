// src/drive/mod.rs
//! Google Drive interaction — authentication and file upload.
//!
//! Three layers: [`token_store`] persists the opaque credential token,
//! [`auth`] turns stored/refreshed/freshly-granted credentials into a
//! usable access token, and [`client`] performs the actual uploads.

pub mod auth;
pub mod client;
pub mod token_store;

// Re-export the public interface
#[allow(unused_imports)]
pub use auth::{AccessToken, Authenticator, DriveConnector};
#[allow(unused_imports)]
pub use client::DriveClient;
#[allow(unused_imports)]
pub use token_store::{JsonFileTokenStore, StoredToken, TokenStore};
