// src/drive/client.rs
//! Drive v3 upload client.
//!
//! One request per file: `POST .../upload/drive/v3/files?uploadType=multipart`
//! with a `multipart/related` body carrying the JSON metadata part (name,
//! parent folder, MIME type) and the file content part. Per-file failures
//! are reported, never propagated — the upload phase always attempts every
//! file it was given.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::{DRIVE_UPLOAD_URL, ERROR_BODY_PREVIEW_LENGTH, EXPORT_MIME_TYPE};
use crate::drive::auth::AccessToken;
use crate::error::{AppError, DriveErrorCode};
use crate::pipeline::{FailedUpload, RemoteStore, UploadReport};
use crate::types::FolderId;

/// A file created on Drive, as reported by the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct DriveFile {
    pub id: String,
}

/// A thin wrapper around a reqwest Client for Drive upload requests.
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
}

impl DriveClient {
    /// Creates a new upload client with bearer authentication baked in.
    pub fn new(token: AccessToken) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&token)?)
            .build()?;
        Ok(Self { client })
    }

    fn create_headers(token: &AccessToken) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", token.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid access token format: {}", e))
            })?,
        );

        Ok(headers)
    }

    /// Uploads a single local file as a new object under `folder`.
    async fn upload_one(
        &self,
        folder: &FolderId,
        name: &str,
        path: &Path,
    ) -> Result<DriveFile, AppError> {
        let content = fs::read(path)?;

        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder.as_str()],
            "mimeType": EXPORT_MIME_TYPE,
        });

        let boundary = format!("notes2drive-{}", Uuid::new_v4().simple());
        let body = multipart_related_body(&metadata, &content, &boundary);

        log::debug!("POST {} ({} bytes) for {}", DRIVE_UPLOAD_URL, body.len(), name);

        let response = self
            .client
            .post(DRIVE_UPLOAD_URL)
            .query(&[("uploadType", "multipart")])
            .header(
                header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_upload_error(status, &body));
        }

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("upload response: {}", e)))?;

        log::info!("Uploaded: {} (id {})", name, file.id);
        Ok(file)
    }
}

#[async_trait::async_trait]
impl RemoteStore for DriveClient {
    async fn upload_all(&self, folder: &FolderId, files: &[PathBuf]) -> UploadReport {
        let mut report = UploadReport::new();

        for path in files {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    log::error!("Skipping unnameable path {}", path.display());
                    report = report.with_failed(FailedUpload {
                        name: path.display().to_string(),
                        error: "path has no usable file name".to_string(),
                    });
                    continue;
                }
            };

            match self.upload_one(folder, &name, path).await {
                Ok(_) => {
                    report = report.with_uploaded(name);
                }
                Err(e) => {
                    log::error!("Upload failed for {}: {}", name, e);
                    if let AppError::DriveService { ref code, .. } = e {
                        if code.is_auth_failure() {
                            log::warn!(
                                "The access token may have expired; delete the token file to re-authenticate"
                            );
                        } else if code.is_not_found() {
                            log::warn!(
                                "Drive reports the parent folder was not found; check the configured folder id"
                            );
                        }
                    }
                    report = report.with_failed(FailedUpload {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Assembles a `multipart/related` request body with two parts: the JSON
/// metadata and the raw file content.
fn multipart_related_body(
    metadata: &serde_json::Value,
    content: &[u8],
    boundary: &str,
) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", EXPORT_MIME_TYPE).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

/// Maps a failed upload response into the typed error vocabulary.
fn classify_upload_error(status: StatusCode, body: &str) -> AppError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
        #[serde(default)]
        errors: Vec<ErrorItem>,
    }
    #[derive(Deserialize)]
    struct ErrorItem {
        reason: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let code = parsed
            .error
            .errors
            .first()
            .map(|item| DriveErrorCode::from_reason(&item.reason))
            .unwrap_or_else(|| DriveErrorCode::from_http_status(status.as_u16()));

        return AppError::DriveService {
            code,
            message: parsed.error.message,
            status,
        };
    }

    let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
    AppError::DriveService {
        code: DriveErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {}: {}", status, preview),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_contains_both_parts_in_order() {
        let metadata = serde_json::json!({"name": "A.txt", "parents": ["folder123"]});
        let body = multipart_related_body(&metadata, b"hello", "BOUNDARY");
        let text = String::from_utf8(body).unwrap();

        assert!(text.starts_with("--BOUNDARY\r\n"));
        assert!(text.ends_with("\r\n--BOUNDARY--\r\n"));

        let metadata_at = text.find("\"name\":\"A.txt\"").unwrap();
        let content_at = text.find("hello").unwrap();
        assert!(metadata_at < content_at);
    }

    #[test]
    fn multipart_body_declares_the_text_mime_type() {
        let metadata = serde_json::json!({"name": "A.txt"});
        let body = multipart_related_body(&metadata, b"x", "B");
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Content-Type: text/plain\r\n\r\nx"));
    }

    #[test]
    fn drive_error_body_maps_to_a_typed_code() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "The user's Drive storage quota has been exceeded.",
                "errors": [{"domain": "usageLimits", "reason": "storageQuotaExceeded"}]
            }
        }"#;

        let err = classify_upload_error(StatusCode::FORBIDDEN, body);
        match err {
            AppError::DriveService { code, message, status } => {
                assert_eq!(code, DriveErrorCode::StorageQuotaExceeded);
                assert!(message.contains("quota"));
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("expected DriveService, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_body_falls_back_to_the_status_code() {
        let err = classify_upload_error(StatusCode::NOT_FOUND, "<html>gateway</html>");
        match err {
            AppError::DriveService { code, .. } => {
                assert_eq!(code, DriveErrorCode::NotFound);
            }
            other => panic!("expected DriveService, got {:?}", other),
        }
    }

    #[test]
    fn oversized_error_bodies_are_previewed_not_embedded() {
        let huge = "x".repeat(10_000);
        let err = classify_upload_error(StatusCode::BAD_GATEWAY, &huge);
        match err {
            AppError::DriveService { message, .. } => {
                assert!(message.len() < 1_000);
            }
            other => panic!("expected DriveService, got {:?}", other),
        }
    }
}
