//! Cloudinary HTTP client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::credentials::CloudinaryCredentials;
use super::dto::{DeleteResponse, ErrorResponse, UploadResponse};
use super::upload_form::{context_value, tags_value};
use crate::domain::entities::{ContentIdentifier, ImageReference, PaperMetadata, UploadedAsset};
use crate::domain::errors::MediaError;
use crate::domain::ports::MediaStorePort;

/// Default API host.
pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cloudinary media store adapter.
///
/// Uploads are unsigned through an upload preset; deletions go through the
/// admin API and need the key pair.
pub struct CloudinaryClient {
    client: Client,
    api_base: String,
    credentials: CloudinaryCredentials,
    folder: Option<String>,
}

impl CloudinaryClient {
    /// Creates new client against the public API host.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(credentials: CloudinaryCredentials) -> Result<Self, MediaError> {
        Self::with_base_url(credentials, CLOUDINARY_API_BASE)
    }

    /// Creates client with custom API host.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        credentials: CloudinaryCredentials,
        api_base: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let client = Client::builder()
            .user_agent(concat!("pqa-media/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MediaError::not_configured(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
            folder: None,
        })
    }

    /// Stores uploads under the given folder.
    #[must_use]
    pub fn with_folder(mut self, folder: Option<String>) -> Self {
        self.folder = folder.filter(|f| !f.trim().is_empty());
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base, self.credentials.cloud_name
        )
    }

    fn delete_url(&self) -> String {
        format!(
            "{}/v1_1/{}/resources/image/upload",
            self.api_base, self.credentials.cloud_name
        )
    }

    /// Text fields of an upload, without the `file` part.
    fn upload_fields(
        &self,
        metadata: &PaperMetadata,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<(&'static str, String)>, MediaError> {
        let preset = self
            .credentials
            .upload_preset
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MediaError::not_configured("upload preset is not set"))?;

        let mut fields = vec![
            ("upload_preset", preset.to_string()),
            ("context", context_value(metadata, timestamp)),
        ];
        if let Some(tags) = tags_value(metadata) {
            fields.push(("tags", tags));
        }
        if let Some(folder) = &self.folder {
            fields.push(("folder", folder.clone()));
        }

        Ok(fields)
    }

    async fn send_upload(&self, form: Form) -> Result<UploadedAsset, MediaError> {
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_response(status, response).await);
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse upload response");
            MediaError::invalid_response(format!("failed to parse upload response: {e}"))
        })?;

        let url = body
            .secure_url
            .filter(|u| !u.is_empty())
            .map(ImageReference::new)
            .ok_or_else(|| MediaError::invalid_response("upload response has no secure_url"))?;

        let public_id = body
            .public_id
            .map(ContentIdentifier::new)
            .or_else(|| url.content_identifier())
            .ok_or_else(|| MediaError::invalid_response("upload response has no public_id"))?;

        Ok(UploadedAsset::new(url, public_id))
    }
}

#[async_trait]
impl MediaStorePort for CloudinaryClient {
    async fn upload_by_reference(
        &self,
        source: &ImageReference,
        metadata: &PaperMetadata,
    ) -> Result<UploadedAsset, MediaError> {
        debug!(reference = %source, "Requesting Cloudinary fetch of remote image");

        let form = self
            .upload_fields(metadata, Utc::now())?
            .into_iter()
            .fold(Form::new().text("file", source.as_str().to_string()), |form, (k, v)| {
                form.text(k, v)
            });

        let asset = self.send_upload(form).await?;
        debug!(reference = %source, url = %asset.url, public_id = %asset.public_id, "Remote image stored");
        Ok(asset)
    }

    async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: &PaperMetadata,
    ) -> Result<UploadedAsset, MediaError> {
        debug!(file_name, size = bytes.len(), "Uploading local image to Cloudinary");

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = self
            .upload_fields(metadata, Utc::now())?
            .into_iter()
            .fold(Form::new().part("file", part), |form, (k, v)| form.text(k, v));

        self.send_upload(form).await
    }

    async fn delete(&self, id: &ContentIdentifier) -> Result<(), MediaError> {
        let (api_key, api_secret) = self
            .credentials
            .admin()
            .ok_or_else(|| MediaError::not_configured("admin API key and secret are not set"))?;

        debug!(public_id = %id, "Deleting Cloudinary asset");

        let response = self
            .client
            .delete(self.delete_url())
            .query(&[("public_ids[]", id.as_str())])
            .basic_auth(api_key, Some(api_secret.expose()))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_response(status, response).await);
        }

        let body: DeleteResponse = response.json().await.map_err(|e| {
            MediaError::invalid_response(format!("failed to parse delete response: {e}"))
        })?;

        deletion_status(&body, id)
    }
}

/// Accepts `not_found` too: the asset is gone either way.
fn deletion_status(body: &DeleteResponse, id: &ContentIdentifier) -> Result<(), MediaError> {
    match body.deleted.get(id.as_str()).map(String::as_str) {
        Some("deleted") => Ok(()),
        Some("not_found") => {
            debug!(public_id = %id, "Asset was already absent");
            Ok(())
        }
        Some(other) => Err(MediaError::invalid_response(format!(
            "unexpected deletion status '{other}'"
        ))),
        None => Err(MediaError::invalid_response(
            "delete response does not mention the asset",
        )),
    }
}

fn map_transport_error(e: reqwest::Error) -> MediaError {
    warn!(error = %e, "Failed to reach Cloudinary");
    if e.is_timeout() {
        MediaError::network("request timed out")
    } else if e.is_connect() {
        MediaError::network("failed to connect to Cloudinary")
    } else {
        MediaError::network(e.to_string())
    }
}

async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> MediaError {
    let message = match response.json::<ErrorResponse>().await {
        Ok(error) => error.error.message,
        Err(_) => format!("HTTP {status}"),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            MediaError::rejected(status.as_u16(), format!("access denied: {message}"))
        }
        _ => MediaError::rejected(status.as_u16(), message),
    }
}
