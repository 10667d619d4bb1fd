//! Cloudinary API response types.

use std::collections::HashMap;

use serde::Deserialize;

/// Upload API response.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// HTTPS delivery URL.
    pub secure_url: Option<String>,
    /// Store key of the new asset.
    pub public_id: Option<String>,
}

/// Admin delete-resources response.
#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    /// Per public id status, `deleted` or `not_found`.
    #[serde(default)]
    pub deleted: HashMap<String, String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub message: String,
}
