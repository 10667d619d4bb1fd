//! Media store port definition.

use async_trait::async_trait;

use crate::domain::entities::{ContentIdentifier, ImageReference, PaperMetadata, UploadedAsset};
use crate::domain::errors::MediaError;

/// Port for the remote media store holding document images.
#[async_trait]
pub trait MediaStorePort: Send + Sync {
    /// Asks the store to fetch `source` and persist its own copy.
    ///
    /// `metadata` is attached to the asset as descriptive tags only.
    async fn upload_by_reference(
        &self,
        source: &ImageReference,
        metadata: &PaperMetadata,
    ) -> Result<UploadedAsset, MediaError>;

    /// Uploads raw image bytes from a local file.
    async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: &PaperMetadata,
    ) -> Result<UploadedAsset, MediaError>;

    /// Removes a stored asset.
    async fn delete(&self, id: &ContentIdentifier) -> Result<(), MediaError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::{Barrier, Mutex};

    /// A request received by [`MockMediaStore`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MediaCall {
        /// Upload by reference.
        Upload(ImageReference),
        /// Local file upload.
        UploadFile(String),
        /// Deletion.
        Delete(ContentIdentifier),
    }

    /// Scriptable in-memory media store.
    ///
    /// Uploaded copies are served from `canonical_base` under the source's
    /// last path segment.
    pub struct MockMediaStore {
        canonical_base: String,
        failing_uploads: HashSet<String>,
        failing_deletes: HashSet<String>,
        barrier: Option<Arc<Barrier>>,
        calls: Mutex<Vec<MediaCall>>,
    }

    impl MockMediaStore {
        /// Creates a store where every request succeeds.
        pub fn new(canonical_base: impl Into<String>) -> Self {
            Self {
                canonical_base: canonical_base.into(),
                failing_uploads: HashSet::new(),
                failing_deletes: HashSet::new(),
                barrier: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Makes uploads of `source` fail.
        pub fn fail_upload(mut self, source: &str) -> Self {
            self.failing_uploads.insert(source.to_string());
            self
        }

        /// Makes deletions of `public_id` fail.
        pub fn fail_delete(mut self, public_id: &str) -> Self {
            self.failing_deletes.insert(public_id.to_string());
            self
        }

        /// Holds every request until `parties` requests are in flight.
        pub fn with_barrier(mut self, parties: usize) -> Self {
            self.barrier = Some(Arc::new(Barrier::new(parties)));
            self
        }

        /// Returns the recorded requests in arrival order.
        pub async fn calls(&self) -> Vec<MediaCall> {
            self.calls.lock().await.clone()
        }

        async fn record(&self, call: MediaCall) {
            self.calls.lock().await.push(call);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
        }

        fn asset_for(&self, file_name: &str) -> UploadedAsset {
            let stem = file_name
                .rsplit_once('.')
                .map_or(file_name, |(stem, _)| stem);
            UploadedAsset::new(
                ImageReference::new(format!("{}/{file_name}", self.canonical_base)),
                ContentIdentifier::new(stem),
            )
        }
    }

    #[async_trait]
    impl MediaStorePort for MockMediaStore {
        async fn upload_by_reference(
            &self,
            source: &ImageReference,
            _metadata: &PaperMetadata,
        ) -> Result<UploadedAsset, MediaError> {
            self.record(MediaCall::Upload(source.clone())).await;

            if self.failing_uploads.contains(source.as_str()) {
                return Err(MediaError::rejected(400, "mock upload failure"));
            }

            let path = source.as_str().split('?').next().unwrap_or_default();
            let file_name = path.rsplit('/').next().unwrap_or(path);
            Ok(self.asset_for(file_name))
        }

        async fn upload_file(
            &self,
            file_name: &str,
            _bytes: Vec<u8>,
            _metadata: &PaperMetadata,
        ) -> Result<UploadedAsset, MediaError> {
            self.record(MediaCall::UploadFile(file_name.to_string()))
                .await;
            Ok(self.asset_for(file_name))
        }

        async fn delete(&self, id: &ContentIdentifier) -> Result<(), MediaError> {
            self.record(MediaCall::Delete(id.clone())).await;

            if self.failing_deletes.contains(id.as_str()) {
                return Err(MediaError::network("mock deletion failure"));
            }
            Ok(())
        }
    }
}
