//! # Outbound Port - MediaUploader
//!
//! Image storage. Only the returned URL is ever persisted on a claim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image picked by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl MediaAsset {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload transport error: {0}")]
    Transport(String),

    #[error("file is empty")]
    Empty,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Stores one asset and returns its public URL.
    async fn upload(&self, asset: &MediaAsset) -> Result<String, UploadError>;
}
