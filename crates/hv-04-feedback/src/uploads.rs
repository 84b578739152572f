//! Partial-failure media upload.

use crate::ports::{MediaAsset, MediaUploader, UploadError};
use tracing::warn;

/// Result of uploading a batch: URLs that made it, plus what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// In the order the assets were given.
    pub urls: Vec<String>,
    pub failures: Vec<(String, UploadError)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Uploads assets one at a time. A failed asset is logged and skipped; it
/// never aborts the batch.
pub async fn upload_all(uploader: &dyn MediaUploader, assets: &[MediaAsset]) -> UploadReport {
    let mut report = UploadReport::default();
    for asset in assets {
        let result = if asset.bytes.is_empty() {
            Err(UploadError::Empty)
        } else {
            uploader.upload(asset).await
        };
        match result {
            Ok(url) => report.urls.push(url),
            Err(e) => {
                warn!(file = %asset.file_name, error = %e, "attachment upload failed, continuing");
                report.failures.push((asset.file_name.clone(), e));
            }
        }
    }
    report
}
