//! Storage port for submission attachments.

use crate::task::domain::Attachment;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment store operations.
pub type AttachmentStoreResult<T> = Result<T, AttachmentStoreError>;

/// Stores uploaded file content and issues stable retrieval URLs.
///
/// The task engine never holds file bytes past upload; only the returned
/// [`Attachment`] record travels with the submission.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Stores the file content and returns its attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::EmptyContent`] when the upload has no
    /// bytes and [`AttachmentStoreError::Storage`] on medium failure.
    async fn store(&self, filename: &str, content: Vec<u8>) -> AttachmentStoreResult<Attachment>;
}

/// Errors returned by attachment store implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentStoreError {
    /// The uploaded file had no content.
    #[error("attachment '{0}' has no content")]
    EmptyContent(String),

    /// Storage-medium failure.
    #[error("attachment storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentStoreError {
    /// Wraps a storage-medium error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
