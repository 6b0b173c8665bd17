//! Traits describing the classifier capability and shared helper types.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};

use crate::model::ClassificationResult;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to a classifier backend.
pub enum ClassifierError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Reading or writing a local artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding the bitmap for the model failed.
    #[error("Encoding error: {0}")]
    Encode(#[from] image::ImageError),
    /// The backend answered with a non-success status.
    #[error("Rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated by the backend implementation.
        body: String,
    },
    /// The backend answered with something that is not a ranking.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a classification model, e.g. `microsoft/resnet-50`.
pub struct ModelId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing the model behind a classifier.
pub struct ModelMeta {
    /// Unique identifier.
    pub id: ModelId,
    /// Human-friendly name.
    pub name: String,
}

#[async_trait]
/// Trait for image-classification backends.
///
/// The model is opaque: an encoded image goes in, a ranking of `(label, score)`
/// pairs comes out, best first.
pub trait ClassifierPort: Send + Sync {
    /// Metadata describing the backing model.
    fn model(&self) -> &ModelMeta;

    /// Check the model is ready to serve. Called once during initialization.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifierError`] when the model cannot be reached or loaded.
    async fn warm_up(&self) -> Result<(), ClassifierError> {
        Ok(())
    }

    /// Classify a JPEG image held in memory.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifierError`] when the backend call fails.
    async fn classify_encoded(&self, jpeg: &[u8])
    -> Result<Vec<ClassificationResult>, ClassifierError>;

    /// Classify an image stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifierError`] when the file cannot be read or the backend call fails.
    async fn classify_file(&self, path: &Path) -> Result<Vec<ClassificationResult>, ClassifierError>;
}
