//! Error taxonomy for the recycling pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
/// Failures that can end a request or abort startup.
pub enum RecyclingError {
    /// The upload contained no bytes.
    #[error("El archivo está vacío")]
    EmptyInput,
    /// The bytes could not be decoded as a raster image.
    #[error("No se pudo procesar la imagen: {0}")]
    UndecodableImage(#[source] image::ImageError),
    /// The classifier could not produce a prediction: both attempts failed or the time budget ran out.
    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),
    /// The service could not be brought up.
    #[error("initialization failed: {0}")]
    InitializationFailure(String),
    /// A blocking worker panicked or was cancelled.
    #[error("internal worker failure: {0}")]
    Worker(String),
}

impl RecyclingError {
    /// Whether the error was caused by the uploaded content rather than the service.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RecyclingError::EmptyInput | RecyclingError::UndecodableImage(_)
        )
    }
}
