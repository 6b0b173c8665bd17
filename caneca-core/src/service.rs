//! High-level service facade running the whole request-to-recommendation pipeline.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::error::RecyclingError;
use crate::invoke::{self, Invocation};
use crate::model::{RawImage, RecyclingResponse};
use crate::normalize;
use crate::ports::{ClassifierPort, ModelMeta};

/// Time budget for a single classification, queueing included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
/// Resource ceilings for request processing.
pub struct ServiceLimits {
    /// Maximum number of uploads decoded and classified at once.
    pub max_concurrent: usize,
    /// Time budget per request for waiting on a slot, decoding and classifying.
    pub timeout: Duration,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_concurrent: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Public entry point turning uploaded photos into recommendations.
///
/// Holds only read-only state after initialization, so one instance is shared by
/// all requests.
pub struct RecyclingService {
    classifier: Arc<dyn ClassifierPort>,
    slots: Arc<Semaphore>,
    limits: ServiceLimits,
}

impl RecyclingService {
    /// Validate `limits`, warm the classifier up and build the service.
    ///
    /// # Errors
    ///
    /// Returns [`RecyclingError::InitializationFailure`] when the limits are unusable or
    /// the classifier is not ready. Callers should abort startup.
    pub async fn initialize(
        classifier: Arc<dyn ClassifierPort>,
        limits: ServiceLimits,
    ) -> Result<Self, RecyclingError> {
        if limits.max_concurrent == 0 {
            return Err(RecyclingError::InitializationFailure(
                "max_concurrent must be at least 1".to_owned(),
            ));
        }
        if limits.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(RecyclingError::InitializationFailure(format!(
                "max_concurrent must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if limits.timeout.is_zero() {
            return Err(RecyclingError::InitializationFailure(
                "timeout must be positive".to_owned(),
            ));
        }

        let model = classifier.model();
        info!(model = %model.id.0, "warming up classifier");
        classifier.warm_up().await.map_err(|err| {
            RecyclingError::InitializationFailure(format!("classifier {} not ready: {err}", model.id.0))
        })?;
        info!(
            model = %model.id.0,
            max_concurrent = limits.max_concurrent,
            timeout = ?limits.timeout,
            "classifier ready"
        );

        Ok(Self {
            slots: Arc::new(Semaphore::new(limits.max_concurrent)),
            classifier,
            limits,
        })
    }

    /// Metadata of the model in use.
    #[must_use]
    pub fn model(&self) -> &ModelMeta {
        self.classifier.model()
    }

    /// Limits the service was initialized with.
    #[must_use]
    pub fn limits(&self) -> ServiceLimits {
        self.limits
    }

    /// Run the full pipeline for one upload.
    ///
    /// # Errors
    ///
    /// - [`RecyclingError::EmptyInput`] / [`RecyclingError::UndecodableImage`] for bad uploads.
    /// - [`RecyclingError::ClassificationUnavailable`] when both classifier attempts fail or
    ///   the time budget runs out.
    /// - [`RecyclingError::Worker`] if the decoding worker dies.
    pub async fn recommend(&self, raw: RawImage) -> Result<RecyclingResponse, RecyclingError> {
        if raw.is_empty() {
            return Err(RecyclingError::EmptyInput);
        }
        debug!(
            bytes = raw.bytes.len(),
            content_type = raw.content_type.as_deref().unwrap_or("unknown"),
            "received upload"
        );

        let invocation = self.process(raw).await?;

        info!(
            label = %invocation.top.label,
            score = invocation.top.score,
            path = ?invocation.path,
            "classified upload"
        );

        Ok(RecyclingResponse::from_classification(invocation.top))
    }

    // Decoding, resizing and classifying all hold a slot and share one time budget.
    async fn process(&self, raw: RawImage) -> Result<Invocation, RecyclingError> {
        let attempt = async {
            let permit = Arc::clone(&self.slots).acquire_owned().await.map_err(|err| {
                RecyclingError::ClassificationUnavailable(format!("worker pool closed: {err}"))
            })?;
            // The blocking task owns the permit until decoding finishes, even after a timeout.
            let (_permit, decoded) = tokio::task::spawn_blocking(move || {
                let decoded = normalize::normalize(&raw.bytes);
                (permit, decoded)
            })
            .await
            .map_err(|err| RecyclingError::Worker(err.to_string()))?;
            invoke::classify(self.classifier.as_ref(), Arc::new(decoded?)).await
        };

        tokio::time::timeout(self.limits.timeout, attempt)
            .await
            .map_err(|_elapsed| {
                RecyclingError::ClassificationUnavailable(format!(
                    "timed out after {:?}",
                    self.limits.timeout
                ))
            })?
    }
}
