//! Classifier invocation with an in-memory primary path and a temp-file fallback.
//!
//! The primary path hands the model a JPEG encoded in memory. If encoding or the
//! model call fails, the bitmap is written to a scoped temporary file and the model
//! is asked to read that instead. The temporary file is removed when its guard is
//! dropped, which covers success, failure and cancellation alike.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::RecyclingError;
use crate::model::ClassificationResult;
use crate::normalize::NormalizedImage;
use crate::ports::{ClassifierError, ClassifierPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which attempt produced the prediction.
pub enum InvocationPath {
    /// In-memory JPEG.
    Primary,
    /// Temporary file on disk.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
/// Successful classification together with the path that produced it.
pub struct Invocation {
    /// Top-ranked prediction.
    pub top: ClassificationResult,
    /// Attempt that succeeded.
    pub path: InvocationPath,
}

/// Classify `image`, trying the in-memory path first and the temp-file path second.
///
/// No further retries happen after the fallback.
///
/// # Errors
///
/// Returns [`RecyclingError::ClassificationUnavailable`] when both attempts fail.
pub async fn classify(
    classifier: &dyn ClassifierPort,
    image: Arc<NormalizedImage>,
) -> Result<Invocation, RecyclingError> {
    let primary_err = match primary(classifier, Arc::clone(&image)).await {
        Ok(top) => {
            return Ok(Invocation {
                top,
                path: InvocationPath::Primary,
            });
        }
        Err(err) => err,
    };

    warn!(error = %primary_err, "primary classification failed, retrying through a temporary file");

    match fallback(classifier, image).await {
        Ok(top) => Ok(Invocation {
            top,
            path: InvocationPath::Fallback,
        }),
        Err(fallback_err) => Err(RecyclingError::ClassificationUnavailable(format!(
            "primary attempt failed ({primary_err}); fallback attempt failed ({fallback_err})"
        ))),
    }
}

async fn primary(
    classifier: &dyn ClassifierPort,
    image: Arc<NormalizedImage>,
) -> Result<ClassificationResult, ClassifierError> {
    let encoded = run_blocking(move || image.encode_jpeg().map_err(ClassifierError::from)).await?;
    debug!(bytes = encoded.len(), "encoded bitmap for classifier");

    top_ranked(classifier.classify_encoded(&encoded).await?)
}

async fn fallback(
    classifier: &dyn ClassifierPort,
    image: Arc<NormalizedImage>,
) -> Result<ClassificationResult, ClassifierError> {
    let artifact = run_blocking(move || {
        let mut file = tempfile::Builder::new()
            .prefix("caneca-")
            .suffix(".jpg")
            .tempfile()?;
        image.write_jpeg(&mut file)?;
        file.flush()?;
        Ok(file)
    })
    .await?;
    debug!(path = %artifact.path().display(), "wrote fallback artifact");

    let ranking = classifier.classify_file(artifact.path()).await;
    discard(artifact);

    top_ranked(ranking?)
}

fn discard(artifact: NamedTempFile) {
    let path = artifact.path().to_path_buf();
    if let Err(err) = artifact.close() {
        warn!(path = %path.display(), error = %err, "failed to remove fallback artifact");
    }
}

/// Pick the best prediction, clamping its score into `[0, 1]`.
fn top_ranked(
    mut ranking: Vec<ClassificationResult>,
) -> Result<ClassificationResult, ClassifierError> {
    if ranking.iter().any(|prediction| !prediction.score.is_finite()) {
        return Err(ClassifierError::MalformedResponse(
            "ranking contains a non-finite score".to_owned(),
        ));
    }

    // Stable sort, so ties keep the model's own order.
    ranking.sort_by(|left, right| right.score.total_cmp(&left.score));

    let mut top = ranking
        .into_iter()
        .next()
        .ok_or_else(|| ClassifierError::MalformedResponse("empty ranking".to_owned()))?;
    top.score = top.score.clamp(0.0, 1.0);
    Ok(top)
}

async fn run_blocking<T, F>(task: F) -> Result<T, ClassifierError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClassifierError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ClassifierError::Internal(format!("blocking task failed: {err}")))?
}
