//! Classifier backed by a hosted image-classification model speaking the
//! Hugging Face inference protocol: POST the raw image, receive `[{label, score}]`.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, info};

use caneca_core::{ClassificationResult, ClassifierError, ClassifierPort, ModelId, ModelMeta};

/// Model served by default.
pub const DEFAULT_MODEL: &str = "microsoft/resnet-50";
/// Inference endpoint for [`DEFAULT_MODEL`].
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/microsoft/resnet-50";

const MAX_ERROR_BODY: usize = 512;
const WARM_UP_EDGE: u32 = 32;

/// Response from the inference endpoint: either a ranking or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Ranking(Vec<LabelScore>),
    Failure { error: String },
}

/// Single entry of a ranking.
#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Clone)]
/// Where and how to reach the hosted model.
pub struct HuggingFaceConfig {
    /// Full inference URL of the model.
    pub endpoint: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            token: None,
        }
    }
}

/// Image classifier calling a hosted model over HTTP.
pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    meta: ModelMeta,
}

impl HuggingFaceClassifier {
    /// Create a classifier bound to the given HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Internal`] when the endpoint is not an http(s) URL.
    pub fn new(client: Client, config: HuggingFaceConfig) -> Result<Self, ClassifierError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|err| {
            ClassifierError::Internal(format!("invalid endpoint {}: {err}", config.endpoint))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClassifierError::Internal(format!(
                "unsupported endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        let meta = model_meta(&endpoint);
        info!(model = %meta.id.0, endpoint = %endpoint, "configured hosted classifier");

        Ok(Self {
            client,
            endpoint,
            token: config.token.filter(|token| !token.trim().is_empty()),
            meta,
        })
    }

    async fn infer(&self, body: Vec<u8>) -> Result<Vec<ClassificationResult>, ClassifierError> {
        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "image/jpeg")
            .body(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        match fetch_json::<InferenceResponse>(req).await? {
            InferenceResponse::Ranking(entries) => Ok(rank(entries)),
            InferenceResponse::Failure { error } => Err(ClassifierError::MalformedResponse(error)),
        }
    }
}

#[async_trait]
impl ClassifierPort for HuggingFaceClassifier {
    fn model(&self) -> &ModelMeta {
        &self.meta
    }

    async fn warm_up(&self) -> Result<(), ClassifierError> {
        let ranking = self.classify_encoded(&warm_up_image()?).await?;
        if ranking.is_empty() {
            return Err(ClassifierError::MalformedResponse(
                "warm-up returned an empty ranking".to_owned(),
            ));
        }
        Ok(())
    }

    async fn classify_encoded(
        &self,
        jpeg: &[u8],
    ) -> Result<Vec<ClassificationResult>, ClassifierError> {
        debug!(bytes = jpeg.len(), "classifying in-memory image");
        self.infer(jpeg.to_vec()).await
    }

    async fn classify_file(
        &self,
        path: &Path,
    ) -> Result<Vec<ClassificationResult>, ClassifierError> {
        debug!(path = %path.display(), "classifying image file");
        let bytes = tokio::fs::read(path).await?;
        self.infer(bytes).await
    }
}

/// Build the hosted classifier as a shareable port.
///
/// # Errors
///
/// Returns a [`ClassifierError`] when the configuration is invalid.
pub fn classifier(
    client: Client,
    config: HuggingFaceConfig,
) -> Result<Arc<dyn ClassifierPort>, ClassifierError> {
    Ok(Arc::new(HuggingFaceClassifier::new(client, config)?))
}

/// Derive model metadata from an endpoint such as `.../models/<org>/<name>`.
fn model_meta(endpoint: &Url) -> ModelMeta {
    let path = endpoint.path().trim_matches('/');
    let id = path
        .split_once("models/")
        .map_or(path, |(_, model)| model)
        .to_owned();
    let id = if id.is_empty() {
        endpoint.as_str().to_owned()
    } else {
        id
    };

    ModelMeta {
        name: id.rsplit('/').next().unwrap_or(&id).to_owned(),
        id: ModelId(id),
    }
}

/// Convert raw entries into a ranking, best first.
fn rank(entries: Vec<LabelScore>) -> Vec<ClassificationResult> {
    let mut ranking: Vec<ClassificationResult> = entries
        .into_iter()
        .map(|entry| ClassificationResult {
            label: entry.label,
            score: entry.score,
        })
        .collect();
    ranking.sort_by(|left, right| right.score.total_cmp(&left.score));
    ranking
}

/// Small neutral-grey JPEG used to check the endpoint answers.
fn warm_up_image() -> Result<Vec<u8>, ClassifierError> {
    let image = RgbImage::from_pixel(WARM_UP_EDGE, WARM_UP_EDGE, Rgb([128, 128, 128]));
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new(&mut buffer).encode_image(&image)?;
    Ok(buffer.into_inner())
}

// Send a request and decode JSON, turning non-success statuses into `Rejected`.
async fn fetch_json<T: serde::de::DeserializeOwned>(
    req: RequestBuilder,
) -> Result<T, ClassifierError> {
    let resp = req.send().await.map_err(ClassifierError::from)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClassifierError::Rejected {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    resp.json().await.map_err(ClassifierError::from)
}
