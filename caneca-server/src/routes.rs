use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use caneca_core::format::{self, ConversationalReply};
use caneca_core::{RawImage, RecyclingError, RecyclingResponse, RecyclingService};
use serde_json::{Value, json};
use tracing::{error, info, warn};

/// Shared state handed to every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub service: Arc<RecyclingService>,
}

/// Why a request could not be turned into a recommendation.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// The multipart body had no file part.
    MissingFile,
    /// The multipart body could not be read.
    Upload { status: StatusCode, detail: String },
    /// The pipeline rejected the upload or failed.
    Pipeline(RecyclingError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::Upload { status, .. } => *status,
            ApiError::Pipeline(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Server-side failures are logged in full and answered with a short message.
    fn detail(&self) -> String {
        match self {
            ApiError::MissingFile => "No se recibió ningún archivo".to_owned(),
            ApiError::Upload { detail, .. } => detail.clone(),
            ApiError::Pipeline(err) if err.is_client_error() => err.to_string(),
            ApiError::Pipeline(RecyclingError::ClassificationUnavailable(_)) => {
                "El servicio de clasificación no está disponible. Intenta de nuevo.".to_owned()
            }
            ApiError::Pipeline(_) => "Error interno al procesar la imagen".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            warn!(error = ?self, "request rejected");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// Build the application router.
pub(crate) fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/clasificar/", post(classify))
        .route("/webhook/whatsapp/", post(whatsapp_webhook))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn home() -> Json<Value> {
    Json(json!({
        "status": "online",
        "servicio": "API Reciclaje Colombia",
        "version": "2.0",
        "endpoints": {
            "web": "/clasificar/",
            "whatsapp": "/webhook/whatsapp/",
        },
    }))
}

// Only reachable once initialization succeeded.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "model": "loaded" }))
}

async fn classify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    structured_reply(recommend(&state, multipart).await)
}

async fn whatsapp_webhook(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    conversational_reply(recommend(&state, multipart).await)
}

async fn recommend(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RecyclingResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    state
        .service
        .recommend(upload)
        .await
        .map_err(ApiError::Pipeline)
}

/// Pull the image out of the `file` part, or the first part carrying a filename.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RawImage, ApiError> {
    let mut multipart = multipart.map_err(|rejection| ApiError::Upload {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|err| ApiError::Upload {
        status: err.status(),
        detail: err.body_text(),
    })? {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|err| ApiError::Upload {
            status: err.status(),
            detail: err.body_text(),
        })?;

        info!(
            file = file_name.as_deref().unwrap_or("-"),
            content_type = content_type.as_deref().unwrap_or("-"),
            bytes = bytes.len(),
            "received upload"
        );
        return Ok(RawImage::new(bytes.to_vec(), content_type));
    }

    Err(ApiError::MissingFile)
}

fn structured_reply(result: Result<RecyclingResponse, ApiError>) -> Response {
    match result {
        Ok(response) => Json(format::structured(&response)).into_response(),
        Err(err) => err.into_response(),
    }
}

// The conversational channel always answers 200 with text.
fn conversational_reply(result: Result<RecyclingResponse, ApiError>) -> Response {
    match result {
        Ok(response) => Json(ConversationalReply::recommendation(&response)).into_response(),
        Err(err) => {
            warn!(error = ?err, status = %err.status(), "webhook request failed, sending apology");
            Json(ConversationalReply::apology()).into_response()
        }
    }
}
