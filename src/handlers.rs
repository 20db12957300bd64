use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;
use tracing::{error, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::error::ApiError;
use crate::fetch::ImageFetcher;
use crate::inference;
use crate::models::{ClassesResponse, ErrorResponse, ImageRequest, StatusResponse, CLASS_NAMES};

/// State shared by every worker. The model is set once before the server
/// starts and never replaced.
pub struct AppState {
    pub model: Option<Arc<dyn Classifier>>,
    pub fetcher: ImageFetcher,
    pub platform: String,
}

/// Registers the API routes and the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::InvalidRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(status))
    .route("/classes", web::get().to(classes))
    .route("/evaluate", web::post().to(evaluate));
}

pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        message: "Art Evaluator API is running".to_string(),
        device: "cpu".to_string(),
        model_loaded: state.model.is_some(),
        classes_count: CLASS_NAMES.len(),
        platform: state.platform.clone(),
    })
}

pub async fn classes() -> HttpResponse {
    HttpResponse::Ok().json(ClassesResponse {
        classes: CLASS_NAMES.iter().map(|c| c.to_string()).collect(),
    })
}

pub async fn evaluate(
    state: web::Data<AppState>,
    body: web::Json<ImageRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("evaluate", %request_id);

    async move {
        let url = parse_image_url(&body.image_url)?;
        let result = inference::evaluate(state.model.clone(), &state.fetcher, &url).await;

        match result {
            Ok(prediction) => Ok(HttpResponse::Ok().json(prediction)),
            Err(err) => {
                if err.is_client_error() {
                    warn!(%url, "Evaluation rejected: {err}");
                } else {
                    error!(%url, "Evaluation failed: {err:?}");
                }
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    warn!(path = %req.path(), "No route");
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not Found".to_string(),
        status_code: 404,
    })
}

/// Accepts absolute `http` and `https` URLs with a host.
fn parse_image_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid image URL: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        scheme => Err(ApiError::InvalidRequest(format!(
            "Invalid image URL: unsupported scheme '{scheme}'"
        ))),
    }
}
