//! Error types for each stage of the evaluation pipeline.
//!
//! Every stage returns its own error enum; [`ApiError`] is the only type that
//! knows about HTTP and is what handlers return.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Fatal failure while making the model available at startup.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("model download returned {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to load model from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

impl ProvisionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure retrieving or decoding a remote image.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Image download timeout")]
    Timeout,

    #[error("Failed to download image: server responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to download image: {0}")]
    Request(String),

    #[error("Invalid image format: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Image preprocessing failed: image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Prediction failed: {0}")]
    Run(String),

    #[error("Prediction failed: model returned {actual} logits, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("Prediction failed: model returned non-finite logits")]
    NonFinite,
}

/// Per-request error, translated to a JSON body and status code at the
/// handler boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Client-caused errors are logged at `warn`, the rest at `error`.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::Preprocess(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(FetchError::Timeout) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Fetch(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable | ApiError::Inference(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
