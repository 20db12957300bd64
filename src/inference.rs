//! The evaluation pipeline: fetch, decode, preprocess, forward pass, softmax.

use actix_web::web;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::classifier::Classifier;
use crate::error::{ApiError, InferenceError};
use crate::fetch::{self, ImageFetcher};
use crate::models::{PredictionResponse, CLASS_NAMES};
use crate::preprocess::preprocess;

/// Numerically stable softmax: the maximum logit is subtracted before
/// exponentiating.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Maps logits to a prediction over `labels`, which must be exactly as long
/// as the logit vector.
pub fn postprocess(logits: &[f32], labels: &[&str]) -> Result<PredictionResponse, InferenceError> {
    if logits.len() != labels.len() {
        return Err(InferenceError::OutputLength {
            expected: labels.len(),
            actual: logits.len(),
        });
    }
    if logits.iter().any(|l| !l.is_finite()) {
        return Err(InferenceError::NonFinite);
    }

    let probabilities = softmax(logits);
    let best = argmax(&probabilities).ok_or(InferenceError::OutputLength {
        expected: labels.len(),
        actual: 0,
    })?;

    Ok(PredictionResponse {
        predicted_class: labels[best].to_string(),
        probabilities: labels
            .iter()
            .zip(&probabilities)
            .map(|(label, &p)| (label.to_string(), p))
            .collect::<BTreeMap<_, _>>(),
    })
}

/// Decode, preprocess and classify already downloaded image bytes.
pub fn classify(model: &dyn Classifier, bytes: &[u8]) -> Result<PredictionResponse, ApiError> {
    let image = fetch::decode(bytes)?;
    debug!(width = image.width(), height = image.height(), "image decoded");

    let input = preprocess(&image)?;
    let logits = model.logits(input)?;
    Ok(postprocess(&logits, &CLASS_NAMES)?)
}

/// Runs the full pipeline for one image URL.
///
/// Fails with [`ApiError::ModelUnavailable`] before touching the network when
/// no model is loaded. CPU-bound work runs on the blocking pool.
pub async fn evaluate(
    model: Option<Arc<dyn Classifier>>,
    fetcher: &ImageFetcher,
    url: &Url,
) -> Result<PredictionResponse, ApiError> {
    let model = model.ok_or(ApiError::ModelUnavailable)?;

    info!(%url, "Processing image");
    let bytes = fetcher.fetch(url).await?;

    let prediction = web::block(move || classify(model.as_ref(), &bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(predicted_class = %prediction.predicted_class, "Prediction complete");
    Ok(prediction)
}
