//! Startup model provisioning: use the local file if present, otherwise
//! download it once and load it.

use futures_util::StreamExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::classifier::OnnxClassifier;
use crate::config::ModelSource;
use crate::error::ProvisionError;

const MB: u64 = 1024 * 1024;
const PROGRESS_STEP: u64 = 10 * MB;

/// Makes the model available locally and loads it. There is no retry: the
/// first failure is returned.
pub async fn provision(source: &ModelSource) -> Result<OnnxClassifier, ProvisionError> {
    if source.path.exists() {
        info!(path = %source.path.display(), "Loading model from local path");
    } else {
        info!(url = %source.url, "Local model not found, downloading");
        download(source).await?;
        info!("Download complete, loading model");
    }

    let model = OnnxClassifier::load(&source.path)?;
    info!(path = %source.path.display(), "Model loaded successfully");
    Ok(model)
}

/// Streams the model to a temporary file beside the target and renames it
/// into place once the whole body has been written. Returns the byte count.
///
/// A body shorter than its Content-Length surfaces as a stream error; the
/// temporary file is removed when dropped.
pub async fn download(source: &ModelSource) -> Result<u64, ProvisionError> {
    let dir = match source.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ProvisionError::io(dir, e))?;

    let client = reqwest::Client::builder().timeout(source.timeout).build()?;
    let response = client.get(source.url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProvisionError::Status(status));
    }

    let total = response.content_length();
    if let Some(total) = total {
        info!("Model file size: {:.1} MB", total as f64 / MB as f64);
    }

    let mut file = NamedTempFile::new_in(dir).map_err(|e| ProvisionError::io(dir, e))?;
    let mut received: u64 = 0;
    let mut next_report = PROGRESS_STEP;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .map_err(|e| ProvisionError::io(file.path(), e))?;
        received += chunk.len() as u64;

        if received >= next_report {
            match total {
                Some(total) if total > 0 => info!(
                    "Download progress: {:.1}%",
                    received as f64 / total as f64 * 100.0
                ),
                _ => info!("Downloaded {} MB", received / MB),
            }
            next_report += PROGRESS_STEP;
        }
    }

    file.flush()
        .map_err(|e| ProvisionError::io(file.path(), e))?;
    file.persist(&source.path)
        .map_err(|e| ProvisionError::io(&source.path, e.error))?;

    Ok(received)
}
