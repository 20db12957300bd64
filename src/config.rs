//! Service configuration, read once at startup from flags or environment.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_MODEL_URL: &str = "https://github.com/Samin1362/MerakiNexus-V2/raw/main/art_classification_model/subject-2%20(CSE499-B)/EfficientNet-Base/artwork_classification_model_subject_2_efficientNet.onnx";

#[derive(Parser, Debug, Clone)]
#[command(name = "art-evaluator")]
#[command(about = "Artwork style classification service", long_about = None)]
pub struct Config {
    /// Remote location of the ONNX model, used when the local file is missing
    #[arg(long, env = "MODEL_URL", default_value = DEFAULT_MODEL_URL)]
    pub model_url: Url,

    /// Local model file path
    #[arg(long, env = "MODEL_PATH", default_value = "model/artwork_classification_model.onnx")]
    pub model_path: PathBuf,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Timeout for downloading an image to evaluate, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Timeout for downloading the model at startup, in seconds
    #[arg(long, env = "DOWNLOAD_TIMEOUT_SECS", default_value_t = 300)]
    pub download_timeout_secs: u64,

    /// Deployment name reported by the status endpoint
    #[arg(long, env = "PLATFORM", default_value = "standalone")]
    pub platform: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource {
            url: self.model_url.clone(),
            path: self.model_path.clone(),
            timeout: Duration::from_secs(self.download_timeout_secs),
        }
    }
}

/// Where the model lives locally and where to get it from otherwise.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub url: Url,
    pub path: PathBuf,
    pub timeout: Duration,
}
