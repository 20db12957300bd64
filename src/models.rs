use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Art style labels, in the order of the model's output logits.
pub const CLASS_NAMES: [&str; 21] = [
    "abstract_art",
    "abstract_expressionism",
    "amateur",
    "art_nouveau",
    "baroque",
    "chinese_landscape",
    "constructivism",
    "cubism",
    "expressionism",
    "fauvism",
    "futurism",
    "high_renaissance",
    "minimalism",
    "op_art",
    "pop_art",
    "post_impressionism",
    "realism",
    "renaissance",
    "romanticism",
    "surrealism",
    "symbolism",
];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageRequest {
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub predicted_class: String,
    pub probabilities: BTreeMap<String, f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub device: String,
    pub model_loaded: bool,
    pub classes_count: usize,
    pub platform: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub classes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
}
