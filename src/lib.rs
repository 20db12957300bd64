//! Artwork style classification over HTTP.
//!
//! Downloads an ONNX classifier at startup, then for each request fetches an
//! image by URL, preprocesses it to a `(1, 3, 224, 224)` tensor and returns a
//! probability for each of the 21 art style labels.

pub mod classifier;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod preprocess;
pub mod provision;

#[cfg(test)]
mod test_support;
