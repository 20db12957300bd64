//! The trained model, seen from the service as a function from an image
//! tensor to a vector of logits.

use ndarray::Array4;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::error::{InferenceError, ProvisionError};
use crate::preprocess::INPUT_SIZE;

pub trait Classifier: Send + Sync {
    /// Runs a forward pass on a `(1, 3, 224, 224)` tensor and returns the raw
    /// logits of the single batch entry.
    fn logits(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// ONNX model executed with tract on the CPU.
pub struct OnnxClassifier {
    plan: Plan,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ProvisionError> {
        let size = INPUT_SIZE as usize;
        let load_err = |e: TractError| ProvisionError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        debug!(path = %path.display(), "ONNX plan ready");
        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn logits(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let shape = input.dim();
        let tensor = tract_ndarray::Array4::from_shape_vec(shape, input.into_raw_vec())
            .map_err(|e| InferenceError::Run(e.to_string()))?
            .into_tensor();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::Run("model produced no outputs".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        Ok(view.iter().copied().collect())
    }
}
