use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

use crate::error::PreprocessError;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;

// ImageNet statistics, RGB order.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Turns a decoded image into the normalized `(1, 3, 224, 224)` tensor the
/// model expects.
///
/// The image is stretched to a square with bilinear (triangle) filtering,
/// scaled to `[0, 1]` and normalized per channel. Output is a pure function
/// of the pixels.
pub fn preprocess(image: &RgbImage) -> Result<Array4<f32>, PreprocessError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::EmptyImage { width, height });
    }

    let resized = imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let size = INPUT_SIZE as usize;
    let tensor = Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let value = resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - MEAN[c]) / STD[c]
    });

    Ok(tensor)
}
