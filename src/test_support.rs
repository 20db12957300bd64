//! Fixtures shared by the async tests: a local image server and a stub model.

use actix_web::{rt, web, App, HttpResponse, HttpServer};
use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::Array4;
use std::io::Cursor;
use std::time::Duration;

use crate::classifier::Classifier;
use crate::error::InferenceError;

pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
    buf.into_inner()
}

fn sample_png() -> Vec<u8> {
    let image = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 200]));
    encode_png(&DynamicImage::ImageRgb8(image))
}

fn gray_png() -> Vec<u8> {
    encode_png(&DynamicImage::ImageLuma8(GrayImage::from_pixel(
        30,
        30,
        Luma([128]),
    )))
}

fn rgba_png() -> Vec<u8> {
    let image = RgbaImage::from_fn(40, 25, |x, _| Rgba([200, (x * 6) as u8, 30, 90]));
    encode_png(&DynamicImage::ImageRgba8(image))
}

/// Starts a single-worker server on an ephemeral port and returns its base
/// URL. Must be called from inside an actix runtime.
pub fn spawn_image_server() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/image.png",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("image/png")
                        .body(sample_png())
                }),
            )
            .route(
                "/gray.png",
                web::get().to(|| async {
                    HttpResponse::Ok().content_type("image/png").body(gray_png())
                }),
            )
            .route(
                "/rgba.png",
                web::get().to(|| async {
                    HttpResponse::Ok().content_type("image/png").body(rgba_png())
                }),
            )
            .route(
                "/text",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/plain")
                        .body("this is not an image")
                }),
            )
            .route(
                "/slow",
                web::get().to(|| async {
                    rt::time::sleep(Duration::from_secs(5)).await;
                    HttpResponse::Ok().content_type("image/png").body(sample_png())
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    rt::spawn(server.run());
    format!("http://{addr}")
}

/// Returns the same logits for every input, after checking the input shape.
pub struct StubClassifier {
    pub logits: Vec<f32>,
}

impl StubClassifier {
    /// Logits rising with the index, so the last label always wins.
    pub fn ascending(len: usize) -> Self {
        Self {
            logits: (0..len).map(|i| i as f32 * 0.25).collect(),
        }
    }
}

impl Classifier for StubClassifier {
    fn logits(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        if input.dim() != (1, 3, 224, 224) {
            return Err(InferenceError::Run(format!(
                "unexpected input shape {:?}",
                input.dim()
            )));
        }
        Ok(self.logits.clone())
    }
}
