//! Face detection seam and the SeetaFace cascade backend.
//!
//! The extractor only sees [`FaceDetector`]; the cascade parameters are
//! policy constants and cannot be changed per call.

use crate::types::BoundingBox;
use image::GrayImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Named constants (no magic numbers) ---
const SCALE_STEP: f32 = 1.1;
const MIN_NEIGHBORS: u32 = 4;
const SEETA_MIN_FACE_SIZE: u32 = 20;
const SEETA_WINDOW_STEP: u32 = 4;
/// SeetaFace score per neighbour vote.
const SEETA_SCORE_PER_NEIGHBOR: f64 = 0.5;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("detector model not found: {} — set FACEPRINT_MODEL_PATH to seeta_fd_frontal_v1.0.bin", .0.display())]
    ModelNotFound(PathBuf),
    #[error("failed to load detector model {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },
}

/// Fixed multi-scale detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Ratio between successive pyramid levels (> 1.0).
    pub scale_step: f32,
    /// Minimum overlapping hits before a window counts as a face.
    pub min_neighbors: u32,
}

impl DetectorParams {
    pub const FIXED: DetectorParams = DetectorParams {
        scale_step: SCALE_STEP,
        min_neighbors: MIN_NEIGHBORS,
    };
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Pluggable face detector.
///
/// Returns zero or more boxes in the backend's own order. Callers must not
/// assume the order means anything.
pub trait FaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for &D {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        (**self).detect(gray)
    }
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        (**self).detect(gray)
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace funnel cascade).
pub struct SeetaDetector {
    model: rustface::Model,
    params: DetectorParams,
}

impl SeetaDetector {
    /// Load the SeetaFace frontal model from the given path.
    pub fn load(model_path: &Path) -> Result<Self, DetectorError> {
        if !model_path.exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_path_buf()));
        }

        let load_err = |reason: String| DetectorError::ModelLoad {
            path: model_path.to_path_buf(),
            reason,
        };
        let file = File::open(model_path).map_err(|e| load_err(e.to_string()))?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;

        tracing::info!(path = %model_path.display(), "loaded SeetaFace model");

        Ok(Self {
            model,
            params: DetectorParams::FIXED,
        })
    }

    pub fn params(&self) -> DetectorParams {
        self.params
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        let (width, height) = gray.dimensions();

        // rustface detectors are stateful; build one per call from the shared model.
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(SEETA_MIN_FACE_SIZE);
        detector.set_pyramid_scale_factor(pyramid_factor(self.params.scale_step));
        detector.set_score_thresh(score_threshold(self.params.min_neighbors));
        detector.set_slide_window_step(SEETA_WINDOW_STEP, SEETA_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        tracing::debug!(count = faces.len(), width, height, "SeetaFace detection done");

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                    confidence: Some(face.score() as f32),
                }
            })
            .collect()
    }
}

/// SeetaFace shrinks the image by this factor between pyramid levels.
fn pyramid_factor(scale_step: f32) -> f32 {
    (1.0 / scale_step).clamp(0.01, 0.99)
}

/// SeetaFace has no neighbour voting; its score threshold stands in for it.
fn score_threshold(min_neighbors: u32) -> f64 {
    f64::from(min_neighbors) * SEETA_SCORE_PER_NEIGHBOR
}
