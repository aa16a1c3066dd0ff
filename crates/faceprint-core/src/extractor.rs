//! Encoding extraction pipeline.
//!
//! path → [pdf: rasterize page 0 at 2×] → decode → grayscale → detect →
//! select → crop → 128×128 → /255 → [`Encoding`].

use crate::detector::FaceDetector;
use crate::renderer::{PageRenderer, RenderError, PDF_RENDER_SCALE};
use crate::selection::FaceSelection;
use crate::types::{BoundingBox, Encoding, ENCODING_SIDE};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TEMP_RASTER_PREFIX: &str = "faceprint-page-";
const TEMP_RASTER_SUFFIX: &str = ".png";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("PDF has no pages: {}", path.display())]
    EmptyDocument { path: PathBuf },
    #[error("failed to render first page of {}: {source}", path.display())]
    RenderFailure {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoadFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no face detected in {}", path.display())]
    NoFaceDetected { path: PathBuf },
    #[error("selected face region {bbox:?} lies outside the {width}x{height} image")]
    EmptyFaceRegion {
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },
    #[error("failed to create temporary raster: {0}")]
    TempFile(#[source] std::io::Error),
}

/// How an input path is processed, decided by extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Pdf,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Self {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Self::Pdf
        } else {
            Self::Image
        }
    }
}

/// Produces one [`Encoding`] per input file.
pub struct Extractor<D, R> {
    detector: D,
    renderer: R,
    selection: FaceSelection,
}

impl<D: FaceDetector, R: PageRenderer> Extractor<D, R> {
    pub fn new(detector: D, renderer: R) -> Self {
        Self {
            detector,
            renderer,
            selection: FaceSelection::default(),
        }
    }

    pub fn with_selection(mut self, selection: FaceSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> FaceSelection {
        self.selection
    }

    /// Extract the encoding of the selected face in an image or a PDF's first page.
    pub fn extract(&self, path: &Path) -> Result<Encoding, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        match InputKind::from_path(path) {
            InputKind::Image => self.extract_from_raster(path, path),
            InputKind::Pdf => {
                // Deleted when dropped, on every return path out of this arm.
                let raster = tempfile::Builder::new()
                    .prefix(TEMP_RASTER_PREFIX)
                    .suffix(TEMP_RASTER_SUFFIX)
                    .tempfile()
                    .map_err(ExtractError::TempFile)?
                    .into_temp_path();

                self.renderer
                    .render_first_page(path, PDF_RENDER_SCALE, &raster)
                    .map_err(|e| match e {
                        RenderError::EmptyDocument => ExtractError::EmptyDocument {
                            path: path.to_path_buf(),
                        },
                        source => ExtractError::RenderFailure {
                            path: path.to_path_buf(),
                            source,
                        },
                    })?;
                tracing::debug!(pdf = %path.display(), raster = %raster.display(), "first page rasterized");

                self.extract_from_raster(&raster, path)
            }
        }
    }

    /// `source` is the user-facing path reported in errors.
    fn extract_from_raster(&self, raster: &Path, source: &Path) -> Result<Encoding, ExtractError> {
        let gray = load_grayscale(raster).map_err(|e| ExtractError::ImageLoadFailure {
            path: source.to_path_buf(),
            source: e,
        })?;
        let (width, height) = gray.dimensions();

        let boxes = self.detector.detect(&gray);
        tracing::debug!(path = %source.display(), width, height, faces = boxes.len(), "detection done");

        if boxes.len() > 1 {
            tracing::warn!(
                path = %source.display(),
                faces = boxes.len(),
                policy = %self.selection,
                "multiple faces detected; selecting one"
            );
        }

        let bbox = self
            .selection
            .select(&boxes, width, height)
            .ok_or_else(|| ExtractError::NoFaceDetected {
                path: source.to_path_buf(),
            })?;

        normalize_face(&gray, bbox)
    }
}

/// Decode any supported raster format (sniffed from content) into 8-bit grayscale.
fn load_grayscale(path: &Path) -> Result<GrayImage, image::ImageError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_luma8())
}

/// Crop `bbox` out of `gray`, resample to 128×128 and scale pixels into [0, 1].
pub fn normalize_face(gray: &GrayImage, bbox: &BoundingBox) -> Result<Encoding, ExtractError> {
    let (width, height) = gray.dimensions();
    let (x, y, w, h) = bbox
        .clip_to(width, height)
        .ok_or(ExtractError::EmptyFaceRegion {
            bbox: *bbox,
            width,
            height,
        })?;

    let crop = imageops::crop_imm(gray, x, y, w, h).to_image();
    let resized = imageops::resize(&crop, ENCODING_SIDE, ENCODING_SIDE, FilterType::Triangle);

    let values: Vec<f32> = resized
        .as_raw()
        .iter()
        .map(|&p| f32::from(p) / 255.0)
        .collect();

    // 128×128 u8 pixels divided by 255.
    Ok(Encoding::from_normalized(values))
}
