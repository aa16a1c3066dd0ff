//! faceprint-core — face encoding extraction and similarity scoring.
//!
//! The [`Extractor`] turns an image (or the first page of a PDF) into a
//! 128×128 normalized grayscale [`Encoding`]; [`compare`] scores two
//! serialized encodings by Pearson correlation. The two pipelines share
//! nothing but the encoding's JSON form.

pub mod comparator;
pub mod detector;
pub mod extractor;
pub mod renderer;
pub mod selection;
pub mod types;

pub use comparator::{compare, CompareError, Verdict, DEFAULT_MATCH_THRESHOLD};
pub use detector::{DetectorError, DetectorParams, FaceDetector, SeetaDetector};
pub use extractor::{ExtractError, Extractor, InputKind};
pub use renderer::{PageRenderer, PdfiumRenderer, RenderError, RenderScale};
pub use selection::FaceSelection;
pub use types::{BoundingBox, Encoding, ENCODING_LEN, ENCODING_SIDE};
