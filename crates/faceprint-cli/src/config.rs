use faceprint_core::{FaceSelection, DEFAULT_MATCH_THRESHOLD};
use std::path::PathBuf;

const DEFAULT_MODEL_FILE: &str = "seeta_fd_frontal_v1.0.bin";

/// CLI configuration, loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SeetaFace frontal detector model.
    pub model_path: PathBuf,
    /// Directory holding the pdfium shared library; `None` uses the system one.
    pub pdfium_dir: Option<PathBuf>,
    /// Which face to encode when several are detected.
    pub face_selection: FaceSelection,
    /// Similarity at or above which `compare --verdict` reports a match.
    pub match_threshold: f64,
}

impl Config {
    /// Load configuration from `FACEPRINT_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("faceprint");

        let model_path = var("FACEPRINT_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_MODEL_FILE));

        let face_selection = match var("FACEPRINT_FACE_SELECTION") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring FACEPRINT_FACE_SELECTION");
                FaceSelection::default()
            }),
            None => FaceSelection::default(),
        };

        Self {
            model_path,
            pdfium_dir: var("FACEPRINT_PDFIUM_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            face_selection,
            match_threshold: var("FACEPRINT_MATCH_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MATCH_THRESHOLD),
        }
    }
}
