//! Shared plumbing for the `extract` and `compare` binaries.
//!
//! stdout carries only the result; logs and diagnostics go to stderr.

pub mod config;

use anyhow::{Context, Result};
use clap::Parser;
use faceprint_core::{ExtractError, Extractor, FaceSelection, PdfiumRenderer, SeetaDetector, Verdict};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub use config::Config;

/// Install the stderr `tracing` subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Parse the command line, exiting 1 on a usage error.
///
/// `--help` and `--version` still print to stdout and exit 0.
pub fn parse_args<C: Parser>() -> C {
    C::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(usage_exit_code(&e));
    })
}

/// Exit status for a clap parse outcome.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Run the extraction pipeline and return the serialized encoding.
pub fn run_extract(cfg: &Config, path: &Path, selection: Option<FaceSelection>) -> Result<String> {
    // A missing input is reported before any model is loaded.
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let detector = SeetaDetector::load(&cfg.model_path)?;
    let renderer = match &cfg.pdfium_dir {
        Some(dir) => PdfiumRenderer::with_library_dir(dir),
        None => PdfiumRenderer::new(),
    };

    let extractor =
        Extractor::new(detector, renderer).with_selection(selection.unwrap_or(cfg.face_selection));
    let encoding = extractor
        .extract(path)
        .with_context(|| format!("extract failed for {}", path.display()))?;

    tracing::info!(path = %path.display(), len = encoding.len(), "encoding extracted");
    Ok(encoding.to_json()?)
}

/// Score two serialized encodings and format the output line.
///
/// With `verdict` set the line also carries `match`/`no-match` against
/// `threshold` (or the configured one).
pub fn run_compare(
    cfg: &Config,
    first: &str,
    second: &str,
    verdict: bool,
    threshold: Option<f64>,
) -> Result<String> {
    let score = faceprint_core::compare(first, second).context("compare failed")?;

    if verdict {
        let v = Verdict::new(score, threshold.unwrap_or(cfg.match_threshold));
        tracing::info!(score, threshold = v.threshold, matched = v.matched, "verdict");
        Ok(v.to_string())
    } else {
        Ok(format_score(score))
    }
}

/// Decimal form of a score; always has a fractional part (`1.0`, not `1`).
pub fn format_score(score: f64) -> String {
    format!("{score:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::from_vars(|key| match key {
            "FACEPRINT_MODEL_PATH" => Some("/nonexistent/seeta.bin".to_string()),
            _ => None,
        })
    }

    fn ramp(len: usize) -> String {
        let values: Vec<String> = (0..len).map(|i| format!("{}", (i % 10) as f32 / 10.0)).collect();
        format!("[{}]", values.join(","))
    }

    #[derive(Parser, Debug)]
    struct TwoArgs {
        first: String,
        second: String,
    }

    #[test]
    fn test_usage_errors_exit_1() {
        let missing = TwoArgs::try_parse_from(["compare", "[1,2]"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing), 1);
        let extra = TwoArgs::try_parse_from(["compare", "a", "b", "c"]).unwrap_err();
        assert_eq!(usage_exit_code(&extra), 1);
    }

    #[test]
    fn test_help_exits_0() {
        let help = TwoArgs::try_parse_from(["compare", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.25), "0.25");
    }

    #[test]
    fn test_compare_prints_score_alone() {
        let e = ramp(100);
        let out = run_compare(&cfg(), &e, &e, false, None).unwrap();
        let score: f64 = out.parse().unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_verdict() {
        let e = ramp(100);
        let out = run_compare(&cfg(), &e, &e, true, None).unwrap();
        assert!(out.ends_with(" match"), "{out}");

        let inverted: Vec<String> = (0..100).map(|i| format!("{}", 1.0 - (i % 10) as f32 / 10.0)).collect();
        let inverted = format!("[{}]", inverted.join(","));
        let out = run_compare(&cfg(), &e, &inverted, true, Some(0.5)).unwrap();
        assert_eq!(out, "0.0 no-match");
    }

    #[test]
    fn test_compare_shape_mismatch_is_error() {
        let err = run_compare(&cfg(), &ramp(16384), &ramp(100), false, None).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("different lengths: 16384 vs 100"), "{chain}");
    }

    #[test]
    fn test_extract_missing_input_reported_first() {
        let err = run_extract(&cfg(), Path::new("/nonexistent/face.png"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_extract_without_model_is_error() {
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let err = run_extract(&cfg(), &input, None).unwrap_err();
        assert!(format!("{err:#}").contains("detector model not found"));
    }
}
