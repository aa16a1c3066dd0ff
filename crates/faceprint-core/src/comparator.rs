//! Similarity scoring between two serialized encodings.
//!
//! Pearson correlation rewards matching intensity *patterns*, so a uniform
//! brightness shift between two captures barely moves the score.

use ndarray::Array1;
use std::fmt;
use thiserror::Error;

/// Default cut-off for [`Verdict`] when none is configured.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Which of the two compared encodings an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Second => "second",
        })
    }
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("{operand} encoding is not a valid numeric array: {reason}")]
    MalformedEncoding { operand: Operand, reason: String },
    #[error("encodings have different lengths: {first} vs {second}")]
    ShapeMismatch { first: usize, second: usize },
    #[error("{operand} encoding has zero variance; correlation is undefined")]
    DegenerateEncoding { operand: Operand },
}

/// Parse the textual array form of an encoding.
///
/// Accepts any JSON array of finite numbers; the length is not checked here.
pub fn parse_encoding(text: &str) -> Result<Vec<f32>, String> {
    let values: Vec<f32> = serde_json::from_str(text.trim()).map_err(|e| e.to_string())?;
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("value at index {pos} is not finite"));
    }
    Ok(values)
}

/// Pearson correlation of `a` and `b`, clamped into `[0, 1]`.
///
/// Negative correlation counts as no similarity. The upper clamp only
/// absorbs rounding; mathematically the coefficient never exceeds 1.
pub fn pearson(a: &[f32], b: &[f32]) -> Result<f64, CompareError> {
    if a.len() != b.len() {
        return Err(CompareError::ShapeMismatch {
            first: a.len(),
            second: b.len(),
        });
    }

    let da = centered(a).ok_or(CompareError::DegenerateEncoding {
        operand: Operand::First,
    })?;
    let db = centered(b).ok_or(CompareError::DegenerateEncoding {
        operand: Operand::Second,
    })?;

    let saa = da.dot(&da);
    let sbb = db.dot(&db);
    if saa <= 0.0 {
        return Err(CompareError::DegenerateEncoding {
            operand: Operand::First,
        });
    }
    if sbb <= 0.0 {
        return Err(CompareError::DegenerateEncoding {
            operand: Operand::Second,
        });
    }

    let r = da.dot(&db) / (saa.sqrt() * sbb.sqrt());
    Ok(r.clamp(0.0, 1.0))
}

/// Subtract the mean, in f64. `None` for an empty vector.
fn centered(values: &[f32]) -> Option<Array1<f64>> {
    let v: Array1<f64> = values.iter().map(|&x| f64::from(x)).collect();
    let mean = v.mean()?;
    Some(v - mean)
}

/// Parse both encodings and score them.
pub fn compare(first: &str, second: &str) -> Result<f64, CompareError> {
    let a = parse_encoding(first).map_err(|reason| CompareError::MalformedEncoding {
        operand: Operand::First,
        reason,
    })?;
    let b = parse_encoding(second).map_err(|reason| CompareError::MalformedEncoding {
        operand: Operand::Second,
        reason,
    })?;

    let score = pearson(&a, &b)?;
    tracing::debug!(len = a.len(), score, "encodings compared");
    Ok(score)
}

/// Accept/reject decision over a raw similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub score: f64,
    pub threshold: f64,
    pub matched: bool,
}

impl Verdict {
    pub fn new(score: f64, threshold: f64) -> Self {
        Self {
            score,
            threshold,
            matched: score >= threshold,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.matched { "match" } else { "no-match" };
        write!(f, "{:?} {label}", self.score)
    }
}
