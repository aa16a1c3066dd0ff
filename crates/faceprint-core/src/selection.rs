//! Face selection policies.
//!
//! Detectors make no promise about the order of the boxes they return, so
//! the choice of "which face" is a named policy rather than an accident of
//! iteration order.

use crate::types::BoundingBox;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown face selection policy {0:?} (expected first, largest or centered)")]
pub struct UnknownSelection(pub String);

/// Strategy for picking one face when the detector returns several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaceSelection {
    /// The first box in detector order.
    #[default]
    FirstReturned,
    /// The box with the greatest area; earliest wins ties.
    Largest,
    /// The box whose centre is closest to the image centre; earliest wins ties.
    MostCentered,
}

impl FaceSelection {
    /// Pick a box from `boxes`, detected in a `width` × `height` image.
    ///
    /// Returns `None` only when `boxes` is empty.
    pub fn select<'a>(
        &self,
        boxes: &'a [BoundingBox],
        width: u32,
        height: u32,
    ) -> Option<&'a BoundingBox> {
        match self {
            Self::FirstReturned => boxes.first(),
            Self::Largest => boxes.iter().reduce(|best, b| {
                if b.area() > best.area() {
                    b
                } else {
                    best
                }
            }),
            Self::MostCentered => {
                let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
                let dist = |b: &BoundingBox| {
                    let (bx, by) = b.center();
                    (bx - cx).powi(2) + (by - cy).powi(2)
                };
                boxes
                    .iter()
                    .reduce(|best, b| if dist(b) < dist(best) { b } else { best })
            }
        }
    }
}

impl FromStr for FaceSelection {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::FirstReturned),
            "largest" => Ok(Self::Largest),
            "centered" | "centred" => Ok(Self::MostCentered),
            _ => Err(UnknownSelection(s.to_string())),
        }
    }
}

impl fmt::Display for FaceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstReturned => "first",
            Self::Largest => "largest",
            Self::MostCentered => "centered",
        })
    }
}
