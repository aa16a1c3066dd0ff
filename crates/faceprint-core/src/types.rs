use serde::{Deserialize, Serialize};

/// Side length of the square face crop an encoding is sampled from.
pub const ENCODING_SIDE: u32 = 128;

/// Number of values in every encoding produced by the extractor (128 × 128).
pub const ENCODING_LEN: usize = (ENCODING_SIDE * ENCODING_SIDE) as usize;

/// Bounding box for a detected face, in grayscale source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Detector score, if the backend reports one. Never used for ordering.
    pub confidence: Option<f32>,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: None,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Centre of the box in source-image coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Intersect the box with a `width` × `height` image.
    ///
    /// Returns `(x, y, w, h)` in unsigned image coordinates, or `None` when
    /// nothing of the box lies inside the image.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(self.x).clamp(0, i64::from(width));
        let y0 = i64::from(self.y).clamp(0, i64::from(height));
        let x1 = (i64::from(self.x) + i64::from(self.width)).clamp(0, i64::from(width));
        let y1 = (i64::from(self.y) + i64::from(self.height)).clamp(0, i64::from(height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Normalized grayscale face crop, flattened row-major.
///
/// Always exactly [`ENCODING_LEN`] values in `[0.0, 1.0]`. Serializes as a
/// bare JSON array of numbers, which is the contract between `extract` and
/// `compare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding {
    values: Vec<f32>,
}

impl Encoding {
    /// Wrap a vector that already satisfies the encoding invariants.
    ///
    /// Returns `None` on a wrong length or an out-of-range value.
    pub fn from_values(values: Vec<f32>) -> Option<Self> {
        let in_range = values.iter().all(|v| (0.0..=1.0).contains(v));
        (values.len() == ENCODING_LEN && in_range).then_some(Self { values })
    }

    /// Wrap pixels that are already 128×128 and scaled into `[0, 1]`.
    pub(crate) fn from_normalized(values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), ENCODING_LEN);
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize to the textual array form printed by `extract`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_len_constant() {
        assert_eq!(ENCODING_LEN, 16384);
    }

    #[test]
    fn test_from_values_rejects_wrong_length() {
        assert!(Encoding::from_values(vec![0.5; 100]).is_none());
        assert!(Encoding::from_values(vec![0.5; ENCODING_LEN]).is_some());
    }

    #[test]
    fn test_from_values_rejects_out_of_range() {
        let mut values = vec![0.5; ENCODING_LEN];
        values[17] = 1.5;
        assert!(Encoding::from_values(values).is_none());
    }

    #[test]
    fn test_to_json_is_bare_array() {
        let mut values = vec![0.0; ENCODING_LEN];
        values[0] = 1.0;
        values[1] = 0.5;
        let json = Encoding::from_values(values).unwrap().to_json().unwrap();
        assert!(json.starts_with("[1.0,0.5,0.0,"), "got {}", &json[..20]);
        assert!(json.ends_with("0.0]"));

        let parsed: Vec<f32> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), ENCODING_LEN);
    }

    #[test]
    fn test_from_normalized_keeps_values() {
        let enc = Encoding::from_normalized(vec![0.25; ENCODING_LEN]);
        assert_eq!(enc.len(), ENCODING_LEN);
        assert_eq!(Encoding::from_values(enc.values().to_vec()), Some(enc));
    }

    #[test]
    fn test_clip_inside() {
        let b = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(b.clip_to(100, 100), Some((10, 20, 30, 40)));
    }

    #[test]
    fn test_clip_partially_outside() {
        let b = BoundingBox::new(-5, 90, 20, 20);
        assert_eq!(b.clip_to(100, 100), Some((0, 90, 15, 10)));
    }

    #[test]
    fn test_clip_fully_outside() {
        let b = BoundingBox::new(150, 150, 20, 20);
        assert_eq!(b.clip_to(100, 100), None);
        let zero = BoundingBox::new(10, 10, 0, 10);
        assert_eq!(zero.clip_to(100, 100), None);
    }

    #[test]
    fn test_center_and_area() {
        let b = BoundingBox::new(10, 10, 20, 40);
        assert_eq!(b.center(), (20.0, 30.0));
        assert_eq!(b.area(), 800);
    }
}
