use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{Outline, OutlinePair, Polygon};

/// Precomputed affine map from depth-camera space to the target space.
/// Estimating these coefficients is a separate concern; this crate only
/// applies them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AffineCalibration {
    pub matrix: [[f64; 2]; 2],
    pub translation: [f64; 2],
}

impl AffineCalibration {
    pub fn identity() -> Self {
        Self {
            matrix: [[1.0, 0.0], [0.0, 1.0]],
            translation: [0.0, 0.0],
        }
    }

    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [
            self.matrix[0][0] * point[0] + self.matrix[0][1] * point[1] + self.translation[0],
            self.matrix[1][0] * point[0] + self.matrix[1][1] * point[1] + self.translation[1],
        ]
    }
}

impl Default for AffineCalibration {
    fn default() -> Self {
        Self::identity()
    }
}

/// Produce the raw-space and target-space outlines for one resampled curve.
///
/// The transformed outline gets the affine map, then per-axis scale, then
/// per-axis offset, in that order. Both outlines are rounded toward zero and
/// keep index correspondence: point `i` of each originates from `curve[i]`.
pub fn transform(
    curve: &Polygon,
    calibration: &AffineCalibration,
    scale: [f64; 2],
    offset: [f64; 2],
) -> OutlinePair {
    let raw = Outline::new(curve.iter().map(|&[x, y]| [x as i32, y as i32]).collect());

    let transformed = Outline::new(
        curve
            .iter()
            .map(|&point| {
                let [x, y] = calibration.apply(point);
                [
                    (x * scale[0] + offset[0]) as i32,
                    (y * scale[1] + offset[1]) as i32,
                ]
            })
            .collect(),
    );

    OutlinePair { raw, transformed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_applies_before_offset() {
        let curve = vec![[1.0, 1.0]];
        let pair = transform(&curve, &AffineCalibration::identity(), [2.0, 2.0], [10.0, 0.0]);
        assert_eq!(pair.transformed.points[0], [12, 2]);
    }

    #[test]
    fn affine_applies_before_scale_and_offset() {
        let calibration = AffineCalibration {
            matrix: [[0.0, 1.0], [1.0, 0.0]],
            translation: [1.0, 0.0],
        };
        let curve = vec![[2.0, 5.0]];
        let pair = transform(&curve, &calibration, [10.0, 1.0], [0.0, 0.5]);
        // affine: (5 + 1, 2) = (6, 2); scale: (60, 2); offset: (60, 2.5)
        assert_eq!(pair.transformed.points[0], [60, 2]);
    }

    #[test]
    fn outlines_keep_index_correspondence() {
        let curve: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, (i * 2) as f64]).collect();
        let pair = transform(&curve, &AffineCalibration::identity(), [1.0, 1.0], [5.0, 5.0]);
        assert_eq!(pair.raw.len(), pair.transformed.len());
        for (i, (&raw, &tr)) in pair
            .raw
            .points
            .iter()
            .zip(&pair.transformed.points)
            .enumerate()
        {
            assert_eq!(raw, [i as i32, 2 * i as i32]);
            assert_eq!(tr, [raw[0] + 5, raw[1] + 5]);
        }
    }

    #[test]
    fn rounding_truncates_toward_zero() {
        let curve = vec![[1.9, -1.9]];
        let pair = transform(&curve, &AffineCalibration::identity(), [1.0, 1.0], [0.0, 0.0]);
        assert_eq!(pair.raw.points[0], [1, -1]);
    }
}
