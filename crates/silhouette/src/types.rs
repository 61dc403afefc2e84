use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SilhouetteError};

/// Color frame as captured alongside depth, same spatial convention.
pub type ColorFrame = image::RgbImage;

/// A 2-D polygon in floating-point pixel coordinates. Closed implicitly:
/// the first point is not duplicated at the end.
pub type Polygon = Vec<[f64; 2]>;

/// Raw depth capture: a grid of distance samples in millimeters.
/// Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl DepthFrame {
    pub fn from_vec(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(SilhouetteError::DimensionMismatch {
                expected: (width, height),
                got: (data.len() as u32, 1),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u16) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    /// Mirror around the vertical axis (display-axis flip).
    pub fn flip_horizontal(&self) -> DepthFrame {
        DepthFrame::from_fn(self.width, self.height, |x, y| {
            self.get(self.width - 1 - x, y)
        })
    }
}

/// Normalized depth intensity in the [0, 255] band, kept as f32 so that
/// multi-capture averaging stays exact before thresholding.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityFrame {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl IntensityFrame {
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(SilhouetteError::DimensionMismatch {
                expected: (width, height),
                got: (data.len() as u32, 1),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0_f32, f32::max)
    }
}

/// Ordered closed sequence of integer points (first/last not duplicated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Outline {
    pub points: Vec<[i32; 2]>,
}

impl Outline {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The two outlines produced by one pipeline pass: the resampled curve in
/// depth-sensor pixel space and its calibrated counterpart in the target
/// coordinate space. Point `i` of both outlines originates from the same
/// resampled curve point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutlinePair {
    pub raw: Outline,
    pub transformed: Outline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_frame_indexing_is_row_major() {
        let frame = DepthFrame::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(frame.get(0, 0), 1);
        assert_eq!(frame.get(2, 0), 3);
        assert_eq!(frame.get(0, 1), 4);
        assert_eq!(frame.get(2, 1), 6);
    }

    #[test]
    fn depth_frame_rejects_bad_lengths() {
        assert!(DepthFrame::from_vec(3, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn flip_horizontal_mirrors_rows() {
        let frame = DepthFrame::from_vec(3, 1, vec![1, 2, 3]).unwrap();
        let flipped = frame.flip_horizontal();
        assert_eq!(flipped.samples(), &[3, 2, 1]);
    }
}
