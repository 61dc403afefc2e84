use geo::Area;
use geo_types::{Coord, LineString, Polygon as GeoPolygon};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};

use crate::error::{Result, SilhouetteError};
use crate::types::{IntensityFrame, Polygon};

/// Inverted binary threshold: pixels at or below `min_distance` (nearer than
/// the cut-off) become foreground.
pub fn binarize(mask: &IntensityFrame, min_distance: u8) -> GrayImage {
    let mut binary = GrayImage::new(mask.width(), mask.height());
    for (pixel, &value) in binary.pixels_mut().zip(mask.values()) {
        let intensity = value.clamp(0.0, 255.0) as u8;
        *pixel = if intensity <= min_distance {
            Luma([255u8])
        } else {
            Luma([0u8])
        };
    }
    binary
}

/// Extract the largest closed external boundary from a background-subtracted
/// intensity frame.
///
/// Returns [`SilhouetteError::EmptyScene`] when no boundary exists; callers
/// should treat that as a retryable state, not a failure.
pub fn extract(mask: &IntensityFrame, min_distance: u8) -> Result<Polygon> {
    let binary = binarize(mask, min_distance);
    let contours = find_contours::<i32>(&binary);

    contours
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .map(|contour| {
            contour
                .points
                .iter()
                .map(|p| [p.x as f64, p.y as f64])
                .collect::<Polygon>()
        })
        .max_by(|a, b| {
            enclosed_area(a)
                .partial_cmp(&enclosed_area(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or(SilhouetteError::EmptyScene)
}

fn enclosed_area(points: &[[f64; 2]]) -> f64 {
    let coords: Vec<Coord<f64>> = points.iter().map(|&[x, y]| Coord { x, y }).collect();
    GeoPolygon::new(LineString::new(coords), vec![]).unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A frame that is "background" (254) everywhere except a near rectangle.
    fn frame_with_rect(x0: u32, y0: u32, x1: u32, y1: u32) -> IntensityFrame {
        let mut values = vec![254.0_f32; 64 * 64];
        for y in y0..y1 {
            for x in x0..x1 {
                values[(y * 64 + x) as usize] = 40.0;
            }
        }
        IntensityFrame::from_vec(64, 64, values).unwrap()
    }

    #[test]
    fn finds_the_object_boundary() {
        let frame = frame_with_rect(10, 10, 30, 40);
        let contour = extract(&frame, 100).unwrap();
        assert!(contour.len() >= 4);
        for &[x, y] in &contour {
            assert!((9.0..=30.0).contains(&x));
            assert!((9.0..=40.0).contains(&y));
        }
    }

    #[test]
    fn picks_the_largest_of_several_boundaries() {
        let mut frame = frame_with_rect(2, 2, 6, 6);
        // Add a much larger second object.
        for y in 20..60 {
            for x in 20..60 {
                frame.values_mut()[(y * 64 + x) as usize] = 40.0;
            }
        }
        let contour = extract(&frame, 100).unwrap();
        let inside_large = contour
            .iter()
            .all(|&[x, y]| x >= 19.0 && y >= 19.0);
        assert!(inside_large);
    }

    #[test]
    fn empty_scene_is_a_typed_retryable_error() {
        let empty = IntensityFrame::from_vec(16, 16, vec![254.0; 256]).unwrap();
        match extract(&empty, 100) {
            Err(SilhouetteError::EmptyScene) => {}
            other => panic!("expected EmptyScene, got {other:?}"),
        }
    }
}
