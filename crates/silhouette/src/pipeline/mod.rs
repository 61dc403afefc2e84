pub mod builder;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::{background, extraction, normalize, smoothing, spline};
use crate::calibrate::{self, AffineCalibration};
use crate::error::Result;
use crate::sensor::{FrameAcquirer, FrameSource};
use crate::types::{ColorFrame, IntensityFrame, OutlinePair};

/// Tunable parameters for one capture-to-outline pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    /// Near clip of the depth band, millimeters.
    pub dmin: f64,
    /// Far clip of the depth band, millimeters.
    pub dmax: f64,
    /// Foreground threshold applied to the subtracted intensity frame.
    pub min_distance: u8,
    /// Noise margin for background subtraction, intensity units.
    pub background_margin: f32,
    /// Corner-cutting rounds before spline fitting.
    pub corner_cutting_steps: usize,
    /// Spline smoothing factor.
    pub smoothing: f64,
    /// Point count of the resampled outline.
    pub num_points: usize,
    /// Captures averaged per measurement.
    pub nmeasurements: usize,
    /// Per-axis scale applied to the calibrated outline.
    pub scale: [f64; 2],
    /// Per-axis offset applied after scaling.
    pub offset: [f64; 2],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dmin: 500.0,
            dmax: 1000.0,
            min_distance: 140,
            background_margin: background::DEFAULT_MARGIN,
            corner_cutting_steps: 2,
            smoothing: spline::DEFAULT_SMOOTHING,
            num_points: 100,
            nmeasurements: 10,
            scale: [1.0, 1.0],
            offset: [0.0, 0.0],
        }
    }
}

/// One full pipeline pass: the color capture, the averaged normalized depth
/// frame it was derived from, and the extracted outline pair.
#[derive(Debug, Clone)]
pub struct CapturePass {
    pub color: ColorFrame,
    pub depth: IntensityFrame,
    pub outlines: OutlinePair,
}

/// Capture → normalize → subtract → extract → smooth → resample → calibrate.
pub struct Pipeline {
    config: PipelineConfig,
    calibration: AffineCalibration,
}

impl Pipeline {
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(config: PipelineConfig, calibration: AffineCalibration) -> Self {
        Self {
            config,
            calibration,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Capture and normalize a background reference from an empty scene.
    /// Held for the session and compared against every subsequent capture.
    pub fn capture_background<S: FrameSource>(
        &self,
        acquirer: &mut FrameAcquirer<S>,
    ) -> Result<IntensityFrame> {
        normalize::measure(
            acquirer,
            self.config.nmeasurements,
            self.config.dmin,
            self.config.dmax,
        )
    }

    /// Derive the outline pair from an already-normalized depth measurement.
    pub fn outline_from_depth(
        &self,
        depth: &IntensityFrame,
        background: &IntensityFrame,
    ) -> Result<OutlinePair> {
        let foreground = background::subtract(depth, background, self.config.background_margin)?;
        let contour = extraction::extract(&foreground, self.config.min_distance)?;
        debug!(points = contour.len(), "extracted contour");

        let cut = smoothing::cut_corners(&contour, self.config.corner_cutting_steps);
        let curve = spline::resample(&cut, self.config.smoothing, self.config.num_points)?;

        Ok(calibrate::transform(
            &curve,
            &self.calibration,
            self.config.scale,
            self.config.offset,
        ))
    }

    /// Run one full pass against a live or replay acquirer: averaged depth
    /// measurement, color capture, and the resulting outline pair.
    pub fn process<S: FrameSource>(
        &self,
        acquirer: &mut FrameAcquirer<S>,
        background: &IntensityFrame,
    ) -> Result<CapturePass> {
        let depth = normalize::measure(
            acquirer,
            self.config.nmeasurements,
            self.config.dmin,
            self.config.dmax,
        )?;
        let color = acquirer.video()?;
        let outlines = self.outline_from_depth(&depth, background)?;
        Ok(CapturePass {
            color,
            depth,
            outlines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{AcquirerConfig, ReplaySource};
    use crate::types::DepthFrame;

    const W: u32 = 64;
    const H: u32 = 64;

    /// Depth frame at `far` mm with a rectangle of `near` mm.
    fn scene(near: u16, far: u16) -> DepthFrame {
        DepthFrame::from_fn(W, H, |x, y| {
            if (16..48).contains(&x) && (16..48).contains(&y) {
                near
            } else {
                far
            }
        })
    }

    fn empty_scene(far: u16) -> DepthFrame {
        DepthFrame::from_fn(W, H, |_, _| far)
    }

    fn test_pipeline() -> Pipeline {
        Pipeline::builder()
            .with_config(PipelineConfig {
                nmeasurements: 1,
                corner_cutting_steps: 2,
                num_points: 64,
                ..PipelineConfig::default()
            })
            .build()
    }

    fn acquirer(frame: DepthFrame) -> FrameAcquirer<ReplaySource> {
        let source = ReplaySource::new(vec![frame], vec![ColorFrame::new(W, H)]).unwrap();
        FrameAcquirer::new(source, AcquirerConfig::default())
    }

    #[test]
    fn full_pass_produces_fixed_count_outlines() {
        let pipeline = test_pipeline();
        let background = normalize::normalize(&empty_scene(950), 500.0, 1000.0);
        let mut acq = acquirer(scene(600, 950));

        let pass = pipeline.process(&mut acq, &background).unwrap();
        assert_eq!(pass.outlines.raw.len(), 64);
        assert_eq!(pass.outlines.transformed.len(), 64);

        // Outline should sit near the rectangle boundary.
        for &[x, y] in &pass.outlines.raw.points {
            assert!((10..=54).contains(&x), "x={x} outside object region");
            assert!((10..=54).contains(&y), "y={y} outside object region");
        }
    }

    #[test]
    fn empty_scene_reports_retryable_error() {
        let pipeline = test_pipeline();
        let background = normalize::normalize(&empty_scene(950), 500.0, 1000.0);
        let mut acq = acquirer(empty_scene(950));

        let result = pipeline.process(&mut acq, &background);
        assert!(matches!(
            result,
            Err(crate::error::SilhouetteError::EmptyScene)
        ));
    }
}
