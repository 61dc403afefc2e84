use crate::calibrate::AffineCalibration;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Fluent construction of a [`Pipeline`].
pub struct PipelineBuilder {
    config: PipelineConfig,
    calibration: AffineCalibration,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            calibration: AffineCalibration::identity(),
        }
    }

    /// Replace the whole parameter set at once.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_depth_band(mut self, dmin: f64, dmax: f64) -> Self {
        self.config.dmin = dmin;
        self.config.dmax = dmax;
        self
    }

    pub fn with_min_distance(mut self, min_distance: u8) -> Self {
        self.config.min_distance = min_distance;
        self
    }

    pub fn with_background_margin(mut self, margin: f32) -> Self {
        self.config.background_margin = margin;
        self
    }

    pub fn with_corner_cutting(mut self, steps: usize) -> Self {
        self.config.corner_cutting_steps = steps;
        self
    }

    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.config.num_points = num_points;
        self
    }

    pub fn with_measurements(mut self, nmeasurements: usize) -> Self {
        self.config.nmeasurements = nmeasurements;
        self
    }

    pub fn with_scale_offset(mut self, scale: [f64; 2], offset: [f64; 2]) -> Self {
        self.config.scale = scale;
        self.config.offset = offset;
        self
    }

    pub fn with_calibration(mut self, calibration: AffineCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::new(self.config, self.calibration)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
