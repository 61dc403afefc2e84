mod feed;
mod replay;

pub use feed::{FrameFeed, FramePair};
pub use replay::ReplaySource;

use image::imageops;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ColorFrame, DepthFrame};

/// Capability provided by a depth+color device. Two variants exist: a live
/// driver (external to this crate) and [`ReplaySource`], which cycles a
/// recorded sequence deterministically.
///
/// Implementations may block until new data is available, but must not
/// silently return stale cached data.
pub trait FrameSource {
    fn depth(&mut self) -> Result<DepthFrame>;
    fn video(&mut self) -> Result<ColorFrame>;

    /// Human-readable description of this source.
    fn description(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AcquirerConfig {
    /// Mirror depth and color around the vertical axis.
    pub flip_display_axis: bool,
    /// Per-channel multiplicative color calibration.
    pub color_scale: [f32; 3],
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            flip_display_axis: false,
            color_scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Wraps a [`FrameSource`] and applies the display-axis flip and per-channel
/// color scaling. Owns its source exclusively, so independent pipelines can
/// run against independent devices.
pub struct FrameAcquirer<S: FrameSource> {
    source: S,
    config: AcquirerConfig,
}

impl<S: FrameSource> FrameAcquirer<S> {
    pub fn new(source: S, config: AcquirerConfig) -> Self {
        Self { source, config }
    }

    pub fn depth(&mut self) -> Result<DepthFrame> {
        let depth = self.source.depth()?;
        if self.config.flip_display_axis {
            Ok(depth.flip_horizontal())
        } else {
            Ok(depth)
        }
    }

    pub fn video(&mut self) -> Result<ColorFrame> {
        let mut rgb = self.source.video()?;
        let scale = self.config.color_scale;
        for pixel in rgb.pixels_mut() {
            for (channel, s) in pixel.0.iter_mut().zip(scale) {
                *channel = (*channel as f32 * s).min(255.0) as u8;
            }
        }
        if self.config.flip_display_axis {
            rgb = imageops::flip_horizontal(&rgb);
        }
        Ok(rgb)
    }

    pub fn set_color_scale(&mut self, color_scale: [f32; 3]) {
        self.config.color_scale = color_scale;
    }

    pub fn color_scale(&self) -> [f32; 3] {
        self.config.color_scale
    }

    pub fn source_description(&self) -> String {
        self.source.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn single_color_replay(pixel: [u8; 3]) -> ReplaySource {
        let depth = DepthFrame::from_vec(2, 1, vec![10, 20]).unwrap();
        let color = ColorFrame::from_pixel(2, 1, Rgb(pixel));
        ReplaySource::new(vec![depth], vec![color]).unwrap()
    }

    #[test]
    fn color_scale_is_applied_per_channel() {
        let mut acquirer = FrameAcquirer::new(
            single_color_replay([100, 100, 100]),
            AcquirerConfig {
                flip_display_axis: false,
                color_scale: [0.5, 1.0, 2.0],
            },
        );
        let rgb = acquirer.video().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn color_scale_saturates_at_255() {
        let mut acquirer = FrameAcquirer::new(
            single_color_replay([200, 0, 0]),
            AcquirerConfig {
                flip_display_axis: false,
                color_scale: [2.0, 1.0, 1.0],
            },
        );
        let rgb = acquirer.video().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn flip_applies_to_depth() {
        let mut acquirer = FrameAcquirer::new(
            single_color_replay([0, 0, 0]),
            AcquirerConfig {
                flip_display_axis: true,
                color_scale: [1.0, 1.0, 1.0],
            },
        );
        let depth = acquirer.depth().unwrap();
        assert_eq!(depth.samples(), &[20, 10]);
    }
}
