use crate::error::{Result, SilhouetteError};
use crate::sensor::FrameSource;
use crate::types::{ColorFrame, DepthFrame};

/// Deterministic replay substitute for a live device: cycles through a
/// recorded sequence, wrapping with modulo arithmetic.
///
/// A depth request advances the cursor; a video request reuses the current
/// cursor position, so a depth+video pair taken in one pipeline pass comes
/// from the same recorded instant.
pub struct ReplaySource {
    depth_frames: Vec<DepthFrame>,
    color_frames: Vec<ColorFrame>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(depth_frames: Vec<DepthFrame>, color_frames: Vec<ColorFrame>) -> Result<Self> {
        if depth_frames.is_empty() || color_frames.is_empty() {
            return Err(SilhouetteError::Source(
                "replay source needs at least one depth and one color frame".to_string(),
            ));
        }
        Ok(Self {
            depth_frames,
            color_frames,
            cursor: 0,
        })
    }

    pub fn frame_count(&self) -> (usize, usize) {
        (self.depth_frames.len(), self.color_frames.len())
    }
}

impl FrameSource for ReplaySource {
    fn depth(&mut self) -> Result<DepthFrame> {
        self.cursor += 1;
        let index = self.cursor % self.depth_frames.len();
        Ok(self.depth_frames[index].clone())
    }

    fn video(&mut self) -> Result<ColorFrame> {
        let index = self.cursor % self.color_frames.len();
        Ok(self.color_frames[index].clone())
    }

    fn description(&self) -> String {
        format!(
            "Replay: {} depth / {} color frames",
            self.depth_frames.len(),
            self.color_frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(values: &[u16]) -> Vec<DepthFrame> {
        values
            .iter()
            .map(|&v| DepthFrame::from_vec(1, 1, vec![v]).unwrap())
            .collect()
    }

    #[test]
    fn depth_advances_and_wraps_with_modulo() {
        let mut source = ReplaySource::new(
            recorded(&[10, 20, 30]),
            vec![ColorFrame::new(1, 1)],
        )
        .unwrap();

        // Cursor starts at 0, each call advances first: 1, 2, 0, 1, ...
        let seen: Vec<u16> = (0..5)
            .map(|_| source.depth().unwrap().get(0, 0))
            .collect();
        assert_eq!(seen, vec![20, 30, 10, 20, 30]);
    }

    #[test]
    fn video_reuses_the_depth_cursor() {
        let colors = vec![
            ColorFrame::from_pixel(1, 1, image::Rgb([1, 1, 1])),
            ColorFrame::from_pixel(1, 1, image::Rgb([2, 2, 2])),
        ];
        let mut source = ReplaySource::new(recorded(&[10, 20]), colors).unwrap();

        let _ = source.depth().unwrap();
        let first = source.video().unwrap();
        let second = source.video().unwrap();
        assert_eq!(first.get_pixel(0, 0).0, [2, 2, 2]);
        // No depth call in between: the cursor has not moved.
        assert_eq!(second.get_pixel(0, 0).0, [2, 2, 2]);
    }

    #[test]
    fn empty_recordings_are_rejected() {
        assert!(ReplaySource::new(vec![], vec![ColorFrame::new(1, 1)]).is_err());
    }
}
