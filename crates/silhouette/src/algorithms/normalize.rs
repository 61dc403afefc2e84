use crate::error::Result;
use crate::sensor::{FrameAcquirer, FrameSource};
use crate::types::{DepthFrame, IntensityFrame};

/// Clamp and rescale one raw depth sample into the [0, 255] intensity band.
///
/// The sensor reports 0 for failed reads, which must not be confused with a
/// very close object, so sub-millimeter samples are pushed to the far plane
/// before clamping to `[dmin, dmax]`.
pub fn normalize_sample(d: f64, dmin: f64, dmax: f64) -> f32 {
    let t = if d < 1.0 { dmax } else { d };
    let t = if t > dmin { t - dmin } else { 0.0 };
    let t = if d >= dmax { dmax - dmin } else { t };
    (t * 255.0 / (dmax - dmin)) as f32
}

/// Normalize a whole depth frame into a bounded intensity frame.
pub fn normalize(raw: &DepthFrame, dmin: f64, dmax: f64) -> IntensityFrame {
    let mut out = IntensityFrame::zeros(raw.width(), raw.height());
    for (value, &sample) in out.values_mut().iter_mut().zip(raw.samples()) {
        *value = normalize_sample(sample as f64, dmin, dmax);
    }
    out
}

/// Capture and normalize `n` frames, averaging the normalized captures.
///
/// Each capture is normalized before being accumulated as `capture / n`;
/// normalization is nonlinear, so averaging raw depth instead would not
/// reproduce the same result.
pub fn measure<S: FrameSource>(
    acquirer: &mut FrameAcquirer<S>,
    n: usize,
    dmin: f64,
    dmax: f64,
) -> Result<IntensityFrame> {
    let n = n.max(1);
    let inv = 1.0 / n as f32;

    let first = acquirer.depth()?;
    let mut accumulated = normalize(&first, dmin, dmax);
    for value in accumulated.values_mut() {
        *value *= inv;
    }

    for _ in 1..n {
        let capture = acquirer.depth()?;
        let normalized = normalize(&capture, dmin, dmax);
        for (acc, value) in accumulated.values_mut().iter_mut().zip(normalized.values()) {
            *acc += value * inv;
        }
    }

    Ok(accumulated)
}
