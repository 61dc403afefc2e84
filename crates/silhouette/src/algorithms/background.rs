use crate::error::{Result, SilhouetteError};
use crate::types::IntensityFrame;

/// Intensity value meaning "background" after subtraction.
pub const BACKGROUND_VALUE: f32 = 254.0;

/// Default noise margin in intensity units.
pub const DEFAULT_MARGIN: f32 = 3.0;

/// Hard background mask: keep a pixel only where the live frame is closer
/// (darker) than the reference by more than `margin` intensity units;
/// everything else saturates to [`BACKGROUND_VALUE`].
pub fn subtract(
    frame: &IntensityFrame,
    background: &IntensityFrame,
    margin: f32,
) -> Result<IntensityFrame> {
    if frame.dimensions() != background.dimensions() {
        return Err(SilhouetteError::DimensionMismatch {
            expected: background.dimensions(),
            got: frame.dimensions(),
        });
    }

    let mut out = IntensityFrame::zeros(frame.width(), frame.height());
    for ((value, &live), &reference) in out
        .values_mut()
        .iter_mut()
        .zip(frame.values())
        .zip(background.values())
    {
        *value = if live - reference < -margin {
            live
        } else {
            BACKGROUND_VALUE
        };
    }
    Ok(out)
}
