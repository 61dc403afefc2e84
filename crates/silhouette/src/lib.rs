//! # Silhouette Extraction Library
//!
//! Captures depth+color frames from a 3-D sensor capability, isolates the
//! silhouette of an object against a session background reference, and
//! normalizes it into a smooth closed outline in both sensor space and a
//! calibrated target space.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use silhouette::{Pipeline, FrameAcquirer, AcquirerConfig, ReplaySource};
//!
//! # fn load_recording() -> ReplaySource { unimplemented!() }
//! let pipeline = Pipeline::builder()
//!     .with_num_points(100)
//!     .with_corner_cutting(2)
//!     .build();
//!
//! let mut acquirer = FrameAcquirer::new(load_recording(), AcquirerConfig::default());
//! let background = pipeline.capture_background(&mut acquirer)?;
//!
//! let pass = pipeline.process(&mut acquirer, &background)?;
//! println!("outline: {} points", pass.outlines.transformed.len());
//! # Ok::<(), silhouette::SilhouetteError>(())
//! ```

pub mod algorithms;
pub mod calibrate;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod sensor;
pub mod types;

pub use calibrate::AffineCalibration;
pub use error::{Result, SilhouetteError};
pub use pipeline::{builder::PipelineBuilder, CapturePass, Pipeline, PipelineConfig};
pub use sensor::{AcquirerConfig, FrameAcquirer, FrameFeed, FramePair, FrameSource, ReplaySource};
pub use types::{ColorFrame, DepthFrame, IntensityFrame, Outline, OutlinePair, Polygon};
