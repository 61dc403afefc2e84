pub mod background;
pub mod extraction;
pub mod normalize;
pub mod smoothing;
pub mod spline;

pub use background::subtract;
pub use extraction::extract;
pub use normalize::{measure, normalize};
pub use smoothing::cut_corners;
pub use spline::{resample, PeriodicSpline};
