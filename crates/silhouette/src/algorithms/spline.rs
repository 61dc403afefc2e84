use nalgebra::{DMatrix, DVector};

use crate::error::{Result, SilhouetteError};
use crate::types::Polygon;

/// Default fit-vs-noise tradeoff for the smoothing fit.
pub const DEFAULT_SMOOTHING: f64 = 10.0;

/// Upper bound on control points; keeps the normal-equation solve small for
/// very dense contours.
const MAX_CONTROL_POINTS: usize = 48;

/// A closed parametric curve: uniform periodic cubic B-spline over `[0, 1)`.
#[derive(Debug, Clone)]
pub struct PeriodicSpline {
    control: Vec<[f64; 2]>,
}

impl PeriodicSpline {
    /// Fit a periodic smoothing spline through a closed polygon.
    ///
    /// Points are parametrized by normalized chord length (closing edge
    /// included). The control points are solved by least squares with a
    /// second-difference penalty scaled from `smoothing`; higher values
    /// tolerate more deviation from the input in exchange for a smoother
    /// curve. The fit is fully deterministic.
    pub fn fit(points: &[[f64; 2]], smoothing: f64) -> Result<Self> {
        let n = points.len();
        if n < 4 {
            return Err(SilhouetteError::TooFewPoints { needed: 4, got: n });
        }

        let params = chord_parameters(points)?;
        let k = n.min(MAX_CONTROL_POINTS);

        let mut design = DMatrix::<f64>::zeros(n, k);
        for (i, &u) in params.iter().enumerate() {
            let (indices, weights) = basis(u, k);
            for (index, weight) in indices.into_iter().zip(weights) {
                design[(i, index)] += weight;
            }
        }

        // Periodic second-difference operator on the control polygon.
        let mut penalty = DMatrix::<f64>::zeros(k, k);
        for j in 0..k {
            penalty[(j, (j + k - 1) % k)] += 1.0;
            penalty[(j, j)] -= 2.0;
            penalty[(j, (j + 1) % k)] += 1.0;
        }

        let lambda = smoothing * k as f64 / n as f64;
        let normal = design.transpose() * &design + lambda * penalty.transpose() * &penalty;
        let chol = normal.cholesky().ok_or_else(|| {
            SilhouetteError::NumericalFailure(
                "spline normal equations are not positive definite".to_string(),
            )
        })?;

        let rhs_x = design.transpose() * DVector::from_iterator(n, points.iter().map(|p| p[0]));
        let rhs_y = design.transpose() * DVector::from_iterator(n, points.iter().map(|p| p[1]));
        let cx = chol.solve(&rhs_x);
        let cy = chol.solve(&rhs_y);

        let control = (0..k).map(|j| [cx[j], cy[j]]).collect();
        Ok(Self { control })
    }

    /// Evaluate at parameter `u`; values outside `[0, 1)` wrap.
    pub fn evaluate(&self, u: f64) -> [f64; 2] {
        let k = self.control.len();
        let (indices, weights) = basis(u, k);
        let mut point = [0.0, 0.0];
        for (index, weight) in indices.into_iter().zip(weights) {
            point[0] += weight * self.control[index][0];
            point[1] += weight * self.control[index][1];
        }
        point
    }

    /// Evaluate at `num_points` evenly spaced parameters in `[0, 1)`.
    /// The wrap-around point equals the start and is not duplicated.
    pub fn sample(&self, num_points: usize) -> Polygon {
        let du = 1.0 / num_points as f64;
        (0..num_points)
            .map(|i| self.evaluate(i as f64 * du))
            .collect()
    }
}

/// Fit a periodic smoothing spline and resample it to a fixed point count.
/// Always returns exactly `num_points` points.
pub fn resample(polygon: &[[f64; 2]], smoothing: f64, num_points: usize) -> Result<Polygon> {
    Ok(PeriodicSpline::fit(polygon, smoothing)?.sample(num_points))
}

fn chord_parameters(points: &[[f64; 2]]) -> Result<Vec<f64>> {
    let n = points.len();
    let mut params = Vec::with_capacity(n);
    let mut total = 0.0;
    params.push(0.0);
    for i in 1..n {
        total += distance(points[i - 1], points[i]);
        params.push(total);
    }
    total += distance(points[n - 1], points[0]);
    if total <= 0.0 {
        return Err(SilhouetteError::NumericalFailure(
            "degenerate polygon: zero perimeter".to_string(),
        ));
    }
    for p in &mut params {
        *p /= total;
    }
    Ok(params)
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Uniform periodic cubic B-spline basis: control indices and blending
/// weights for parameter `u` with `k` control points.
fn basis(u: f64, k: usize) -> ([usize; 4], [f64; 4]) {
    let t = u.rem_euclid(1.0) * k as f64;
    let j = (t.floor() as usize) % k;
    let f = t - t.floor();

    let f2 = f * f;
    let f3 = f2 * f;
    let omf = 1.0 - f;
    let w0 = omf * omf * omf / 6.0;
    let w1 = (3.0 * f3 - 6.0 * f2 + 4.0) / 6.0;
    let w2 = (-3.0 * f3 + 3.0 * f2 + 3.0 * f + 1.0) / 6.0;
    let w3 = f3 / 6.0;

    (
        [(j + k - 1) % k, j, (j + 1) % k, (j + 2) % k],
        [w0, w1, w2, w3],
    )
}
