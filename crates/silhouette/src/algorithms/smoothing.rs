use crate::types::Polygon;

/// Chaikin-style corner cutting.
///
/// Each round closes the polygon by appending the first point, then replaces
/// the sequence with the midpoints of every adjacent pair (the closing edge
/// included). Sharp corners from contour tracing are smoothed exponentially
/// with the round count; the point count is preserved per round.
pub fn cut_corners(polygon: &[[f64; 2]], iterations: usize) -> Polygon {
    let mut outline = polygon.to_vec();
    for _ in 0..iterations {
        if outline.len() < 2 {
            break;
        }
        outline.push(outline[0]);
        outline = outline
            .windows(2)
            .map(|pair| {
                [
                    0.5 * pair[0][0] + 0.5 * pair[1][0],
                    0.5 * pair[0][1] + 0.5 * pair[1][1],
                ]
            })
            .collect();
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
    }

    #[test]
    fn zero_iterations_is_identity() {
        assert_eq!(cut_corners(&square(), 0), square());
    }

    #[test]
    fn one_round_replaces_points_with_edge_midpoints() {
        let cut = cut_corners(&square(), 1);
        assert_eq!(
            cut,
            vec![[5.0, 0.0], [10.0, 5.0], [5.0, 10.0], [0.0, 5.0]]
        );
    }

    #[test]
    fn point_count_is_preserved_per_round() {
        for iterations in 0..5 {
            assert_eq!(cut_corners(&square(), iterations).len(), 4);
        }
    }

    #[test]
    fn repeated_cutting_contracts_toward_the_centroid() {
        let cut = cut_corners(&square(), 8);
        for &[x, y] in &cut {
            assert!((x - 5.0).abs() < 2.0);
            assert!((y - 5.0).abs() < 2.0);
        }
    }
}
