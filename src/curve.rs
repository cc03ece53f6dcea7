//! Natural cubic spline smoothing for line paths.
//!
//! Each coordinate is interpolated independently over the point index, which
//! yields one cubic Bézier segment per pair of neighbouring points. The
//! Béziers are sampled into a polyline because the drawing backend only
//! strokes straight segments.

/// Default samples per segment used by the line chart
pub const DEFAULT_SAMPLES: usize = 16;

/// Bézier control points (first and second) of every segment for one
/// coordinate. Requires at least three values.
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];

    // Thomas algorithm: forward sweep, then back substitution
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }

    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }

    (a, b)
}

fn cubic_bezier(p0: f64, c1: f64, c2: f64, p3: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * c1 + 3.0 * mt * t * t * c2 + t * t * t * p3
}

/// Smooth `points` with a natural cubic spline and sample each segment
/// `samples` times. The output passes through every input point.
pub fn natural(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || samples == 0 {
        return points.to_vec();
    }

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (px1, px2) = control_points(&xs);
    let (py1, py2) = control_points(&ys);

    let mut out = Vec::with_capacity((points.len() - 1) * samples + 1);
    out.push(points[0]);
    for i in 0..points.len() - 1 {
        let (x0, y0) = points[i];
        let (x3, y3) = points[i + 1];
        for step in 1..=samples {
            let t = step as f64 / samples as f64;
            out.push((
                cubic_bezier(x0, px1[i], px2[i], x3, t),
                cubic_bezier(y0, py1[i], py2[i], y3, t),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_inputs_pass_through() {
        assert!(natural(&[], 8).is_empty());
        assert_eq!(natural(&[(1.0, 2.0)], 8), vec![(1.0, 2.0)]);
        assert_eq!(natural(&[(0.0, 0.0), (1.0, 5.0)], 8), vec![(0.0, 0.0), (1.0, 5.0)]);
    }

    #[test]
    fn test_passes_through_points() {
        let points = vec![(0.0, 10.0), (1.0, 30.0), (2.0, 5.0), (3.0, 20.0)];
        let curve = natural(&points, 4);
        assert_eq!(curve.len(), 3 * 4 + 1);
        for (i, p) in points.iter().enumerate() {
            let sampled = curve[i * 4];
            assert!((sampled.0 - p.0).abs() < 1e-9);
            assert!((sampled.1 - p.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_points_stay_on_line() {
        let points = vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        for (x, y) in natural(&points, 10) {
            assert!((y - 2.0 * x).abs() < 1e-9, "({}, {}) off the line", x, y);
        }
    }

    #[test]
    fn test_control_points_three_values() {
        let (a, b) = control_points(&[0.0, 1.0, 2.0]);
        assert!((a[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((b[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((a[1] - 4.0 / 3.0).abs() < 1e-12);
        assert!((b[1] - 5.0 / 3.0).abs() < 1e-12);
    }
}
