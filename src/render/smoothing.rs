//! Smoothed growth velocity
//!
//! The velocity column written by the simulator is noisy. A smoother estimate
//! is the derivative of needle length over time, taken on every n-th row.

/// Every `stride`-th value, starting with the first
pub fn subsample(values: &[f64], stride: usize) -> Vec<f64> {
    values.iter().step_by(stride.max(1)).copied().collect()
}

/// Numerical gradient of `y` with respect to sample points `x`
///
/// Second-order central differences on interior points (valid for uneven
/// spacing), one-sided first-order differences at both ends. Returns an
/// empty vector when fewer than two samples are available.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len().min(x.len());
    if n < 2 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n);
    out.push((y[1] - y[0]) / (x[1] - x[0]));

    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        let numerator = hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1];
        out.push(numerator / (hs * hd * (hd + hs)));
    }

    out.push((y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));
    out
}

/// (time, dL/dt) points from length and time columns sub-sampled by `stride`
///
/// Points with a non-finite derivative (repeated time stamps) are dropped.
pub fn smoothed_velocity(time: &[f64], length: &[f64], stride: usize) -> Vec<(f64, f64)> {
    let t = subsample(time, stride);
    let l = subsample(length, stride);
    let dldt = gradient(&l, &t);

    t.into_iter()
        .zip(dldt)
        .filter(|(t, v)| t.is_finite() && v.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_subsample() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_eq!(subsample(&values, 3), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(subsample(&values, 50), vec![0.0]);
        // Zero stride behaves like 1
        assert_eq!(subsample(&values, 0).len(), 10);
    }

    #[test]
    fn test_gradient_linear() {
        let x = [0.0, 1.0, 2.5, 4.0];
        let y: Vec<f64> = x.iter().map(|x| 3.0 * x + 2.0).collect();
        for g in gradient(&y, &x) {
            assert_close(g, 3.0);
        }
    }

    #[test]
    fn test_gradient_quadratic_uneven_spacing() {
        // Interior points are exact for quadratics
        let x = [0.0, 1.0, 3.0];
        let y: Vec<f64> = x.iter().map(|x| x * x).collect();
        let g = gradient(&y, &x);
        assert_eq!(g.len(), 3);
        assert_close(g[0], 1.0); // forward difference
        assert_close(g[1], 2.0); // d(x^2)/dx at x = 1
        assert_close(g[2], 4.0); // backward difference
    }

    #[test]
    fn test_gradient_too_short() {
        assert!(gradient(&[1.0], &[0.0]).is_empty());
        assert!(gradient(&[], &[]).is_empty());
    }

    #[test]
    fn test_smoothed_velocity_linear_growth() {
        // L = 0.4 t + 1 sampled every 0.1 time units
        let time: Vec<f64> = (0..1000).map(|i| i as f64 * 0.1).collect();
        let length: Vec<f64> = time.iter().map(|t| 0.4 * t + 1.0).collect();

        let points = smoothed_velocity(&time, &length, 50);
        assert_eq!(points.len(), 20);
        for (i, (t, v)) in points.iter().enumerate() {
            assert_close(*t, time[i * 50]);
            assert_close(*v, 0.4);
        }
    }

    #[test]
    fn test_smoothed_velocity_drops_repeated_times() {
        let time = [0.0, 1.0, 1.0, 2.0];
        let length = [0.0, 1.0, 2.0, 3.0];
        let points = smoothed_velocity(&time, &length, 1);
        assert!(points.iter().all(|(_, v)| v.is_finite()));
        assert!(points.len() < 4);
    }
}
