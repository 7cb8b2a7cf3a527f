// Least-squares B-spline curve fitting and evaluation.
// The curve is clamped (open uniform knots), so it starts on the first control
// point and ends on the last one. Control points live in model space behind an
// indexed get/set API; the control count never changes after construction.

use crate::types::Point;
use nalgebra::DMatrix;

/// Why a fit could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("need at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("degree must be at least 1, got {0}")]
    InvalidDegree(usize),
    #[error("degree {degree} needs more than {degree} control points, got {controls}")]
    TooFewControls { degree: usize, controls: usize },
    #[error("{controls} control points exceed the {samples} available samples")]
    TooManyControls { controls: usize, samples: usize },
    #[error("normal equations are singular")]
    Singular,
}

/// A 2D B-spline curve fitted to an ordered sample set.
#[derive(Debug, Clone)]
pub struct BSplineCurveFit {
    degree: usize,
    knots: Vec<f64>,
    controls: Vec<Point>,
}

impl BSplineCurveFit {
    /// Fit `num_controls` control points of the given degree to `samples`.
    ///
    /// Sample `i` of `m` is assigned parameter `i / (m - 1)`, then the control
    /// points solve the normal equations `(AᵀA) P = Aᵀ S` where `A` holds the
    /// basis function values at each sample parameter.
    pub fn new(samples: &[Point], degree: usize, num_controls: usize) -> Result<Self, FitError> {
        validate(samples.len(), degree, num_controls)?;

        let knots = clamped_uniform_knots(num_controls, degree);

        // A[i][j] = N_j(t_i), only `degree + 1` entries per row are non-zero
        let last = (samples.len() - 1) as f64;
        let mut a = DMatrix::<f64>::zeros(samples.len(), num_controls);
        for i in 0..samples.len() {
            let t = i as f64 / last;
            let span = find_span(&knots, degree, num_controls, t);
            let first = span - degree;
            for (j, w) in basis_functions(&knots, degree, span, t).into_iter().enumerate() {
                a[(i, first + j)] = w;
            }
        }
        let s = DMatrix::from_fn(samples.len(), 2, |i, j| if j == 0 { samples[i].x } else { samples[i].y });

        let p = least_squares(&a, &s)?;
        let controls = p.row_iter().map(|r| Point::new(r[0], r[1])).collect();

        Ok(Self { degree, knots, controls })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of control points; fixed after construction.
    pub fn num_controls(&self) -> usize {
        self.controls.len()
    }

    pub fn controls(&self) -> &[Point] {
        &self.controls
    }

    /// Control point `index`. Panics when `index >= num_controls()`.
    pub fn control(&self, index: usize) -> Point {
        self.controls[index]
    }

    /// Overwrite control point `index`. Panics when `index >= num_controls()`.
    pub fn set_control(&mut self, index: usize, point: Point) {
        self.controls[index] = point;
    }

    /// Curve position at `t` in [0,1].
    pub fn position(&self, t: f64) -> Point {
        debug_assert!((0.0..=1.0).contains(&t), "curve parameter {t} outside [0,1]");
        let t = t.clamp(0.0, 1.0);
        let n = self.controls.len();
        let span = find_span(&self.knots, self.degree, n, t);
        let basis = basis_functions(&self.knots, self.degree, span, t);

        let first = span - self.degree;
        basis.iter().enumerate().fold(Point::default(), |acc, (j, &w)| {
            let c = self.controls[first + j];
            Point::new(acc.x + w * c.x, acc.y + w * c.y)
        })
    }
}

fn validate(num_samples: usize, degree: usize, num_controls: usize) -> Result<(), FitError> {
    if num_samples < 2 {
        return Err(FitError::TooFewSamples(num_samples));
    }
    if degree < 1 {
        return Err(FitError::InvalidDegree(degree));
    }
    if num_controls <= degree {
        return Err(FitError::TooFewControls { degree, controls: num_controls });
    }
    if num_controls > num_samples {
        return Err(FitError::TooManyControls { controls: num_controls, samples: num_samples });
    }
    Ok(())
}

/// `n + degree + 1` knots: `degree+1` zeros, evenly spaced interior knots, `degree+1` ones.
fn clamped_uniform_knots(n: usize, degree: usize) -> Vec<f64> {
    let segments = (n - degree) as f64;
    (0..n + degree + 1)
        .map(|i| {
            if i <= degree {
                0.0
            } else if i >= n {
                1.0
            } else {
                (i - degree) as f64 / segments
            }
        })
        .collect()
}

/// Index `k` in `[degree, n-1]` with `knots[k] <= t < knots[k+1]`; `t == 1` maps to `n-1`.
fn find_span(knots: &[f64], degree: usize, n: usize, t: f64) -> usize {
    if t >= knots[n] {
        return n - 1;
    }
    (degree..n).rev().find(|&k| knots[k] <= t).unwrap_or(degree)
}

/// The `degree+1` non-zero basis functions on `span` at `t` (Cox-de Boor triangle).
fn basis_functions(knots: &[f64], degree: usize, span: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0_f64; degree + 1];
    let mut left = vec![0.0_f64; degree + 1];
    let mut right = vec![0.0_f64; degree + 1];
    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Solve the normal equations `(AᵀA) P = AᵀS` for one column of P per coordinate.
fn least_squares(a: &DMatrix<f64>, s: &DMatrix<f64>) -> Result<DMatrix<f64>, FitError> {
    let at = a.transpose();
    let ata = &at * a;
    let ats = &at * s;
    ata.lu().solve(&ats).ok_or(FitError::Singular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    const EPSILON: f64 = 1e-9;

    fn line_samples(count: usize) -> Vec<Point> {
        (0..count)
            .map(|i| {
                let x = -1.0 + 2.0 * i as f64 / (count - 1) as f64;
                Point::new(x, 2.0 * x)
            })
            .collect()
    }

    #[test]
    fn rejects_bad_parameters() {
        let s = line_samples(10);
        assert_eq!(BSplineCurveFit::new(&s[..1], 3, 1).unwrap_err(), FitError::TooFewSamples(1));
        assert_eq!(BSplineCurveFit::new(&s, 0, 4).unwrap_err(), FitError::InvalidDegree(0));
        assert_eq!(
            BSplineCurveFit::new(&s, 3, 3).unwrap_err(),
            FitError::TooFewControls { degree: 3, controls: 3 }
        );
        assert_eq!(
            BSplineCurveFit::new(&s, 3, 11).unwrap_err(),
            FitError::TooManyControls { controls: 11, samples: 10 }
        );
    }

    #[test]
    fn rank_deficient_system_is_singular() {
        // the middle control has no support among the samples
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.5, 0.0, 0.5, 0.0, 0.0, 1.0]);
        let s = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
        assert_eq!(least_squares(&a, &s).unwrap_err(), FitError::Singular);
    }

    #[test]
    fn square_system_interpolates() {
        let a = DMatrix::<f64>::identity(3, 3);
        let s = DMatrix::from_row_slice(3, 2, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let p = least_squares(&a, &s).unwrap();
        assert!((p - s).abs().max() < EPSILON);
    }

    #[test]
    fn knots_are_clamped_and_uniform() {
        let k = clamped_uniform_knots(8, 3);
        assert_eq!(k.len(), 12);
        assert_eq!(&k[..4], &[0.0; 4]);
        assert_eq!(&k[8..], &[1.0; 4]);
        assert!((k[4] - 0.2).abs() < EPSILON);
        assert!((k[7] - 0.8).abs() < EPSILON);
    }

    #[test]
    fn basis_is_a_partition_of_unity() {
        let knots = clamped_uniform_knots(8, 3);
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            let span = find_span(&knots, 3, 8, t);
            let sum: f64 = basis_functions(&knots, 3, span, t).iter().sum();
            assert!((sum - 1.0).abs() < EPSILON, "t={t} sum={sum}");
        }
    }

    #[test]
    fn reproduces_a_straight_line() {
        let fit = BSplineCurveFit::new(&line_samples(50), 3, 6).unwrap();
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let p = fit.position(t);
            let x = -1.0 + 2.0 * t;
            assert!((p.x - x).abs() < 1e-6, "t={t} x={}", p.x);
            assert!((p.y - 2.0 * x).abs() < 1e-6, "t={t} y={}", p.y);
        }
    }

    #[test]
    fn sine_fit_has_eight_controls_and_clamped_ends() {
        let fit = BSplineCurveFit::new(&samples::sine_wave(), 3, 8).unwrap();
        assert_eq!(fit.num_controls(), 8);
        assert_eq!(fit.degree(), 3);

        let start = fit.position(0.0);
        let end = fit.position(1.0);
        assert!((start.x - fit.control(0).x).abs() < EPSILON);
        assert!((end.y - fit.control(7).y).abs() < EPSILON);
        for p in [start, end] {
            assert!((-0.3..=0.3).contains(&p.y), "endpoint {p:?} outside sample range");
        }
    }

    #[test]
    fn set_control_moves_only_that_point() {
        let mut fit = BSplineCurveFit::new(&samples::sine_wave(), 3, 8).unwrap();
        let before = fit.controls().to_vec();
        fit.set_control(4, Point::new(0.5, 0.9));

        for (i, c) in fit.controls().iter().enumerate() {
            if i == 4 {
                assert_eq!(*c, Point::new(0.5, 0.9));
            } else {
                assert_eq!(*c, before[i]);
            }
        }
        assert_eq!(fit.num_controls(), 8);
    }

    #[test]
    #[should_panic]
    fn control_out_of_range_panics() {
        let fit = BSplineCurveFit::new(&line_samples(10), 1, 2).unwrap();
        let _ = fit.control(2);
    }
}
