// The fixed input dataset the curve is fitted to at startup.

use crate::types::Point;
use std::f64::consts::TAU;

/// 201 samples of `0.3 * sin(2πx)` for x in [-1, 1] at step 0.01.
pub fn sine_wave() -> Vec<Point> {
    (-100..=100)
        .map(|i| {
            let x = f64::from(i) / 100.0;
            Point::new(x, 0.3 * (TAU * x).sin())
        })
        .collect()
}
