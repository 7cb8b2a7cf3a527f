// Per-frame drawing: reference grid, sampled curve, control polygon, markers.
// Everything is mapped from model space through the viewport on every frame.

use crate::draw::Surface;
use crate::mapper::Viewport;
use crate::spline::BSplineCurveFit;
use crate::types::{Pixel, Point};

pub const BACKGROUND: u32 = 0x00FF_FFFF;
pub const GRID_MINOR: u32 = 0x00F0_F0F0;
pub const GRID_MAJOR: u32 = 0x00FF_D0D0;
pub const CURVE: u32 = 0x00A0_00A0;
pub const POLYGON: u32 = 0x0000_A0A0;
pub const MARKER: u32 = 0x0000_00FF;

/// Grid lines per model unit; every `GRID_DIVISIONS`-th line is a major one.
const GRID_DIVISIONS: i32 = 10;

/// Draw a whole frame and return the screen position of every control point.
/// The returned markers are what pointer hit-tests run against until the next frame.
pub fn render<S: Surface>(
    surface: &mut S,
    viewport: Viewport,
    curve: &BSplineCurveFit,
    curve_samples: usize,
    control_radius: i32,
) -> Vec<Pixel> {
    surface.clear(BACKGROUND);
    draw_grid(surface, viewport);
    draw_curve(surface, viewport, curve, curve_samples);
    draw_controls(surface, viewport, curve, control_radius)
}

/// Grid lines every 0.1 model units across the visible area.
/// Visual: light gray lines, pink ones on whole units (the axes included).
/// A viewport with a zero side has no visible area and no grid.
pub fn draw_grid<S: Surface>(surface: &mut S, viewport: Viewport) {
    if viewport.scale() <= 0.0 {
        return;
    }
    let top_left = viewport.to_model(Pixel::new(0, 0));
    let bottom_right = viewport.to_model(Pixel::new(viewport.width as i32, viewport.height as i32));
    let step = f64::from(GRID_DIVISIONS);

    let color = |k: i32| if k % GRID_DIVISIONS == 0 { GRID_MAJOR } else { GRID_MINOR };

    // vertical
    let (lo, hi) = ((top_left.x * step).floor() as i32, (bottom_right.x * step).ceil() as i32);
    for k in lo..=hi {
        let x = f64::from(k) / step;
        let p0 = viewport.to_screen(Point::new(x, top_left.y));
        let p1 = viewport.to_screen(Point::new(x, bottom_right.y));
        surface.draw_line(p0.x, p0.y, p1.x, p1.y, color(k));
    }

    // horizontal
    let (lo, hi) = ((bottom_right.y * step).floor() as i32, (top_left.y * step).ceil() as i32);
    for k in lo..=hi {
        let y = f64::from(k) / step;
        let p0 = viewport.to_screen(Point::new(top_left.x, y));
        let p1 = viewport.to_screen(Point::new(bottom_right.x, y));
        surface.draw_line(p0.x, p0.y, p1.x, p1.y, color(k));
    }
}

/// `count` evenly spaced curve positions, t = k / (count - 1), both ends included.
pub fn sample_curve(curve: &BSplineCurveFit, count: usize) -> Vec<Point> {
    let count = count.max(2);
    let step = 1.0 / (count - 1) as f64;
    (0..count).map(|k| curve.position(step * k as f64)).collect()
}

/// The curve as a polyline through `curve_samples` points.
pub fn draw_curve<S: Surface>(surface: &mut S, viewport: Viewport, curve: &BSplineCurveFit, curve_samples: usize) {
    let screen: Vec<Pixel> = sample_curve(curve, curve_samples)
        .into_iter()
        .map(|p| viewport.to_screen(p))
        .collect();
    for pair in screen.windows(2) {
        surface.draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, CURVE);
    }
}

/// Control polygon in index order, then a marker on each control point.
/// Markers go last so they sit on top of every line.
pub fn draw_controls<S: Surface>(
    surface: &mut S,
    viewport: Viewport,
    curve: &BSplineCurveFit,
    control_radius: i32,
) -> Vec<Pixel> {
    let markers = control_markers(curve, viewport);
    for pair in markers.windows(2) {
        surface.draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, POLYGON);
    }
    for m in &markers {
        surface.draw_thick_pixel(m.x, m.y, control_radius, MARKER);
    }
    markers
}

/// Screen position of each control point, in index order.
pub fn control_markers(curve: &BSplineCurveFit, viewport: Viewport) -> Vec<Pixel> {
    curve.controls().iter().map(|&c| viewport.to_screen(c)).collect()
}
