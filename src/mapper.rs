// Model space <-> screen space.
// The scale is derived from the viewport on every call, so a resize moves where
// the (unchanged) model-space control points land on screen.

use crate::types::{Pixel, Point};

/// Fraction of the smaller viewport side that one model unit covers.
const UNIT_FRACTION: f64 = 0.3;

/// Live pixel size of the drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Pixels per model unit.
    pub fn scale(&self) -> f64 {
        self.width.min(self.height) as f64 * UNIT_FRACTION
    }

    /// Model point to the nearest pixel. The y axis flips (pixel rows grow downward).
    pub fn to_screen(&self, p: Point) -> Pixel {
        let scale = self.scale();
        let x = (0.5 * self.width as f64 + scale * p.x).round();
        let y = (0.5 * self.height as f64 - scale * p.y).round();
        Pixel::new(x as i32, y as i32)
    }

    /// Pixel to model point; exact inverse of `to_screen` before its rounding.
    pub fn to_model(&self, p: Pixel) -> Point {
        let scale = self.scale();
        let x = (f64::from(p.x) - 0.5 * self.width as f64) / scale;
        let y = -(f64::from(p.y) - 0.5 * self.height as f64) / scale;
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn center_maps_to_origin() {
        for vp in [Viewport::new(512, 512), Viewport::new(256, 512), Viewport::new(800, 600)] {
            let c = vp.to_screen(Point::new(0.0, 0.0));
            assert_eq!(c, Pixel::new(vp.width as i32 / 2, vp.height as i32 / 2));
            let o = vp.to_model(c);
            assert!(o.x.abs() < EPSILON && o.y.abs() < EPSILON);
        }
    }

    #[test]
    fn square_viewport_formulas() {
        let vp = Viewport::new(512, 512);
        assert!((vp.scale() - 153.6).abs() < EPSILON);
        // 256 + 153.6 = 409.6 -> 410 ; 256 - 153.6 = 102.4 -> 102
        assert_eq!(vp.to_screen(Point::new(1.0, 1.0)), Pixel::new(410, 102));
        assert_eq!(vp.to_screen(Point::new(-1.0, -1.0)), Pixel::new(102, 410));
    }

    #[test]
    fn narrow_viewport_uses_smaller_side() {
        let vp = Viewport::new(256, 512);
        assert!((vp.scale() - 76.8).abs() < EPSILON);
        // 128 + 76.8 = 204.8 -> 205 ; 256 - 76.8 = 179.2 -> 179
        assert_eq!(vp.to_screen(Point::new(1.0, 1.0)), Pixel::new(205, 179));
        assert_eq!(vp.to_screen(Point::new(-1.0, 1.0)), Pixel::new(51, 179));
    }

    #[test]
    fn wide_viewport_formulas() {
        let vp = Viewport::new(800, 600);
        assert!((vp.scale() - 180.0).abs() < EPSILON);
        assert_eq!(vp.to_screen(Point::new(1.0, 1.0)), Pixel::new(580, 120));
        assert_eq!(vp.to_screen(Point::new(-1.0, -1.0)), Pixel::new(220, 480));
    }

    #[test]
    fn screen_corners_invert() {
        for vp in [Viewport::new(512, 512), Viewport::new(256, 512), Viewport::new(800, 600)] {
            let (w, h, scale) = (vp.width as f64, vp.height as f64, vp.scale());
            let tl = vp.to_model(Pixel::new(0, 0));
            let br = vp.to_model(Pixel::new(vp.width as i32, vp.height as i32));
            assert!((tl.x + 0.5 * w / scale).abs() < EPSILON, "{vp:?}");
            assert!((tl.y - 0.5 * h / scale).abs() < EPSILON, "{vp:?}");
            assert!((br.x - 0.5 * w / scale).abs() < EPSILON, "{vp:?}");
            assert!((br.y + 0.5 * h / scale).abs() < EPSILON, "{vp:?}");
            assert_eq!(vp.to_screen(tl), Pixel::new(0, 0));
            assert_eq!(vp.to_screen(br), Pixel::new(vp.width as i32, vp.height as i32));
        }

        // concrete values for 800x600: half extents are 400/180 and 300/180
        let vp = Viewport::new(800, 600);
        let tl = vp.to_model(Pixel::new(0, 0));
        assert!((tl.x + 400.0 / 180.0).abs() < EPSILON);
        assert!((tl.y - 300.0 / 180.0).abs() < EPSILON);
        // 256x512: scale 76.8, so the top edge sits at y = 256 / 76.8
        let tl = Viewport::new(256, 512).to_model(Pixel::new(0, 0));
        assert!((tl.x + 128.0 / 76.8).abs() < 1e-9);
        assert!((tl.y - 256.0 / 76.8).abs() < 1e-9);
    }

    #[test]
    fn pixel_round_trip_is_exact() {
        for vp in [
            Viewport::new(512, 512),
            Viewport::new(256, 512),
            Viewport::new(800, 600),
            Viewport::new(801, 333),
        ] {
            for x in (-50..900).step_by(7) {
                for y in (-50..700).step_by(11) {
                    let p = Pixel::new(x, y);
                    assert_eq!(vp.to_screen(vp.to_model(p)), p, "viewport {vp:?}");
                }
            }
        }
    }

    #[test]
    fn affine_in_the_model_point() {
        let vp = Viewport::new(800, 600);
        let a = vp.to_screen(Point::new(0.5, 0.0));
        let b = vp.to_screen(Point::new(1.0, 0.0));
        let c = vp.to_screen(Point::new(0.0, 0.0));
        assert_eq!(b.x - c.x, 2 * (a.x - c.x));
    }

    #[test]
    fn doubling_the_viewport_doubles_the_scale() {
        let small = Viewport::new(256, 256);
        let big = Viewport::new(512, 512);
        assert!((big.scale() - 2.0 * small.scale()).abs() < EPSILON);
        let p = Point::new(0.625, -0.625);
        let s = small.to_screen(p);
        let b = big.to_screen(p);
        assert_eq!((b.x - 256, b.y - 256), (2 * (s.x - 128), 2 * (s.y - 128)));
    }
}
