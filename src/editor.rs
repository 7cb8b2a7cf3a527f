// Interactive control-point editing.
// The editor owns the curve for the life of the window. Pointer events drive a
// two-state machine: Idle until a press lands on a control marker, then
// Dragging(index) until release. Hit-tests run against the markers of the most
// recent frame, so what you click is what you saw.

use crate::draw::Surface;
use crate::mapper::Viewport;
use crate::render;
use crate::spline::BSplineCurveFit;
use crate::types::Pixel;
use tracing::{debug, trace};

pub const DEFAULT_CONTROL_RADIUS: i32 = 3;
pub const DEFAULT_CURVE_SAMPLES: usize = 100;

/// Pointer input in screen pixels, as delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Pixel),
    Move(Pixel),
    Up,
}

/// Which control point, if any, is grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Control point `index` follows the pointer until release.
    Dragging(usize),
}

pub struct Editor {
    curve: BSplineCurveFit,
    viewport: Viewport,
    selection: Selection,
    markers: Vec<Pixel>, // control screen positions as last rendered
    control_radius: i32,
    curve_samples: usize,
    needs_redraw: bool,
}

impl Editor {
    /// Take ownership of the fitted curve. The first frame is requested immediately.
    pub fn new(curve: BSplineCurveFit, viewport: Viewport) -> Self {
        let markers = render::control_markers(&curve, viewport);
        Self {
            curve,
            viewport,
            selection: Selection::Idle,
            markers,
            control_radius: DEFAULT_CONTROL_RADIUS,
            curve_samples: DEFAULT_CURVE_SAMPLES,
            needs_redraw: true,
        }
    }

    pub fn with_control_radius(mut self, radius: i32) -> Self {
        self.control_radius = radius;
        self
    }

    pub fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    #[cfg(test)]
    pub fn curve(&self) -> &BSplineCurveFit {
        &self.curve
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Control marker positions from the last frame.
    #[cfg(test)]
    pub fn markers(&self) -> &[Pixel] {
        &self.markers
    }

    /// True once per pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// The window changed size. Stored control points stay put in model space;
    /// only where they are drawn moves.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(width = viewport.width, height = viewport.height, "viewport resized");
            self.viewport = viewport;
            self.needs_redraw = true;
        }
    }

    /// Render a full frame and remember where the markers landed.
    pub fn on_display<S: Surface>(&mut self, surface: &mut S) {
        self.markers = render::render(
            surface,
            self.viewport,
            &self.curve,
            self.curve_samples,
            self.control_radius,
        );
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(p) => self.on_pointer_down(p),
            PointerEvent::Move(p) => self.on_pointer_move(p),
            PointerEvent::Up => self.on_pointer_up(),
        }
    }

    /// A press drops any previous grab, then grabs the lowest-index marker under it.
    pub fn on_pointer_down(&mut self, at: Pixel) {
        self.selection = match self.hit_test(at) {
            Some(index) => {
                let c = self.curve.control(index);
                debug!(index, x = c.x, y = c.y, "control point grabbed");
                Selection::Dragging(index)
            }
            None => Selection::Idle,
        };
        self.needs_redraw = true;
    }

    /// While dragging, the grabbed control point jumps to the pointer. Idle motion is ignored.
    pub fn on_pointer_move(&mut self, at: Pixel) {
        if let Selection::Dragging(index) = self.selection {
            let p = self.viewport.to_model(at);
            self.curve.set_control(index, p);
            trace!(index, x = p.x, y = p.y, "control point moved");
            self.needs_redraw = true;
        }
    }

    pub fn on_pointer_up(&mut self) {
        if let Selection::Dragging(index) = self.selection {
            debug!(index, "control point released");
        }
        self.selection = Selection::Idle;
        self.needs_redraw = true;
    }

    /// First marker (ascending index) whose square of half-size `control_radius` contains `at`.
    fn hit_test(&self, at: Pixel) -> Option<usize> {
        let r = self.control_radius;
        self.markers
            .iter()
            .position(|m| (m.x - at.x).abs() <= r && (m.y - at.y).abs() <= r)
    }
}
