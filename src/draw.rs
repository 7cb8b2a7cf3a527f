// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the editor's frame buffer.
// 2) The three primitives the renderer needs: clear, thin line, thick pixel.
// 3) Left-mouse edge detection turned into pointer events for the editor.

use crate::editor::PointerEvent;
use crate::error::Error;
use crate::types::{FrameBuffer, Pixel};
use image::{Rgb, RgbImage};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::path::Path;

/// Drawing primitives supplied by the host. The renderer only talks to this.
pub trait Surface {
    fn clear(&mut self, color: u32);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32);
    /// Filled square of side `2 * radius + 1` centered on (x,y).
    fn draw_thick_pixel(&mut self, x: i32, y: i32, radius: i32, color: u32);
}

pub struct Drawer {
    window: Window,          // the on-screen window you see
    left_was_down: bool,     // button state at the previous poll
    last_pos: Option<Pixel>, // cursor at the previous poll
}

impl Drawer {
    /// Create a resizable window at the top-left of the desktop.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_position(0, 0);
        window.set_target_fps(60);
        Ok(Self { window, left_was_down: false, last_pos: None })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Process window events without presenting a new frame.
    pub fn pump(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// S writes the current frame to disk.
    pub fn screenshot_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    /// Live window size; re-read every call since the user can resize.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Pointer events since the last poll, in the order the editor must see them.
    /// Cursor positions are not clamped: a drag may leave the window.
    pub fn poll_pointer(&mut self) -> Vec<PointerEvent> {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Pixel::new(x.round() as i32, y.round() as i32));
        let down = self.window.get_mouse_down(MouseButton::Left);
        let events = pointer_transitions(self.left_was_down, self.last_pos, down, pos);

        self.left_was_down = down;
        if pos.is_some() {
            self.last_pos = pos;
        }
        events
    }
}

/// Edge detection between two polls of (button, cursor).
/// minifb only exposes the button level, so a press and release that both fall
/// between two polls (under one frame) are never seen and produce no events.
fn pointer_transitions(
    was_down: bool,
    last_pos: Option<Pixel>,
    down: bool,
    pos: Option<Pixel>,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    match pos {
        Some(p) if down && !was_down => events.push(PointerEvent::Down(p)),
        Some(p) if last_pos != Some(p) => events.push(PointerEvent::Move(p)),
        _ => {}
    }
    if was_down && !down {
        events.push(PointerEvent::Up);
    }
    events
}

/// Write the frame buffer as a PNG (0x00RRGGBB -> RGB8).
pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), Error> {
    let img = RgbImage::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let px = fb.pixels[y as usize * fb.width + x as usize];
        Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
    });
    img.save(path)?;
    Ok(())
}

/* ---------- Software drawing: pixels, lines, thick pixels ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

impl Surface for FrameBuffer {
    fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Bresenham; pixels outside the frame are skipped, not clipped geometrically.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (mut x0, mut y0) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            put_pixel(self, x0, y0, color);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    fn draw_thick_pixel(&mut self, x: i32, y: i32, radius: i32, color: u32) {
        for py in (y - radius)..=(y + radius) {
            for px in (x - radius)..=(x + radius) {
                put_pixel(self, px, py, color);
            }
        }
    }
}
