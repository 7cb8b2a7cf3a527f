// What you SEE:
// • A B-spline fitted to one period of a sine wave, over a reference grid.
// • Purple curve, teal control polygon, blue control-point markers.
// • Hold Left Mouse on a marker and drag: the curve reshapes live.
// • S saves the current frame as a PNG. ESC quits.

mod config;
mod draw;
mod editor;
mod error;
mod mapper;
mod render;
mod samples;
mod spline;
mod types;

use config::Config;
use draw::Drawer;
use editor::Editor;
use error::Error;
use mapper::Viewport;
use spline::BSplineCurveFit;
use tracing::{debug, info, warn};
use types::FrameBuffer;

const TITLE: &str = "BSplineCurveInteractiveWindow";

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env();

    /* --- Fit the curve once ---
       The samples are only needed here; the editor owns the curve from now on. */
    let samples = samples::sine_wave();
    let curve = BSplineCurveFit::new(&samples, config.degree, config.num_controls)?;
    info!(
        samples = samples.len(),
        degree = curve.degree(),
        controls = curve.num_controls(),
        "curve fitted"
    );
    drop(samples);

    /* --- Window + editor ---
       Visual: window opens at the top-left corner showing the fitted curve. */
    let mut drawer = Drawer::new(TITLE, config.width, config.height)?;
    let (w, h) = drawer.size();
    let mut screen = FrameBuffer::new(w, h);
    let mut editor = Editor::new(curve, Viewport::new(w, h))
        .with_control_radius(config.control_radius)
        .with_curve_samples(config.curve_samples);

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow window resizes; the frame buffer always matches the window. */
        let (w, h) = drawer.size();
        if w == 0 || h == 0 {
            // minimized: nothing to draw into, keep the old frame and viewport
            drawer.pump();
            continue;
        }
        if (w, h) != (screen.width, screen.height) {
            screen = FrameBuffer::new(w, h);
            editor.resize(Viewport::new(w, h));
        }

        /* 2) Pointer input, in arrival order. */
        for event in drawer.poll_pointer() {
            editor.handle(event);
            debug!(?event, selection = ?editor.selection(), "pointer");
        }

        /* 3) Screenshot of whatever is on screen right now. */
        if drawer.screenshot_pressed() {
            match draw::save_png(&screen, &config.screenshot_path) {
                Ok(()) => info!(path = %config.screenshot_path.display(), "screenshot saved"),
                Err(e) => warn!(error = %e, "screenshot failed"),
            }
        }

        /* 4) Redraw only when something changed; otherwise just pump events. */
        if editor.take_redraw() {
            editor.on_display(&mut screen);
            drawer.present(&screen)?;
        } else {
            drawer.pump();
        }
    }

    info!("window closed");
    Ok(())
}
