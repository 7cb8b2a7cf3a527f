// Startup settings. Every value has a built-in default and an optional
// environment override; unparseable overrides fall back to the default.

use std::path::PathBuf;

pub const DEFAULT_WIDTH: usize = 512;
pub const DEFAULT_HEIGHT: usize = 512;
pub const DEFAULT_DEGREE: usize = 3;
pub const DEFAULT_CONTROLS: usize = 8;
pub const DEFAULT_SCREENSHOT: &str = "bspline.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub degree: usize,
    pub num_controls: usize,
    pub curve_samples: usize,
    pub control_radius: i32,
    pub screenshot_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            degree: DEFAULT_DEGREE,
            num_controls: DEFAULT_CONTROLS,
            curve_samples: crate::editor::DEFAULT_CURVE_SAMPLES,
            control_radius: crate::editor::DEFAULT_CONTROL_RADIUS,
            screenshot_path: PathBuf::from(DEFAULT_SCREENSHOT),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source (the process environment in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            width: parse_or(&lookup, "BSPLINE_WIDTH", d.width).max(1),
            height: parse_or(&lookup, "BSPLINE_HEIGHT", d.height).max(1),
            degree: parse_or(&lookup, "BSPLINE_DEGREE", d.degree),
            num_controls: parse_or(&lookup, "BSPLINE_CONTROLS", d.num_controls),
            curve_samples: parse_or(&lookup, "BSPLINE_CURVE_SAMPLES", d.curve_samples).max(2),
            control_radius: parse_or(&lookup, "BSPLINE_CONTROL_RADIUS", d.control_radius).max(0),
            screenshot_path: lookup("BSPLINE_SCREENSHOT").map_or(d.screenshot_path, PathBuf::from),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
