// Every variant states *where* things went wrong.
use crate::spline::FitError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),
    /// Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),
    /// The curve could not be fitted to the samples (fatal at startup)
    #[error("curve fit error: {0}")]
    Fit(#[from] FitError),
    /// Writing the screenshot PNG failed
    #[error("screenshot error: {0}")]
    Screenshot(#[from] image::ImageError),
}
