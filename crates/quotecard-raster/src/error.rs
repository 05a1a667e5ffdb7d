use core::fmt;

/// Export pipeline failure.
///
/// Background-image decode failures are not represented here: they
/// degrade to "no background image" inside the pipeline and never
/// surface to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The raster surface could not be allocated for the requested
    /// canvas size.
    SurfaceUnavailable { width: u32, height: u32 },
    /// PNG encoding failed; no partial output is produced.
    EncodeFailed(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable { width, height } => {
                write!(f, "raster surface unavailable for {}x{}", width, height)
            }
            Self::EncodeFailed(reason) => write!(f, "png encode failed: {}", reason),
        }
    }
}

impl std::error::Error for RenderError {}
