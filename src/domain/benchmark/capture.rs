use crate::domain::errors::CaptureResult;

/// Encoded snapshot of the rendered surface at the final frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    /// `data:image/png;base64,...`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Extracts the rendered surface. Called at most once per run.
pub trait ReferenceCapture {
    fn capture(&self) -> CaptureResult<ReferenceImage>;
}

/// For runs that only care about timing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl ReferenceCapture for NoCapture {
    fn capture(&self) -> CaptureResult<ReferenceImage> {
        Err(crate::domain::errors::AppError::CaptureError("capture disabled".to_string()))
    }
}
