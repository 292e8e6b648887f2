/// Harness error taxonomy. Nothing here is fatal to a run; callers log and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Collector unreachable, socket closed, frame could not be sent
    TransportError(String),
    /// Reference image could not be extracted (tainted canvas, no canvas)
    CaptureError(String),
    /// Malformed query string or global config object
    ConfigError(String),
    /// Missing window/document/performance or a host hook refused to install
    BrowserApiError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::TransportError(msg) => write!(f, "Transport Error: {}", msg),
            AppError::CaptureError(msg) => write!(f, "Capture Error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
            AppError::BrowserApiError(msg) => write!(f, "Browser API Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AppError> for wasm_bindgen::JsValue {
    fn from(err: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type TransportResult<T> = Result<T, AppError>;
pub type CaptureResult<T> = Result<T, AppError>;
pub type BrowserResult<T> = Result<T, AppError>;
