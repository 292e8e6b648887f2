//! Browser bindings for the harness ports, plus the host-primitive
//! overrides (frame scheduling, time, dialogs, console).

pub mod capture;
pub mod clock;
pub mod host_hooks;
pub mod page;
pub mod raf;
pub mod random;

use crate::domain::errors::AppError;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

pub use capture::{CanvasCapture, WebGlCanvasTracker};
pub use clock::{install_fake_time, PerformanceClock};
pub use page::BrowserPage;
pub use raf::{install_animation_frame_hook, BrowserFrameScheduler};
pub use random::install_seeded_random;

pub(crate) fn js_error(context: &str) -> impl Fn(JsValue) -> AppError + '_ {
    move |e| AppError::BrowserApiError(format!("{context}: {e:?}"))
}

pub(crate) fn function_property(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name)).ok()?.dyn_into::<Function>().ok()
}
