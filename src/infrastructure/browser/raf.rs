use super::js_error;
use crate::application::{AnimationLoopInterceptor, FrameCallback, FrameScheduler};
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::logging::LogComponent;
use crate::{log_error, log_info};
use js_sys::{Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Property under which the untouched primitive is kept.
const REAL_RAF: &str = "realRequestAnimationFrame";
const RAF: &str = "requestAnimationFrame";

/// Calls the browser's own `requestAnimationFrame`, never the hooked one.
pub struct BrowserFrameScheduler {
    window: web_sys::Window,
    native: Function,
}

impl BrowserFrameScheduler {
    /// Must be created before the hook is installed, or after it with the
    /// saved original still reachable as `realRequestAnimationFrame`.
    pub fn new() -> BrowserResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| AppError::BrowserApiError("Window not available".to_string()))?;
        let native = super::function_property(&window, REAL_RAF)
            .or_else(|| super::function_property(&window, RAF))
            .ok_or_else(|| AppError::BrowserApiError("requestAnimationFrame missing".to_string()))?;
        Ok(Self { window, native })
    }
}

impl FrameScheduler for BrowserFrameScheduler {
    fn request_native_frame(&self, callback: FrameCallback) -> i32 {
        let hooked = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.native.call1(&self.window, &hooked) {
            Ok(handle) => handle.as_f64().map(|h| h as i32).unwrap_or(0),
            Err(e) => {
                log_error!(LogComponent::Infrastructure("Raf"), "requestAnimationFrame failed: {:?}", e);
                0
            }
        }
    }
}

/// Replace `window.requestAnimationFrame` with the interceptor. Only the
/// first call per page has any effect.
pub fn install_animation_frame_hook(interceptor: Rc<AnimationLoopInterceptor>) -> BrowserResult<bool> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::BrowserApiError("Window not available".to_string()))?;

    let already_hooked =
        Reflect::has(&window, &JsValue::from_str(REAL_RAF)).map_err(js_error(REAL_RAF))?;
    if already_hooked || !interceptor.claim_installation() {
        return Ok(false);
    }

    let native = super::function_property(&window, RAF)
        .ok_or_else(|| AppError::BrowserApiError("requestAnimationFrame missing".to_string()))?;
    Reflect::set(&window, &JsValue::from_str(REAL_RAF), &native).map_err(js_error(REAL_RAF))?;

    let hook = Closure::<dyn Fn(Function) -> i32>::new(move |callback: Function| {
        interceptor.request_frame(Box::new(move |now: f64| {
            // An exception in the app's frame must not stop the tick.
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(now)) {
                log_error!(LogComponent::Infrastructure("Raf"), "frame callback threw: {:?}", e);
            }
        }))
    });
    Reflect::set(&window, &JsValue::from_str(RAF), &hook.into_js_value()).map_err(js_error(RAF))?;

    log_info!(LogComponent::Infrastructure("Raf"), "requestAnimationFrame hooked");
    Ok(true)
}
