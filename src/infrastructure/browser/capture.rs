use super::{function_property, js_error};
use crate::domain::benchmark::{ReferenceCapture, ReferenceImage};
use crate::domain::errors::{AppError, BrowserResult, CaptureResult};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use js_sys::{Function, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

const REAL_GET_CONTEXT: &str = "realGetContext";
const WEBGL_CONTEXT_TYPES: [&str; 3] = ["webgl", "webgl2", "experimental-webgl"];

pub fn is_webgl_context_type(kind: &str) -> bool {
    WEBGL_CONTEXT_TYPES.contains(&kind)
}

/// Remembers the first canvas the page asks a WebGL context from, so the
/// reference image comes from the rendering surface and not from a HUD or
/// overlay canvas placed before it.
#[derive(Clone, Default)]
pub struct WebGlCanvasTracker {
    canvas: Rc<RefCell<Option<HtmlCanvasElement>>>,
}

impl WebGlCanvasTracker {
    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.canvas.borrow().clone()
    }

    /// Wrap `HTMLCanvasElement.prototype.getContext`. Returns `false` when a
    /// tracker is already installed on this page.
    pub fn install(&self) -> BrowserResult<bool> {
        let prototype = Reflect::get(&js_sys::global(), &JsValue::from_str("HTMLCanvasElement"))
            .and_then(|class| Reflect::get(&class, &JsValue::from_str("prototype")))
            .map_err(js_error("HTMLCanvasElement.prototype"))?;
        if function_property(&prototype, REAL_GET_CONTEXT).is_some() {
            return Ok(false);
        }
        let original = function_property(&prototype, "getContext")
            .ok_or_else(|| AppError::BrowserApiError("getContext missing".to_string()))?;
        Reflect::set(&prototype, &JsValue::from_str(REAL_GET_CONTEXT), &original)
            .map_err(js_error("realGetContext"))?;

        let slot = Rc::clone(&self.canvas);
        let hook = Closure::<dyn Fn(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
            move |this: JsValue, kind: JsValue, attributes: JsValue| {
                let context = original.call2(&this, &kind, &attributes)?;
                let webgl = kind.as_string().is_some_and(|k| is_webgl_context_type(&k));
                if webgl && !context.is_null() && slot.borrow().is_none() {
                    if let Ok(canvas) = this.dyn_into::<HtmlCanvasElement>() {
                        log_debug!(LogComponent::Infrastructure("Capture"), "WebGL canvas found");
                        *slot.borrow_mut() = Some(canvas);
                    }
                }
                Ok(context)
            },
        );

        // Closures cannot see `this`, so a small trampoline passes it in.
        let trampoline = Function::new_with_args(
            "hook",
            "return function (type, attributes) { return hook(this, type, attributes); };",
        );
        let wrapped = trampoline
            .call1(&JsValue::NULL, &hook.into_js_value())
            .map_err(js_error("getContext trampoline"))?;
        Reflect::set(&prototype, &JsValue::from_str("getContext"), &wrapped)
            .map_err(js_error("getContext"))?;
        Ok(true)
    }
}

/// Reads the WebGL canvas back as a PNG data URL. Falls back to the first
/// element matching the selector when no WebGL context was ever created.
pub struct CanvasCapture {
    tracker: WebGlCanvasTracker,
    selector: String,
}

impl CanvasCapture {
    pub fn new(tracker: WebGlCanvasTracker) -> Self {
        Self { tracker, selector: "canvas".to_string() }
    }

    fn fallback_canvas(&self) -> CaptureResult<HtmlCanvasElement> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| AppError::CaptureError("document not available".to_string()))?;
        document
            .query_selector(&self.selector)
            .map_err(|e| AppError::CaptureError(format!("bad selector: {e:?}")))?
            .ok_or_else(|| AppError::CaptureError(format!("no element for {}", self.selector)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::CaptureError(format!("{} is not a canvas", self.selector)))
    }

    fn canvas(&self) -> CaptureResult<HtmlCanvasElement> {
        match self.tracker.canvas() {
            Some(canvas) => Ok(canvas),
            None => self.fallback_canvas(),
        }
    }
}

impl ReferenceCapture for CanvasCapture {
    fn capture(&self) -> CaptureResult<ReferenceImage> {
        let canvas = self.canvas()?;
        // Throws SecurityError on a tainted (cross-origin) canvas.
        let data_url = canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| AppError::CaptureError(format!("toDataURL failed: {e:?}")))?;
        Ok(ReferenceImage { data_url, width: canvas.width(), height: canvas.height() })
    }
}
