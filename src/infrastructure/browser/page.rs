use super::js_error;
use crate::application::PageControl;
use crate::config::Viewport;
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_error};
use js_sys::Reflect;
use wasm_bindgen::JsValue;

/// Page-level effects: finished banner, navigation, closing the tab.
pub struct BrowserPage {
    on_finished: Box<dyn Fn()>,
}

impl BrowserPage {
    pub fn new(on_finished: impl Fn() + 'static) -> Self {
        Self { on_finished: Box::new(on_finished) }
    }
}

impl PageControl for BrowserPage {
    fn show_finished(&self) {
        (self.on_finished)();
    }

    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().replace(url) {
            log_error!(LogComponent::Infrastructure("Page"), "navigation to {} failed: {:?}", url, e);
        }
    }

    fn close(&self) {
        if let Some(window) = web_sys::window() {
            // Scripts may only close windows they opened; failure is expected.
            if let Err(e) = window.close() {
                log_debug!(LogComponent::Infrastructure("Page"), "window.close refused: {:?}", e);
            }
        }
    }
}

/// Override `innerWidth`/`innerHeight` as seen by the application.
pub fn apply_viewport(viewport: Viewport) -> BrowserResult<()> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::BrowserApiError("Window not available".to_string()))?;
    Reflect::set(&window, &JsValue::from_str("innerWidth"), &JsValue::from(viewport.width))
        .map_err(js_error("innerWidth"))?;
    Reflect::set(&window, &JsValue::from_str("innerHeight"), &JsValue::from(viewport.height))
        .map_err(js_error("innerHeight"))?;
    Ok(())
}
