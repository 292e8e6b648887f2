//! Unattended-run overrides: dialogs become log lines, console output and
//! uncaught errors are routed into the run's log buffer.

use super::js_error;
use crate::application::LogRouter;
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::log_capture::{CaughtError, ConsoleLevel};
use crate::domain::logging::LogComponent;
use crate::event_utils::{window_event_listener_with_options, EventOptions, WindowEventListenerHandle};
use crate::{log_debug, log_error};
use js_sys::{Array, Function, Reflect};
use serde_json::Value;
use std::rc::Rc;
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;
use web_sys::ErrorEvent;

const WRAPPED_MARKER: &str = "__gfxPerfHarnessWrapped";

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `alert` and `confirm` would block an unattended run.
pub fn install_dialog_hooks() -> BrowserResult<()> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::BrowserApiError("Window not available".to_string()))?;

    let alert = Closure::<dyn Fn(JsValue)>::new(|msg: JsValue| {
        log_error!(LogComponent::Infrastructure("Dialog"), "window.alert({})", describe(&msg));
    });
    let confirm = Closure::<dyn Fn(JsValue) -> bool>::new(|msg: JsValue| {
        log_error!(LogComponent::Infrastructure("Dialog"), "window.confirm({})", describe(&msg));
        true
    });

    Reflect::set(&window, &JsValue::from_str("alert"), &alert.into_js_value())
        .map_err(js_error("alert"))?;
    Reflect::set(&window, &JsValue::from_str("confirm"), &confirm.into_js_value())
        .map_err(js_error("confirm"))?;
    Ok(())
}

/// Convert console arguments to JSON, falling back to their debug text.
pub fn console_args_to_json(args: &Array) -> Vec<Value> {
    args.iter()
        .map(|arg| {
            if let Some(text) = arg.as_string() {
                return Value::String(text);
            }
            js_sys::JSON::stringify(&arg)
                .ok()
                .map(String::from)
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| Value::String(format!("{arg:?}")))
        })
        .collect()
}

/// Wrap `console.error`, `console.warn` and `console.log`. The original
/// function still runs after the record is routed.
pub fn install_console_hooks(router: Rc<LogRouter>) -> BrowserResult<bool> {
    let console = Reflect::get(&js_sys::global(), &JsValue::from_str("console"))
        .map_err(js_error("console"))?;
    if Reflect::has(&console, &JsValue::from_str(WRAPPED_MARKER)).map_err(js_error("console"))? {
        return Ok(false);
    }

    let factory = Function::new_with_args(
        "sink, original, target",
        "return function() { var args = Array.prototype.slice.call(arguments); \
         sink(args); return original.apply(target, args); };",
    );

    for level in ConsoleLevel::iter() {
        let Some(original) = super::function_property(&console, level.as_ref()) else {
            continue;
        };
        let router = Rc::clone(&router);
        let sink = Closure::<dyn Fn(Array)>::new(move |args: Array| {
            router.console(level, console_args_to_json(&args));
        });
        let wrapped = factory
            .call3(&JsValue::NULL, &sink.into_js_value(), &original, &console)
            .map_err(js_error("console wrapper"))?;
        Reflect::set(&console, &JsValue::from_str(level.as_ref()), &wrapped)
            .map_err(js_error(level.as_ref()))?;
    }

    Reflect::set(&console, &JsValue::from_str(WRAPPED_MARKER), &JsValue::TRUE)
        .map_err(js_error("console"))?;
    log_debug!(LogComponent::Infrastructure("Console"), "console hooks installed");
    Ok(true)
}

/// Collect uncaught page errors. Keep the handle alive for the page lifetime.
pub fn install_error_listener(router: Rc<LogRouter>) -> WindowEventListenerHandle {
    let options = EventOptions { passive: true, capture: false, once: false };
    window_event_listener_with_options("error", &options, move |event| {
        let Some(error_event) = event.dyn_ref::<ErrorEvent>() else {
            return;
        };
        let stack = Reflect::get(&error_event.error(), &JsValue::from_str("stack"))
            .ok()
            .and_then(|s| s.as_string());
        router.uncaught(CaughtError {
            message: error_event.message(),
            stack,
            lineno: error_event.lineno(),
            filename: error_event.filename(),
        });
    })
}
