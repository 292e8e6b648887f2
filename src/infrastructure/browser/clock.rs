use super::{function_property, js_error};
use crate::application::SharedSession;
use crate::domain::benchmark::WallClock;
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::logging::LogComponent;
use crate::log_info;
use js_sys::{Function, Reflect};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Where the untouched `now` functions are kept once fake time is installed.
const REAL_NOW: &str = "realNow";

fn date_constructor() -> BrowserResult<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str("Date")).map_err(js_error("Date"))
}

/// `performance.realNow()` when present, otherwise `performance.now()`.
pub struct PerformanceClock {
    performance: web_sys::Performance,
    now_fn: Function,
}

impl PerformanceClock {
    pub fn new() -> BrowserResult<Self> {
        let performance = web_sys::window()
            .and_then(|w| w.performance())
            .ok_or_else(|| AppError::BrowserApiError("performance not available".to_string()))?;
        let now_fn = function_property(&performance, REAL_NOW)
            .or_else(|| function_property(&performance, "now"))
            .ok_or_else(|| AppError::BrowserApiError("performance.now missing".to_string()))?;
        Ok(Self { performance, now_fn })
    }
}

impl WallClock for PerformanceClock {
    fn now(&self) -> f64 {
        self.now_fn.call0(&self.performance).ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

/// Real `Date.now()`, bypassing fake time.
pub fn real_date_now() -> f64 {
    date_constructor()
        .ok()
        .and_then(|date| {
            let now = function_property(&date, REAL_NOW).or_else(|| function_property(&date, "now"))?;
            now.call0(&date).ok()?.as_f64()
        })
        .unwrap_or(0.0)
}

/// Point `performance.now()` and `Date.now()` at the session's deterministic
/// clock. Returns `false` when fake time is already in place.
pub fn install_fake_time(session: SharedSession) -> BrowserResult<bool> {
    let performance = web_sys::window()
        .and_then(|w| w.performance())
        .ok_or_else(|| AppError::BrowserApiError("performance not available".to_string()))?;
    let performance: JsValue = performance.into();
    if function_property(&performance, REAL_NOW).is_some() {
        return Ok(false);
    }

    let date = date_constructor()?;
    let original_perf_now = function_property(&performance, "now")
        .ok_or_else(|| AppError::BrowserApiError("performance.now missing".to_string()))?;
    let original_date_now = function_property(&date, "now")
        .ok_or_else(|| AppError::BrowserApiError("Date.now missing".to_string()))?;
    let epoch_at_install = original_date_now.call0(&date).ok().and_then(|v| v.as_f64()).unwrap_or(0.0);

    Reflect::set(&performance, &JsValue::from_str(REAL_NOW), &original_perf_now.bind(&performance))
        .map_err(js_error("performance.realNow"))?;
    Reflect::set(&date, &JsValue::from_str(REAL_NOW), &original_date_now.bind(&date))
        .map_err(js_error("Date.realNow"))?;

    // Last value seen, served while the session is mutably borrowed.
    let last = Rc::new(Cell::new(0.0));
    let fake_now = {
        let session = Rc::clone(&session);
        let last = Rc::clone(&last);
        move || -> f64 {
            if let Ok(session) = session.try_borrow() {
                last.set(session.deterministic_clock().now_ms());
            }
            last.get()
        }
    };

    let perf_now = {
        let fake_now = fake_now.clone();
        Closure::<dyn Fn() -> f64>::new(fake_now)
    };
    let date_now = Closure::<dyn Fn() -> f64>::new(move || epoch_at_install + fake_now());

    Reflect::set(&performance, &JsValue::from_str("now"), &perf_now.into_js_value())
        .map_err(js_error("performance.now"))?;
    Reflect::set(&date, &JsValue::from_str("now"), &date_now.into_js_value())
        .map_err(js_error("Date.now"))?;

    log_info!(LogComponent::Infrastructure("FakeTime"), "Deterministic time installed");
    Ok(true)
}
