use super::{function_property, js_error};
use crate::domain::benchmark::SeededRandom;
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::logging::LogComponent;
use crate::log_info;
use js_sys::Reflect;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

const REAL_RANDOM: &str = "realRandom";

/// Replace `Math.random` with a generator seeded from `seed`. The browser's
/// own generator stays reachable as `Math.realRandom`. Installing again
/// restarts the sequence from `seed`.
pub fn install_seeded_random(seed: u64) -> BrowserResult<()> {
    let math = Reflect::get(&js_sys::global(), &JsValue::from_str("Math")).map_err(js_error("Math"))?;
    if function_property(&math, REAL_RANDOM).is_none() {
        let original = function_property(&math, "random")
            .ok_or_else(|| AppError::BrowserApiError("Math.random missing".to_string()))?;
        Reflect::set(&math, &JsValue::from_str(REAL_RANDOM), &original)
            .map_err(js_error("Math.realRandom"))?;
    }

    let rng = RefCell::new(SeededRandom::new(seed));
    let random = Closure::<dyn Fn() -> f64>::new(move || rng.borrow_mut().next_f64());
    Reflect::set(&math, &JsValue::from_str("random"), &random.into_js_value())
        .map_err(js_error("Math.random"))?;

    log_info!(LogComponent::Infrastructure("Random"), "Math.random seeded with {}", seed);
    Ok(())
}
