//! Browser bootstrap and the small JS-facing API.

use super::overlay;
use crate::application::{Harness, HostPorts, ResultReporter};
use crate::config::{CollectorConfig, HarnessConfig};
use crate::domain::errors::{AppError, BrowserResult};
use crate::domain::logging::{GlobalLogger, LogComponent};
use crate::infrastructure::browser::host_hooks::{
    install_console_hooks, install_dialog_hooks, install_error_listener,
};
use crate::infrastructure::browser::page::apply_viewport;
use crate::infrastructure::browser::{
    install_animation_frame_hook, install_fake_time, install_seeded_random, BrowserFrameScheduler,
    BrowserPage, CanvasCapture, PerformanceClock, WebGlCanvasTracker,
};
use crate::infrastructure::websocket::CollectorClient;
use crate::{log_info, log_warn};
use futures::StreamExt;
use js_sys::Reflect;
use once_cell::unsync::OnceCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Global object the test server injects into every page.
const SERVER_CONFIG_GLOBAL: &str = "GFXPERFTEST_CONFIG";

thread_local! {
    static HARNESS: OnceCell<Rc<Harness>> = const { OnceCell::new() };
}

fn with_harness<T>(f: impl FnOnce(&Harness) -> T) -> Option<T> {
    HARNESS.with(|cell| cell.get().map(|harness| f(harness)))
}

fn read_harness_config() -> BrowserResult<HarnessConfig> {
    let window = web_sys::window()
        .ok_or_else(|| AppError::BrowserApiError("Window not available".to_string()))?;
    let search = window
        .location()
        .search()
        .map_err(|e| AppError::ConfigError(format!("location.search: {e:?}")))?;
    let params = web_sys::UrlSearchParams::new_with_str(&search)
        .map_err(|e| AppError::ConfigError(format!("query string: {e:?}")))?;
    Ok(HarnessConfig::from_lookup(|key| params.get(key)))
}

fn read_collector_config() -> CollectorConfig {
    let global = Reflect::get(&js_sys::global(), &JsValue::from_str(SERVER_CONFIG_GLOBAL))
        .ok()
        .filter(|value| value.is_object());
    let Some(global) = global else {
        log_warn!(
            LogComponent::Presentation("Boot"),
            "{} not defined, using defaults",
            SERVER_CONFIG_GLOBAL
        );
        return CollectorConfig::default();
    };
    let field = |name: &str| Reflect::get(&global, &JsValue::from_str(name)).ok();
    CollectorConfig::new(
        field("serverIP").and_then(|v| v.as_string()),
        field("test_id").and_then(|v| v.as_string()),
        field("sendLog").and_then(|v| v.as_bool()).unwrap_or(false),
    )
}

/// Wire the harness into the page. Safe to call more than once; later calls
/// are ignored.
pub fn boot() -> BrowserResult<()> {
    if with_harness(|_| ()).is_some() {
        return Ok(());
    }

    let config = read_harness_config()?;
    let collector = read_collector_config();

    let webgl_canvas = WebGlCanvasTracker::default();
    webgl_canvas.install()?;

    if let Some(progress) = config.progress {
        overlay::mount_progress_panel_on_load(progress);
    }
    if let Some(viewport) = config.viewport {
        apply_viewport(viewport)?;
    }
    if config.fake_webgl {
        log_info!(LogComponent::Presentation("Boot"), "fake-webgl requested");
    }

    let (client, mut inbound) = CollectorClient::connect(collector.collector_url());
    let reporter: Rc<dyn ResultReporter> = Rc::new(client);

    let harness = Rc::new(Harness::new(
        config.clone(),
        collector,
        HostPorts {
            clock: Rc::new(PerformanceClock::new()?),
            scheduler: Rc::new(BrowserFrameScheduler::new()?),
            reporter,
            page: Rc::new(BrowserPage::new(overlay::mount_finished_overlay)),
            capture: Box::new(CanvasCapture::new(webgl_canvas)),
            logger: Rc::new(GlobalLogger),
        },
    ));

    install_dialog_hooks()?;
    install_console_hooks(Rc::clone(harness.log_router()))?;
    install_error_listener(Rc::clone(harness.log_router())).forget();
    if config.override_time {
        install_fake_time(Rc::clone(harness.session()))?;
    }
    install_seeded_random(config.random_seed)?;
    install_animation_frame_hook(Rc::clone(harness.interceptor()))?;

    harness.start();

    {
        let harness = Rc::clone(&harness);
        wasm_bindgen_futures::spawn_local(async move {
            while let Some(event) = inbound.next().await {
                harness.handle_inbound(event);
            }
        });
    }

    HARNESS.with(|cell| {
        let _ = cell.set(harness);
    });
    Ok(())
}

/// Frames accepted so far.
#[wasm_bindgen]
pub fn reference_test_frame_number() -> u32 {
    with_harness(|h| h.session().borrow().frame_counter()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn num_frames_to_render() -> u32 {
    with_harness(|h| h.config().num_frames).unwrap_or(0)
}

/// The application's current notion of time, in milliseconds.
#[wasm_bindgen]
pub fn deterministic_time() -> f64 {
    with_harness(|h| h.session().borrow().deterministic_clock().now_ms()).unwrap_or(0.0)
}
