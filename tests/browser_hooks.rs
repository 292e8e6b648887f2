#![cfg(target_arch = "wasm32")]

use gfx_perf_harness::application::{AnimationLoopInterceptor, SharedSession};
use gfx_perf_harness::domain::benchmark::{
    BenchmarkSession, BenchmarkSettings, NoCapture, ReferenceCapture, SessionPorts, WallClock,
    DEFAULT_UNIT_MS,
};
use gfx_perf_harness::domain::log_capture::LogBuffer;
use gfx_perf_harness::domain::logging::GlobalLogger;
use gfx_perf_harness::infrastructure::browser::host_hooks::console_args_to_json;
use gfx_perf_harness::infrastructure::browser::{
    install_animation_frame_hook, install_fake_time, install_seeded_random, BrowserFrameScheduler,
    CanvasCapture, PerformanceClock, WebGlCanvasTracker,
};
use gfx_perf_harness::infrastructure::websocket::CollectorClient;
use js_sys::{Array, Function, Reflect};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn browser_session() -> SharedSession {
    Rc::new(RefCell::new(BenchmarkSession::new(
        BenchmarkSettings { num_frames: 5, ..Default::default() },
        SessionPorts {
            clock: Rc::new(PerformanceClock::new().unwrap()),
            capture: Box::new(NoCapture),
            logger: Rc::new(GlobalLogger),
            logs: LogBuffer::shared(),
        },
    )))
}

fn performance_now() -> f64 {
    web_sys::window().unwrap().performance().unwrap().now()
}

#[wasm_bindgen_test]
fn performance_clock_moves_forward() {
    let clock = PerformanceClock::new().unwrap();
    let a = clock.now();
    let b = clock.now();
    assert!(a >= 0.0);
    assert!(b >= a);
}

#[wasm_bindgen_test]
fn console_arguments_become_json() {
    let args = Array::new();
    args.push(&JsValue::from_str("frame"));
    args.push(&JsValue::from_f64(3.0));
    args.push(&JsValue::TRUE);
    assert_eq!(console_args_to_json(&args), vec![json!("frame"), json!(3.0), json!(true)]);
}

#[wasm_bindgen_test]
fn fake_time_follows_the_frame_counter() {
    let session = browser_session();
    assert!(install_fake_time(Rc::clone(&session)).unwrap());
    assert!(!install_fake_time(Rc::clone(&session)).unwrap());

    assert_eq!(performance_now(), 0.0);
    {
        let mut s = session.borrow_mut();
        s.pre_tick();
        s.tick();
        s.post_tick();
    }
    assert_eq!(performance_now(), DEFAULT_UNIT_MS);

    // The harness itself keeps reading real time.
    assert!(PerformanceClock::new().unwrap().now() > DEFAULT_UNIT_MS);
}

#[wasm_bindgen_test]
fn animation_frame_hook_installs_once() {
    let session = browser_session();
    let scheduler = Rc::new(BrowserFrameScheduler::new().unwrap());
    let (client, _inbound) = CollectorClient::connect("ws://127.0.0.1:1".to_string());
    let interceptor = Rc::new(AnimationLoopInterceptor::new(
        session,
        scheduler,
        Rc::new(client),
        Rc::new(gfx_perf_harness::infrastructure::browser::BrowserPage::new(|| {})),
        Rc::new(PerformanceClock::new().unwrap()),
        Rc::new(GlobalLogger),
    ));

    assert!(install_animation_frame_hook(Rc::clone(&interceptor)).unwrap());
    assert!(!install_animation_frame_hook(Rc::clone(&interceptor)).unwrap());
    let window = web_sys::window().unwrap();
    assert!(Reflect::has(&window, &JsValue::from_str("realRequestAnimationFrame")).unwrap());
}

fn math() -> JsValue {
    Reflect::get(&js_sys::global(), &JsValue::from_str("Math")).unwrap()
}

fn math_random_draws(n: usize) -> Vec<f64> {
    let random: Function = Reflect::get(&math(), &JsValue::from_str("random")).unwrap().unchecked_into();
    (0..n).map(|_| random.call0(&math()).unwrap().as_f64().unwrap()).collect()
}

#[wasm_bindgen_test]
fn seeded_random_repeats_after_reinstall() {
    install_seeded_random(1).unwrap();
    let first = math_random_draws(8);
    install_seeded_random(1).unwrap();
    let second = math_random_draws(8);

    assert_eq!(first, second);
    assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
    assert!(Reflect::has(&math(), &JsValue::from_str("realRandom")).unwrap());
}

fn detached_canvas(width: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(width);
    canvas.set_height(8);
    canvas
}

#[wasm_bindgen_test]
fn capture_prefers_the_webgl_canvas() {
    let tracker = WebGlCanvasTracker::default();
    assert!(tracker.install().unwrap());
    assert!(!WebGlCanvasTracker::default().install().unwrap());

    let hud = detached_canvas(11);
    assert!(hud.get_context("2d").unwrap().is_some());
    assert!(tracker.canvas().is_none());

    let scene = detached_canvas(22);
    if scene.get_context("webgl").unwrap().is_none() {
        // Browser without WebGL; nothing to track.
        return;
    }
    assert_eq!(tracker.canvas().map(|c| c.width()), Some(22));

    let image = CanvasCapture::new(tracker).capture().unwrap();
    assert_eq!(image.width, 22);
    assert!(image.data_url.starts_with("data:image/png"));
}
