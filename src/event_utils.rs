use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Owns the listener closure; dropping it without `forget` leaves a
/// dangling callback in the page.
pub struct WindowEventListenerHandle {
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowEventListenerHandle {
    /// Keep the listener for the rest of the page's life.
    pub fn forget(self) {
        self.callback.forget();
    }
}

pub fn window_event_listener_with_options(
    event_name: &str,
    options: &EventOptions,
    mut cb: impl FnMut(Event) + 'static,
) -> WindowEventListenerHandle {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev);
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowEventListenerHandle { callback }
}
