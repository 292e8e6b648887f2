//! Capabilities the harness needs from its host. The browser bindings live in
//! `infrastructure::browser`; tests plug in in-memory versions.

use crate::domain::benchmark::BenchmarkReport;
use serde_json::Value;

/// Callback handed to the host's frame primitive; receives the host timestamp.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// The host's native "run this before the next repaint" primitive.
pub trait FrameScheduler {
    /// Returns the host's request handle.
    fn request_native_frame(&self, callback: FrameCallback) -> i32;
}

/// Outbound side of the collector connection.
pub trait ResultReporter {
    fn benchmark_started(&self, test_id: &str);
    fn forward_log(&self, args: Vec<Value>);
    fn benchmark_finished(&self, report: &BenchmarkReport);
    fn disconnect(&self);
}

/// Page-level effects of finishing or switching tests.
pub trait PageControl {
    fn show_finished(&self);
    fn navigate(&self, url: &str);
    fn close(&self);
}
