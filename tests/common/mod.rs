#![allow(dead_code)]

use gfx_perf_harness::application::{FrameCallback, FrameScheduler, PageControl, ResultReporter};
use gfx_perf_harness::domain::benchmark::{
    BenchmarkReport, BenchmarkSession, BenchmarkSettings, ReferenceCapture, ReferenceImage,
    SessionPorts, WallClock,
};
use gfx_perf_harness::domain::errors::{AppError, CaptureResult};
use gfx_perf_harness::domain::log_capture::{LogBuffer, SharedLogBuffer};
use gfx_perf_harness::domain::logging::{LogEntry, LogLevel, Logger};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Wall clock moved by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Default)]
pub struct MemoryLogger {
    pub entries: RefCell<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        self.entries.borrow_mut().push((entry.level, entry.message));
    }
}

/// Frame callbacks queue up until the test runs them.
#[derive(Default)]
pub struct QueueScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
    next_id: Cell<i32>,
}

impl QueueScheduler {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn run_next(&self, host_time: f64) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(callback) => {
                callback(host_time);
                true
            }
            None => false,
        }
    }
}

impl FrameScheduler for QueueScheduler {
    fn request_native_frame(&self, callback: FrameCallback) -> i32 {
        self.queue.borrow_mut().push_back(callback);
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub started: RefCell<Vec<String>>,
    pub logs: RefCell<Vec<Vec<Value>>>,
    pub finished: RefCell<Vec<BenchmarkReport>>,
    pub disconnects: Cell<u32>,
}

impl ResultReporter for RecordingReporter {
    fn benchmark_started(&self, test_id: &str) {
        self.started.borrow_mut().push(test_id.to_string());
    }

    fn forward_log(&self, args: Vec<Value>) {
        self.logs.borrow_mut().push(args);
    }

    fn benchmark_finished(&self, report: &BenchmarkReport) {
        self.finished.borrow_mut().push(report.clone());
    }

    fn disconnect(&self) {
        self.disconnects.set(self.disconnects.get() + 1);
    }
}

#[derive(Default)]
pub struct RecordingPage {
    pub finished_shown: Cell<u32>,
    pub navigations: RefCell<Vec<String>>,
    pub closes: Cell<u32>,
}

impl PageControl for RecordingPage {
    fn show_finished(&self) {
        self.finished_shown.set(self.finished_shown.get() + 1);
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn close(&self) {
        self.closes.set(self.closes.get() + 1);
    }
}

pub struct FixedCapture;

impl ReferenceCapture for FixedCapture {
    fn capture(&self) -> CaptureResult<ReferenceImage> {
        Ok(ReferenceImage { data_url: "data:image/png;base64,AAAA".to_string(), width: 4, height: 2 })
    }
}

pub struct FailingCapture;

impl ReferenceCapture for FailingCapture {
    fn capture(&self) -> CaptureResult<ReferenceImage> {
        Err(AppError::CaptureError("no canvas".to_string()))
    }
}

pub struct SessionFixture {
    pub clock: ManualClock,
    pub logger: Rc<MemoryLogger>,
    pub logs: SharedLogBuffer,
    pub session: BenchmarkSession,
}

pub fn session_with(num_frames: u32, capture: Box<dyn ReferenceCapture>) -> SessionFixture {
    let clock = ManualClock::default();
    let logger = Rc::new(MemoryLogger::default());
    let logs = LogBuffer::shared();
    let session = BenchmarkSession::new(
        BenchmarkSettings { test_id: "unit".to_string(), num_frames, ..Default::default() },
        SessionPorts {
            clock: Rc::new(clock.clone()),
            capture,
            logger: logger.clone(),
            logs: Rc::clone(&logs),
        },
    );
    SessionFixture { clock, logger, logs, session }
}

impl SessionFixture {
    /// One outermost frame: pre-tick at `start`, tick and post-tick at `end`.
    pub fn frame(&mut self, start: f64, end: f64) {
        self.clock.set(start);
        self.session.pre_tick();
        self.clock.set(end);
        self.session.tick();
        self.session.post_tick();
    }
}
