use super::ports::ResultReporter;
use crate::domain::log_capture::{CaughtError, ConsoleLevel, SharedLogBuffer};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Where intercepted console output goes: into the run's log buffer, and to
/// the collector when forwarding is switched on.
pub struct LogRouter {
    buffer: SharedLogBuffer,
    forward_to: Option<Rc<dyn ResultReporter>>,
    /// Set while a record is being forwarded. Anything the reporter itself
    /// prints lands back here through the hooked console and must not be
    /// forwarded again.
    forwarding: Cell<bool>,
}

impl LogRouter {
    pub fn new(buffer: SharedLogBuffer, forward_to: Option<Rc<dyn ResultReporter>>) -> Self {
        Self { buffer, forward_to, forwarding: Cell::new(false) }
    }

    pub fn console(&self, level: ConsoleLevel, args: Vec<Value>) {
        if let Some(reporter) = &self.forward_to {
            if !self.forwarding.replace(true) {
                reporter.forward_log(args.clone());
                self.forwarding.set(false);
            }
        }
        self.buffer.borrow_mut().record(level, args);
    }

    pub fn uncaught(&self, error: CaughtError) {
        self.buffer.borrow_mut().record_uncaught(error);
    }

    pub fn buffer(&self) -> &SharedLogBuffer {
        &self.buffer
    }

    pub fn forwards(&self) -> bool {
        self.forward_to.is_some()
    }
}
