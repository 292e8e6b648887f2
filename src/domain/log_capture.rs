use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use strum::{AsRefStr, EnumIter};

/// Console method a record was written through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ConsoleLevel {
    Error,
    Warn,
    Log,
}

/// Uncaught error reported by the page's global `error` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaughtError {
    pub message: String,
    pub stack: Option<String>,
    pub lineno: u32,
    pub filename: String,
}

/// Everything the page complained about during the run; shipped in the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBuffer {
    pub errors: Vec<Vec<Value>>,
    pub warnings: Vec<Vec<Value>>,
    pub catch_errors: Vec<CaughtError>,
}

pub type SharedLogBuffer = Rc<RefCell<LogBuffer>>;

impl LogBuffer {
    pub fn shared() -> SharedLogBuffer {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Plain `log` calls are forwarded but not retained.
    pub fn record(&mut self, level: ConsoleLevel, args: Vec<Value>) {
        match level {
            ConsoleLevel::Error => self.errors.push(args),
            ConsoleLevel::Warn => self.warnings.push(args),
            ConsoleLevel::Log => {}
        }
    }

    pub fn record_uncaught(&mut self, error: CaughtError) {
        self.catch_errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.catch_errors.is_empty()
    }
}
