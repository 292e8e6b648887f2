/// Wall-clock time the page spent outside per-frame application work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdleTracker {
    accumulated_idle: f64,
    /// When the last tick handed control back to the host, if it has not
    /// been consumed by a pre-tick yet.
    handler_exited_at: Option<f64>,
}

impl IdleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outermost pre-tick: close the idle gap that started at the last exit.
    pub fn frame_entered(&mut self, now: f64) {
        if let Some(exited) = self.handler_exited_at.take() {
            let gap = now - exited;
            if gap.is_finite() && gap > 0.0 {
                self.accumulated_idle += gap;
            }
        }
    }

    pub fn handler_exited(&mut self, now: f64) {
        self.handler_exited_at = Some(now);
    }

    pub fn accumulated_idle(&self) -> f64 {
        self.accumulated_idle
    }
}
