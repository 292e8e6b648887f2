use super::ports::{FrameCallback, FrameScheduler, PageControl, ResultReporter};
use crate::domain::benchmark::{BenchmarkReport, BenchmarkSession, TickOutcome, WallClock};
use crate::domain::logging::{LogComponent, LogLevel, Logger};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SharedSession = Rc<RefCell<BenchmarkSession>>;

/// What one hooked frame ended up doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameRun {
    /// Application callback ran, followed by the tick.
    Ran(TickOutcome),
    /// Target was reached: results were reported, callback skipped.
    Finished,
    /// Frames arriving after the report went out; nothing happens.
    AfterFinish,
}

/// Sits between the application and the host's frame primitive so every
/// frame is bracketed by pre-tick and tick, without the app's cooperation.
pub struct AnimationLoopInterceptor {
    session: SharedSession,
    scheduler: Rc<dyn FrameScheduler>,
    reporter: Rc<dyn ResultReporter>,
    page: Rc<dyn PageControl>,
    clock: Rc<dyn WallClock>,
    logger: Rc<dyn Logger>,
    installed: Cell<bool>,
}

const COMPONENT: LogComponent = LogComponent::Application("Interceptor");

impl AnimationLoopInterceptor {
    pub fn new(
        session: SharedSession,
        scheduler: Rc<dyn FrameScheduler>,
        reporter: Rc<dyn ResultReporter>,
        page: Rc<dyn PageControl>,
        clock: Rc<dyn WallClock>,
        logger: Rc<dyn Logger>,
    ) -> Self {
        Self { session, scheduler, reporter, page, clock, logger, installed: Cell::new(false) }
    }

    /// True only for the first caller; the host primitive is wrapped once.
    pub fn claim_installation(&self) -> bool {
        !self.installed.replace(true)
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    /// Replacement for the application's `requestAnimationFrame`.
    pub fn request_frame(self: &Rc<Self>, callback: FrameCallback) -> i32 {
        let this = Rc::clone(self);
        self.scheduler.request_native_frame(Box::new(move |_host_time| {
            this.run_frame(callback);
        }))
    }

    /// Body of the hooked callback. No session borrow is held while the
    /// application callback runs, so it may itself run frames.
    pub fn run_frame(&self, callback: FrameCallback) -> FrameRun {
        let finished = {
            let mut session = self.session.borrow_mut();
            session.pre_tick();
            session.target_reached().then(|| session.finish())
        };

        match finished {
            Some(Some(report)) => {
                self.complete(&report);
                return FrameRun::Finished;
            }
            Some(None) => return FrameRun::AfterFinish,
            None => {}
        }

        callback(self.clock.now());

        let mut session = self.session.borrow_mut();
        let outcome = session.tick();
        session.post_tick();
        FrameRun::Ran(outcome)
    }

    fn complete(&self, report: &BenchmarkReport) {
        self.page.show_finished();
        self.reporter.benchmark_finished(report);
        let summary = serde_json::to_string(report).unwrap_or_default();
        self.logger.log_with_metadata(LogLevel::Info, COMPONENT, "Finished!", &summary);
        self.reporter.disconnect();
        self.page.close();
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }
}
