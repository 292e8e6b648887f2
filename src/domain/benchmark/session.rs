use super::capture::{ReferenceCapture, ReferenceImage};
use super::clock::{DeterministicClock, WallClock, DEFAULT_UNIT_MS};
use super::guard::Depth;
use super::idle::IdleTracker;
use super::report::{average_fps, percentage, BenchmarkReport, TestResult};
use super::stats::PerfStats;
use super::stutter::{FrameClass, StutterThresholds};
use super::tick::{FrameTickController, Phase, TickOutcome};
use crate::domain::log_capture::SharedLogBuffer;
use crate::domain::logging::{LogComponent, LogLevel, Logger};
use crate::time_utils::format_duration_ms;
use std::rc::Rc;

/// Per-run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSettings {
    pub test_id: String,
    pub num_frames: u32,
    pub thresholds: StutterThresholds,
    pub clock_seed: u64,
    pub time_unit_ms: f64,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            test_id: String::new(),
            num_frames: 100,
            thresholds: StutterThresholds::default(),
            clock_seed: 0,
            time_unit_ms: DEFAULT_UNIT_MS,
        }
    }
}

/// Host capabilities a session needs.
pub struct SessionPorts {
    pub clock: Rc<dyn WallClock>,
    pub capture: Box<dyn ReferenceCapture>,
    pub logger: Rc<dyn Logger>,
    pub logs: SharedLogBuffer,
}

/// All measurement state for one page load.
pub struct BenchmarkSession {
    test_id: String,
    controller: FrameTickController,
    idle: IdleTracker,
    stats: PerfStats,
    clock: Rc<dyn WallClock>,
    capture: Box<dyn ReferenceCapture>,
    logger: Rc<dyn Logger>,
    logs: SharedLogBuffer,
    page_init_time: f64,
    page_load_time: Option<f64>,
    reference_image: Option<ReferenceImage>,
    time_generating_reference_images: f64,
    report_built: bool,
}

const COMPONENT: LogComponent = LogComponent::Domain("Session");

impl BenchmarkSession {
    pub fn new(settings: BenchmarkSettings, ports: SessionPorts) -> Self {
        let page_init_time = ports.clock.now();
        let clock = DeterministicClock::with_unit(settings.clock_seed, settings.time_unit_ms);
        Self {
            test_id: settings.test_id,
            controller: FrameTickController::new(settings.num_frames, settings.thresholds, clock),
            idle: IdleTracker::new(),
            stats: PerfStats::new(),
            clock: ports.clock,
            capture: ports.capture,
            logger: ports.logger,
            logs: ports.logs,
            page_init_time,
            page_load_time: None,
            reference_image: None,
            time_generating_reference_images: 0.0,
            report_built: false,
        }
    }

    /// Runs before the application's frame callback.
    pub fn pre_tick(&mut self) -> Depth {
        let depth = self.controller.enter();
        if depth == Depth::Outermost {
            let now = self.clock.now();
            self.stats.frame_start(now);
            if self.page_load_time.is_none() {
                self.page_load_time = Some(now - self.page_init_time);
            }
            self.idle.frame_entered(now);
        }
        depth
    }

    pub fn target_reached(&self) -> bool {
        self.controller.is_completed()
    }

    /// Runs after the application's frame callback.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let outcome = self.controller.tick(now);
        match outcome {
            TickOutcome::Nested => return outcome,
            TickOutcome::AlreadyCompleted => {}
            TickOutcome::Counted(tick) => {
                if tick.frame == 1 {
                    self.logger.info(
                        COMPONENT,
                        &format!("First frame submitted at (ms): {}", now - self.page_init_time),
                    );
                }
                if tick.class == Some(FrameClass::BecameSmooth) {
                    if let Some(elapsed) = self.controller.time_to_smooth() {
                        self.logger.info(COMPONENT, &format!("timeUntilSmoothFramerate {elapsed}"));
                    }
                }
                if tick.completed {
                    self.capture_reference();
                }
            }
        }
        // The application is assumed idle until the next pre-tick.
        self.idle.handler_exited(self.clock.now());
        outcome
    }

    pub fn post_tick(&mut self) {
        if self.controller.guard_idle() {
            self.stats.frame_end(self.clock.now());
        }
    }

    fn capture_reference(&mut self) {
        let started = self.clock.now();
        match self.capture.capture() {
            Ok(image) => {
                self.logger.debug(
                    COMPONENT,
                    &format!("Reference image captured ({}x{})", image.width, image.height),
                );
                self.reference_image = Some(image);
            }
            Err(e) => {
                self.logger.warn(COMPONENT, &format!("Reference image unavailable: {e}"));
            }
        }
        self.time_generating_reference_images += self.clock.now() - started;
    }

    /// Called by the frame after the target was reached. Leaves the guard
    /// balanced and yields the report the first time only.
    pub fn finish(&mut self) -> Option<BenchmarkReport> {
        self.controller.release();
        if self.report_built {
            return None;
        }
        self.report_built = true;

        let time_end = self.clock.now();
        let first_frame = self.controller.first_frame_time();
        let total_time = time_end - self.page_init_time;
        let total_render_time = first_frame.map(|first| time_end - first).unwrap_or(0.0);
        let num_frames = self.controller.target_frames();
        let cpu_idle_time = self.idle.accumulated_idle();

        self.logger.log_with_metadata(
            LogLevel::Debug,
            COMPONENT,
            "Time spent generating reference images",
            &format!("{{\"ms\":{}}}", self.time_generating_reference_images),
        );
        self.logger.info(
            COMPONENT,
            &format!("Rendered {} frames in {}", num_frames, format_duration_ms(total_render_time)),
        );

        Some(BenchmarkReport {
            test_id: self.test_id.clone(),
            values: self.stats.summary(),
            num_frames,
            total_time,
            time_to_first_frame: first_frame.map(|first| first - self.page_init_time).unwrap_or(0.0),
            logs: self.logs.borrow().clone(),
            avg_fps: average_fps(num_frames, total_render_time),
            num_stutter_events: self.controller.stutter_events(),
            result: TestResult::Pass,
            total_render_time,
            cpu_time: self.stats.total_time_in_main_loop(),
            cpu_idle_time,
            cpu_idle_perc: percentage(cpu_idle_time, total_render_time),
            page_load_time: self.page_load_time,
            time_to_smooth_framerate: self.controller.time_to_smooth(),
            reference_image_captured: self.reference_image.is_some(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn frame_counter(&self) -> u32 {
        self.controller.frame_counter()
    }

    pub fn target_frames(&self) -> u32 {
        self.controller.target_frames()
    }

    pub fn deterministic_clock(&self) -> &DeterministicClock {
        self.controller.clock()
    }

    pub fn controller(&self) -> &FrameTickController {
        &self.controller
    }

    pub fn accumulated_idle(&self) -> f64 {
        self.idle.accumulated_idle()
    }

    pub fn page_load_time(&self) -> Option<f64> {
        self.page_load_time
    }

    pub fn reference_image(&self) -> Option<&ReferenceImage> {
        self.reference_image.as_ref()
    }

    pub fn time_generating_reference_images(&self) -> f64 {
        self.time_generating_reference_images
    }

    pub fn stats(&self) -> &PerfStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.report_built
    }
}
