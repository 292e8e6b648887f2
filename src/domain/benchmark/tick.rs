use super::clock::DeterministicClock;
use super::guard::{Depth, ReentrancyGuard};
use super::stutter::{FrameClass, SmoothStreak, StutterDetector, StutterThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstFrame,
    Running,
    Completed,
}

/// What a single accepted tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub frame: u32,
    /// `None` during warm-up or when there is no previous sample to compare with.
    pub class: Option<FrameClass>,
    pub duration: Option<f64>,
    /// This tick reached the target frame count.
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Inner call of a recursive burst, nothing recorded.
    Nested,
    /// Target already reached; the counter does not move past it.
    AlreadyCompleted,
    Counted(FrameTick),
}

/// Counts frames, drives the deterministic clock and classifies stutter.
#[derive(Debug, Clone)]
pub struct FrameTickController {
    target_frames: u32,
    phase: Phase,
    frame_counter: u32,
    clock: DeterministicClock,
    guard: ReentrancyGuard,
    detector: StutterDetector,
    last_frame_tick: Option<f64>,
    last_frame_duration: Option<f64>,
    first_frame_time: Option<f64>,
    time_to_smooth: Option<f64>,
}

impl FrameTickController {
    pub fn new(target_frames: u32, thresholds: StutterThresholds, clock: DeterministicClock) -> Self {
        Self {
            target_frames: target_frames.max(1),
            phase: Phase::AwaitingFirstFrame,
            frame_counter: 0,
            clock,
            guard: ReentrancyGuard::default(),
            detector: StutterDetector::new(thresholds),
            last_frame_tick: None,
            last_frame_duration: None,
            first_frame_time: None,
            time_to_smooth: None,
        }
    }

    /// Pre-tick side of the re-entrancy guard.
    pub fn enter(&mut self) -> Depth {
        self.guard.enter()
    }

    /// Leave the guard without ticking, used when a frame is cut short.
    pub fn release(&mut self) -> Depth {
        self.guard.exit()
    }

    pub fn tick(&mut self, now: f64) -> TickOutcome {
        if self.guard.exit() == Depth::Nested {
            return TickOutcome::Nested;
        }
        if self.phase == Phase::Completed {
            return TickOutcome::AlreadyCompleted;
        }

        let now = if now.is_finite() { now } else { 0.0 };
        let duration = self.last_frame_tick.map(|last| now - last);
        self.last_frame_tick = Some(now);

        let mut class = None;
        let past_warmup = self.frame_counter > self.detector.thresholds().warmup_frames;
        if let (true, Some(current), Some(previous)) =
            (past_warmup, duration, self.last_frame_duration)
        {
            if previous > 0.0 {
                let frame_class = self.detector.classify(current, previous);
                if frame_class == FrameClass::BecameSmooth {
                    let first = self.first_frame_time.unwrap_or(now);
                    self.time_to_smooth = Some(now - first);
                }
                class = Some(frame_class);
            }
        }
        self.last_frame_duration = duration;

        self.frame_counter += 1;
        self.clock.advance();

        if self.frame_counter == 1 {
            self.first_frame_time = Some(now);
            self.phase = Phase::Running;
        }

        let completed = self.frame_counter == self.target_frames;
        if completed {
            self.phase = Phase::Completed;
        }

        TickOutcome::Counted(FrameTick { frame: self.frame_counter, class, duration, completed })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn target_frames(&self) -> u32 {
        self.target_frames
    }

    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    pub fn stutter_events(&self) -> u32 {
        self.detector.stutter_events()
    }

    pub fn smooth_streak(&self) -> SmoothStreak {
        self.detector.streak()
    }

    pub fn first_frame_time(&self) -> Option<f64> {
        self.first_frame_time
    }

    pub fn time_to_smooth(&self) -> Option<f64> {
        self.time_to_smooth
    }

    pub fn guard_idle(&self) -> bool {
        self.guard.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(target: u32) -> FrameTickController {
        FrameTickController::new(target, StutterThresholds::default(), DeterministicClock::new(0))
    }

    #[test]
    fn first_tick_moves_out_of_awaiting() {
        let mut ctl = controller(10);
        assert_eq!(ctl.phase(), Phase::AwaitingFirstFrame);
        ctl.tick(100.0);
        assert_eq!(ctl.phase(), Phase::Running);
        assert_eq!(ctl.first_frame_time(), Some(100.0));
    }

    #[test]
    fn zero_target_is_clamped_to_one_frame() {
        let mut ctl = controller(0);
        match ctl.tick(1.0) {
            TickOutcome::Counted(tick) => assert!(tick.completed),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn non_finite_time_is_treated_as_zero() {
        let mut ctl = controller(10);
        ctl.tick(f64::NAN);
        assert_eq!(ctl.first_frame_time(), Some(0.0));
    }
}
