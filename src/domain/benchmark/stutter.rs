use serde::{Deserialize, Serialize};

/// Tunables for stutter classification. The defaults assume a 60 Hz display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StutterThresholds {
    /// A stutter frame must take longer than this many milliseconds.
    pub min_stutter_ms: f64,
    /// ...and longer than the previous frame times this factor.
    pub relative_factor: f64,
    /// Consecutive smooth frames after which the framerate counts as settled.
    pub smooth_frames_required: u32,
    /// Frames at the start of the run that are never classified.
    pub warmup_frames: u32,
}

impl Default for StutterThresholds {
    fn default() -> Self {
        Self {
            min_stutter_ms: 20.0,
            relative_factor: 1.35,
            smooth_frames_required: 120,
            warmup_frames: 5,
        }
    }
}

/// Consecutive smooth frames, frozen once the settle point is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothStreak {
    Counting(u32),
    Reached,
}

impl Default for SmoothStreak {
    fn default() -> Self {
        SmoothStreak::Counting(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameClass {
    Smooth,
    Stutter,
    /// Streak just hit the threshold on this frame.
    BecameSmooth,
}

#[derive(Debug, Clone, Default)]
pub struct StutterDetector {
    thresholds: StutterThresholds,
    stutter_events: u32,
    streak: SmoothStreak,
}

impl StutterDetector {
    pub fn new(thresholds: StutterThresholds) -> Self {
        Self { thresholds, stutter_events: 0, streak: SmoothStreak::default() }
    }

    pub fn thresholds(&self) -> &StutterThresholds {
        &self.thresholds
    }

    /// Stutter = slow in absolute terms and a jump relative to the previous frame.
    pub fn is_stutter(&self, duration: f64, previous: f64) -> bool {
        duration > self.thresholds.min_stutter_ms
            && duration > previous * self.thresholds.relative_factor
    }

    pub fn classify(&mut self, duration: f64, previous: f64) -> FrameClass {
        if self.is_stutter(duration, previous) {
            self.stutter_events += 1;
            if let SmoothStreak::Counting(_) = self.streak {
                self.streak = SmoothStreak::Counting(0);
            }
            return FrameClass::Stutter;
        }

        match self.streak {
            SmoothStreak::Reached => FrameClass::Smooth,
            SmoothStreak::Counting(count) => {
                let count = count + 1;
                if count >= self.thresholds.smooth_frames_required {
                    self.streak = SmoothStreak::Reached;
                    FrameClass::BecameSmooth
                } else {
                    self.streak = SmoothStreak::Counting(count);
                    FrameClass::Smooth
                }
            }
        }
    }

    pub fn stutter_events(&self) -> u32 {
        self.stutter_events
    }

    pub fn streak(&self) -> SmoothStreak {
        self.streak
    }
}
