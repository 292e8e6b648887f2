//! Frame timing core: deterministic clock, tick state machine, stutter and
//! idle accounting, and the session that ties them together.

pub mod capture;
pub mod clock;
pub mod guard;
pub mod idle;
pub mod random;
pub mod report;
pub mod session;
pub mod stats;
pub mod stutter;
pub mod tick;

pub use capture::{NoCapture, ReferenceCapture, ReferenceImage};
pub use clock::{DeterministicClock, WallClock, DEFAULT_UNIT_MS};
pub use guard::{Depth, ReentrancyGuard};
pub use idle::IdleTracker;
pub use random::{SeededRandom, DEFAULT_RANDOM_SEED};
pub use report::{BenchmarkReport, TestResult};
pub use session::{BenchmarkSession, BenchmarkSettings, SessionPorts};
pub use stats::{PerfStats, StatSummary, StatsSummary};
pub use stutter::{FrameClass, SmoothStreak, StutterDetector, StutterThresholds};
pub use tick::{FrameTick, FrameTickController, Phase, TickOutcome};
