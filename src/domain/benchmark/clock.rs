/// Real elapsed time in milliseconds, as reported by the host's high
/// resolution timer. Every harness measurement goes through this trait so it
/// keeps working after the application's view of time has been faked.
pub trait WallClock {
    fn now(&self) -> f64;
}

impl<C: WallClock + ?Sized> WallClock for std::rc::Rc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Default length of one deterministic time unit: one frame at 60 Hz.
pub const DEFAULT_UNIT_MS: f64 = 1000.0 / 60.0;

/// Frame-driven time source handed to the application under test.
///
/// The value moves only when a frame is accepted, never with the wall clock,
/// so animations land on identical states across machines and the final
/// frame can be compared against a stored reference image.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterministicClock {
    seed: u64,
    ticks: u64,
    unit_ms: f64,
}

impl DeterministicClock {
    pub fn new(seed: u64) -> Self {
        Self::with_unit(seed, DEFAULT_UNIT_MS)
    }

    pub fn with_unit(seed: u64, unit_ms: f64) -> Self {
        let unit_ms = if unit_ms.is_finite() && unit_ms > 0.0 { unit_ms } else { DEFAULT_UNIT_MS };
        Self { seed, ticks: 0, unit_ms }
    }

    /// Current counter value: seed plus accepted frames.
    pub fn value(&self) -> u64 {
        self.seed + self.ticks
    }

    /// Counter value expressed in milliseconds for `performance.now()`.
    pub fn now_ms(&self) -> f64 {
        self.value() as f64 * self.unit_ms
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }
}

impl Default for DeterministicClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_one_unit_per_call() {
        let mut clock = DeterministicClock::new(7);
        assert_eq!(clock.value(), 7);
        clock.advance();
        clock.advance();
        assert_eq!(clock.value(), 9);
        assert!((clock.now_ms() - 9.0 * DEFAULT_UNIT_MS).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_unit() {
        let clock = DeterministicClock::with_unit(1, 0.0);
        assert!((clock.now_ms() - DEFAULT_UNIT_MS).abs() < 1e-9);
    }
}
