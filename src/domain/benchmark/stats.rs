use serde::Serialize;

/// Welford running mean/variance with min/max.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStat {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub standard_deviation: f64,
}

impl RunningStat {
    pub fn push(&mut self, sample: f64) {
        if !sample.is_finite() {
            return;
        }
        if self.count == 0 {
            self.min = sample;
            self.max = sample;
        } else {
            self.min = self.min.min(sample);
            self.max = self.max.max(sample);
        }
        self.count += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Population standard deviation; zero for fewer than two samples.
    pub fn standard_deviation(&self) -> f64 {
        if self.count < 2 { 0.0 } else { (self.m2 / self.count as f64).sqrt() }
    }

    pub fn summary(&self) -> StatSummary {
        StatSummary {
            min: self.min,
            max: self.max,
            avg: self.mean,
            standard_deviation: self.standard_deviation(),
        }
    }
}

/// `values` block of the finish event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub fps: StatSummary,
    pub dt: StatSummary,
    pub cpu: StatSummary,
}

/// Frame rate, frame interval and time inside the main loop, sampled around
/// each outermost frame.
#[derive(Debug, Clone, Default)]
pub struct PerfStats {
    fps: RunningStat,
    dt: RunningStat,
    cpu: RunningStat,
    frame_started_at: Option<f64>,
    last_frame_start: Option<f64>,
    total_time_in_main_loop: f64,
}

impl PerfStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_start(&mut self, now: f64) {
        if let Some(previous) = self.last_frame_start {
            let dt = now - previous;
            if dt > 0.0 {
                self.dt.push(dt);
                self.fps.push(1000.0 / dt);
            }
        }
        self.last_frame_start = Some(now);
        self.frame_started_at = Some(now);
    }

    /// No-op without a matching `frame_start`.
    pub fn frame_end(&mut self, now: f64) {
        let Some(start) = self.frame_started_at.take() else {
            return;
        };
        let cpu = now - start;
        if cpu >= 0.0 {
            self.cpu.push(cpu);
            self.total_time_in_main_loop += cpu;
        }
    }

    pub fn total_time_in_main_loop(&self) -> f64 {
        self.total_time_in_main_loop
    }

    pub fn frames_measured(&self) -> u64 {
        self.cpu.count()
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary { fps: self.fps.summary(), dt: self.dt.summary(), cpu: self.cpu.summary() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_stat_matches_closed_form() {
        let mut stat = RunningStat::default();
        for s in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stat.push(s);
        }
        let summary = stat.summary();
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert!((summary.avg - 5.0).abs() < 1e-12);
        assert!((summary.standard_deviation - 2.0).abs() < 1e-12);
    }

    #[test]
    fn main_loop_split() {
        let mut stats = PerfStats::new();
        stats.frame_start(0.0);
        stats.frame_end(4.0);
        stats.frame_start(16.0);
        stats.frame_end(22.0);
        assert_eq!(stats.total_time_in_main_loop(), 10.0);
        let summary = stats.summary();
        assert_eq!(summary.dt.avg, 16.0);
        assert_eq!(summary.fps.avg, 62.5);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut stats = PerfStats::new();
        stats.frame_end(5.0);
        assert_eq!(stats.frames_measured(), 0);
    }
}
