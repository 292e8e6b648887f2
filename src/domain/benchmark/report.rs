use super::stats::StatsSummary;
use crate::domain::log_capture::LogBuffer;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestResult {
    #[serde(rename = "PASS")]
    Pass,
}

/// Immutable result of one run, sent to the collector as `benchmark_finish`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    #[serde(rename = "test_id")]
    pub test_id: String,
    pub values: StatsSummary,
    pub num_frames: u32,
    /// Page init to finish, everything included.
    pub total_time: f64,
    pub time_to_first_frame: f64,
    pub logs: LogBuffer,
    pub avg_fps: f64,
    pub num_stutter_events: u32,
    pub result: TestResult,
    /// First frame to finish.
    pub total_render_time: f64,
    pub cpu_time: f64,
    pub cpu_idle_time: f64,
    pub cpu_idle_perc: f64,
    pub page_load_time: Option<f64>,
    pub time_to_smooth_framerate: Option<f64>,
    pub reference_image_captured: bool,
}

/// Frames per second over the render window; zero when the window is empty.
pub fn average_fps(num_frames: u32, total_render_time: f64) -> f64 {
    if total_render_time > 0.0 { num_frames as f64 * 1000.0 / total_render_time } else { 0.0 }
}

/// Share of `total` spent in `part`, in percent; zero when `total` is empty.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 { part * 100.0 / total } else { 0.0 }
}
