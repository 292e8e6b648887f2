mod common;

use common::{session_with, FailingCapture, FixedCapture};
use gfx_perf_harness::domain::benchmark::report::{average_fps, percentage};
use gfx_perf_harness::domain::benchmark::{Phase, TestResult};
use gfx_perf_harness::domain::log_capture::ConsoleLevel;
use gfx_perf_harness::domain::logging::LogLevel;
use serde_json::json;

#[test]
fn report_timings_follow_the_wall_clock() {
    let mut fx = session_with(2, Box::new(FixedCapture));
    fx.frame(100.0, 100.0);
    fx.frame(200.0, 200.0);
    assert_eq!(fx.session.phase(), Phase::Completed);

    fx.clock.set(300.0);
    fx.session.pre_tick();
    assert!(fx.session.target_reached());
    let report = fx.session.finish().expect("first finish yields the report");

    assert_eq!(report.num_frames, 2);
    assert_eq!(report.total_time, 300.0);
    assert_eq!(report.time_to_first_frame, 100.0);
    assert_eq!(report.total_render_time, 200.0);
    assert_eq!(report.avg_fps, 10.0);
    assert_eq!(report.cpu_idle_time, 200.0);
    assert_eq!(report.cpu_idle_perc, 100.0);
    assert_eq!(report.page_load_time, Some(100.0));
    assert_eq!(report.result, TestResult::Pass);
    assert!(report.reference_image_captured);
    assert_eq!(fx.session.reference_image().map(|img| img.width), Some(4));
}

#[test]
fn report_is_built_once() {
    let mut fx = session_with(1, Box::new(FixedCapture));
    fx.frame(10.0, 12.0);
    fx.session.pre_tick();
    assert!(fx.session.finish().is_some());
    fx.session.pre_tick();
    assert!(fx.session.finish().is_none());
    assert!(fx.session.is_finished());
    assert!(fx.session.controller().guard_idle());
}

#[test]
fn failed_capture_still_passes() {
    let mut fx = session_with(1, Box::new(FailingCapture));
    fx.frame(5.0, 6.0);
    fx.session.pre_tick();
    let report = fx.session.finish().expect("report");

    assert_eq!(report.result, TestResult::Pass);
    assert!(!report.reference_image_captured);
    assert!(fx.session.reference_image().is_none());
    let warnings = fx.logger.messages_at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("no canvas"));
}

#[test]
fn idle_time_accumulates_between_frames() {
    let mut fx = session_with(10, Box::new(FixedCapture));
    fx.frame(10.0, 14.0);
    fx.frame(30.0, 35.0);
    fx.clock.set(50.0);
    fx.session.pre_tick();

    assert_eq!(fx.session.accumulated_idle(), 16.0 + 15.0);
    assert_eq!(fx.session.page_load_time(), Some(10.0));
}

#[test]
fn nested_pre_ticks_do_not_double_count() {
    let mut fx = session_with(10, Box::new(FixedCapture));
    fx.clock.set(1.0);
    fx.session.pre_tick();
    fx.session.pre_tick();
    fx.session.tick();
    fx.session.post_tick();
    fx.session.tick();
    fx.session.post_tick();

    assert_eq!(fx.session.frame_counter(), 1);
    assert_eq!(fx.session.deterministic_clock().value(), 1);
    assert_eq!(fx.session.stats().frames_measured(), 1);
}

#[test]
fn first_frame_and_settle_point_are_logged() {
    let mut fx = session_with(200, Box::new(FixedCapture));
    for i in 0..130 {
        let t = i as f64 * 16.0;
        fx.frame(t, t);
    }
    assert!(fx.logger.contains("First frame submitted at (ms)"));
    assert!(fx.logger.contains("timeUntilSmoothFramerate 2000"));
}

#[test]
fn captured_console_output_lands_in_report() {
    let mut fx = session_with(1, Box::new(FixedCapture));
    fx.logs.borrow_mut().record(ConsoleLevel::Error, vec![json!("boom")]);
    fx.logs.borrow_mut().record(ConsoleLevel::Log, vec![json!("chatter")]);
    fx.frame(1.0, 2.0);
    fx.session.pre_tick();
    let report = fx.session.finish().expect("report");

    assert_eq!(report.logs.errors, vec![vec![json!("boom")]]);
    assert!(report.logs.warnings.is_empty());
}

#[test]
fn empty_render_window_yields_zero_rates() {
    assert_eq!(average_fps(100, 0.0), 0.0);
    assert_eq!(percentage(10.0, 0.0), 0.0);
    assert_eq!(average_fps(60, 1000.0), 60.0);
}
