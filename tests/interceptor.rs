mod common;

use common::{FailingCapture, FixedCapture, ManualClock, MemoryLogger, QueueScheduler, RecordingPage, RecordingReporter};
use gfx_perf_harness::application::{FrameRun, Harness, HostPorts};
use gfx_perf_harness::config::{CollectorConfig, HarnessConfig};
use gfx_perf_harness::domain::benchmark::{ReferenceCapture, TestResult, TickOutcome};
use std::cell::Cell;
use std::rc::Rc;

struct Rig {
    clock: ManualClock,
    scheduler: Rc<QueueScheduler>,
    reporter: Rc<RecordingReporter>,
    page: Rc<RecordingPage>,
    harness: Harness,
}

fn rig(num_frames: u32) -> Rig {
    rig_with(num_frames, Box::new(FixedCapture))
}

fn rig_with(num_frames: u32, capture: Box<dyn ReferenceCapture>) -> Rig {
    let clock = ManualClock::default();
    let scheduler = Rc::new(QueueScheduler::default());
    let reporter = Rc::new(RecordingReporter::default());
    let page = Rc::new(RecordingPage::default());
    let harness = Harness::new(
        HarnessConfig { num_frames, ..Default::default() },
        CollectorConfig::new(None, Some("interceptor".to_string()), false),
        HostPorts {
            clock: Rc::new(clock.clone()),
            scheduler: scheduler.clone(),
            reporter: reporter.clone(),
            page: page.clone(),
            capture,
            logger: Rc::new(MemoryLogger::default()),
        },
    );
    Rig { clock, scheduler, reporter, page, harness }
}

fn counting_callback(calls: &Rc<Cell<u32>>) -> Box<dyn FnOnce(f64)> {
    let calls = Rc::clone(calls);
    Box::new(move |_| calls.set(calls.get() + 1))
}

#[test]
fn frames_after_target_skip_the_app_and_report_once() {
    let rig = rig(3);
    let interceptor = rig.harness.interceptor();
    let calls = Rc::new(Cell::new(0));

    let mut runs = Vec::new();
    for i in 0..5 {
        rig.clock.set(i as f64 * 16.0);
        runs.push(interceptor.run_frame(counting_callback(&calls)));
    }

    assert_eq!(calls.get(), 3);
    assert!(matches!(runs[2], FrameRun::Ran(TickOutcome::Counted(tick)) if tick.completed));
    assert_eq!(runs[3], FrameRun::Finished);
    assert_eq!(runs[4], FrameRun::AfterFinish);

    let finished = rig.reporter.finished.borrow();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].num_frames, 3);
    assert_eq!(finished[0].test_id, "interceptor");
    assert_eq!(rig.reporter.disconnects.get(), 1);
    assert_eq!(rig.page.finished_shown.get(), 1);
    assert_eq!(rig.page.closes.get(), 1);
    assert_eq!(rig.harness.session().borrow().frame_counter(), 3);
}

#[test]
fn requested_frames_run_through_the_host_scheduler() {
    let rig = rig(2);
    let interceptor = Rc::clone(rig.harness.interceptor());
    let calls = Rc::new(Cell::new(0));

    let first = interceptor.request_frame(counting_callback(&calls));
    let second = interceptor.request_frame(counting_callback(&calls));
    assert_ne!(first, second);
    assert_eq!(rig.scheduler.pending(), 2);
    assert_eq!(calls.get(), 0);

    while rig.scheduler.run_next(0.0) {}
    assert_eq!(calls.get(), 2);
    assert_eq!(rig.harness.session().borrow().frame_counter(), 2);
}

#[test]
fn app_callback_receives_wall_clock_time() {
    let rig = rig(10);
    rig.clock.set(42.5);
    let seen = Rc::new(Cell::new(0.0));
    let sink = Rc::clone(&seen);
    rig.harness.interceptor().run_frame(Box::new(move |t| sink.set(t)));
    assert_eq!(seen.get(), 42.5);
}

#[test]
fn frame_run_from_inside_a_callback_is_nested() {
    let rig = rig(10);
    let interceptor = Rc::clone(rig.harness.interceptor());
    let inner = Rc::new(Cell::new(None));

    let inner_slot = Rc::clone(&inner);
    let reentrant = Rc::clone(&interceptor);
    let outer = interceptor.run_frame(Box::new(move |_| {
        inner_slot.set(Some(reentrant.run_frame(Box::new(|_| {}))));
    }));

    assert_eq!(inner.get(), Some(FrameRun::Ran(TickOutcome::Nested)));
    assert!(matches!(outer, FrameRun::Ran(TickOutcome::Counted(tick)) if tick.frame == 1));
    assert_eq!(rig.harness.session().borrow().frame_counter(), 1);
}

#[test]
fn installation_is_claimed_once() {
    let rig = rig(10);
    let interceptor = rig.harness.interceptor();
    assert!(!interceptor.is_installed());
    assert!(interceptor.claim_installation());
    assert!(!interceptor.claim_installation());
    assert!(interceptor.is_installed());
}

#[test]
fn failed_capture_still_reports_a_pass() {
    let rig = rig_with(2, Box::new(FailingCapture));
    let interceptor = rig.harness.interceptor();
    for i in 0..3 {
        rig.clock.set(i as f64 * 16.0);
        interceptor.run_frame(Box::new(|_| {}));
    }

    let finished = rig.reporter.finished.borrow();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].result, TestResult::Pass);
    assert!(!finished[0].reference_image_captured);
    assert_eq!(finished[0].num_frames, 2);
    assert_eq!(finished[0].total_render_time, 32.0);
}
