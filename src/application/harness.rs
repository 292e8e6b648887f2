use super::interceptor::{AnimationLoopInterceptor, SharedSession};
use super::log_routing::LogRouter;
use super::ports::{FrameScheduler, PageControl, ResultReporter};
use crate::config::{CollectorConfig, HarnessConfig};
use crate::domain::benchmark::{
    BenchmarkSession, ReferenceCapture, SessionPorts, WallClock,
};
use crate::domain::events::{DomainEvent, InboundEvent};
use crate::domain::log_capture::LogBuffer;
use crate::domain::logging::{LogComponent, Logger};
use std::cell::RefCell;
use std::rc::Rc;

/// Host bindings used to assemble a [`Harness`].
pub struct HostPorts {
    pub clock: Rc<dyn WallClock>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub reporter: Rc<dyn ResultReporter>,
    pub page: Rc<dyn PageControl>,
    pub capture: Box<dyn ReferenceCapture>,
    pub logger: Rc<dyn Logger>,
}

/// One benchmark run: session, frame interceptor and log routing wired to the
/// host.
pub struct Harness {
    config: HarnessConfig,
    collector: CollectorConfig,
    interceptor: Rc<AnimationLoopInterceptor>,
    log_router: Rc<LogRouter>,
    reporter: Rc<dyn ResultReporter>,
    page: Rc<dyn PageControl>,
    logger: Rc<dyn Logger>,
}

const COMPONENT: LogComponent = LogComponent::Application("Harness");

impl Harness {
    pub fn new(config: HarnessConfig, collector: CollectorConfig, ports: HostPorts) -> Self {
        let logs = LogBuffer::shared();
        let session: SharedSession = Rc::new(RefCell::new(BenchmarkSession::new(
            config.benchmark_settings(&collector.test_id),
            SessionPorts {
                clock: Rc::clone(&ports.clock),
                capture: ports.capture,
                logger: Rc::clone(&ports.logger),
                logs: Rc::clone(&logs),
            },
        )));

        let interceptor = Rc::new(AnimationLoopInterceptor::new(
            session,
            ports.scheduler,
            Rc::clone(&ports.reporter),
            Rc::clone(&ports.page),
            ports.clock,
            Rc::clone(&ports.logger),
        ));

        let forward_to = collector.send_log.then(|| Rc::clone(&ports.reporter));
        let log_router = Rc::new(LogRouter::new(logs, forward_to));

        Self {
            config,
            collector,
            interceptor,
            log_router,
            reporter: ports.reporter,
            page: ports.page,
            logger: ports.logger,
        }
    }

    /// Announces the run to the collector.
    pub fn start(&self) {
        self.logger.info(COMPONENT, &format!("Frames to render: {}", self.config.num_frames));
        self.reporter.benchmark_started(&self.collector.test_id);
    }

    pub fn handle_inbound(&self, event: InboundEvent) {
        match &event {
            InboundEvent::Connect => self.logger.info(COMPONENT, "Connected to testing server"),
            InboundEvent::Error { message } | InboundEvent::ConnectError { message } => {
                self.logger.error(COMPONENT, &format!("{}: {message}", event.event_type()))
            }
            InboundEvent::NextBenchmark { url } => {
                self.logger.info(COMPONENT, &format!("next_benchmark {url}"));
                self.page.navigate(url);
            }
        }
    }

    pub fn interceptor(&self) -> &Rc<AnimationLoopInterceptor> {
        &self.interceptor
    }

    pub fn session(&self) -> &SharedSession {
        self.interceptor.session()
    }

    pub fn log_router(&self) -> &Rc<LogRouter> {
        &self.log_router
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn collector(&self) -> &CollectorConfig {
        &self.collector
    }
}
