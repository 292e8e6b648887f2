//! Orchestration over host capabilities: the frame interceptor, console
//! routing and the run bootstrap.

pub mod harness;
pub mod interceptor;
pub mod log_routing;
pub mod ports;

pub use harness::{Harness, HostPorts};
pub use interceptor::{AnimationLoopInterceptor, FrameRun, SharedSession};
pub use log_routing::LogRouter;
pub use ports::{FrameCallback, FrameScheduler, PageControl, ResultReporter};
