pub mod benchmark;
pub mod errors;
pub mod log_capture;
pub mod logging;

/// Messages exchanged with the collector service
pub mod events {
    use crate::domain::benchmark::BenchmarkReport;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::fmt::Debug;

    /// Base trait for all collector events
    pub trait DomainEvent: Debug + Clone {
        fn event_type(&self) -> &'static str;
    }

    /// Harness → collector
    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(tag = "event", content = "data", rename_all = "snake_case")]
    pub enum OutboundEvent {
        BenchmarkStarted { id: String },
        Log { args: Vec<Value> },
        BenchmarkFinish(Box<BenchmarkReport>),
    }

    impl DomainEvent for OutboundEvent {
        fn event_type(&self) -> &'static str {
            match self {
                OutboundEvent::BenchmarkStarted { .. } => "benchmark_started",
                OutboundEvent::Log { .. } => "log",
                OutboundEvent::BenchmarkFinish(_) => "benchmark_finish",
            }
        }
    }

    /// Collector → harness. `Connect`, `Error` and `ConnectError` are also
    /// synthesized by the client from socket state changes.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(tag = "event", content = "data", rename_all = "snake_case")]
    pub enum InboundEvent {
        Connect,
        Error {
            #[serde(default)]
            message: String,
        },
        ConnectError {
            #[serde(default)]
            message: String,
        },
        NextBenchmark { url: String },
    }

    impl DomainEvent for InboundEvent {
        fn event_type(&self) -> &'static str {
            match self {
                InboundEvent::Connect => "connect",
                InboundEvent::Error { .. } => "error",
                InboundEvent::ConnectError { .. } => "connect_error",
                InboundEvent::NextBenchmark { .. } => "next_benchmark",
            }
        }
    }
}
