//! Collector connection: JSON-over-WebSocket event transport.

pub mod collector_client;
pub mod dto;
pub mod reconnect;

pub use collector_client::CollectorClient;
pub use dto::{decode_inbound, encode_outbound};
