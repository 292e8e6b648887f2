//! Wire codec for the collector socket: one JSON text frame per event,
//! `{"event": <name>, "data": <payload>}`.

use crate::domain::errors::{AppError, TransportResult};
use crate::domain::events::{InboundEvent, OutboundEvent};

pub fn encode_outbound(event: &OutboundEvent) -> TransportResult<String> {
    serde_json::to_string(event)
        .map_err(|e| AppError::TransportError(format!("Failed to encode event: {e}")))
}

pub fn decode_inbound(frame: &str) -> TransportResult<InboundEvent> {
    serde_json::from_str(frame)
        .map_err(|e| AppError::TransportError(format!("Failed to parse collector message: {e}")))
}
