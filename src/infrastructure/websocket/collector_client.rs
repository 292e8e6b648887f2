use super::dto::{decode_inbound, encode_outbound};
use super::reconnect::{Backoff, Pending};
use crate::application::ResultReporter;
use crate::domain::benchmark::BenchmarkReport;
use crate::domain::errors::{AppError, TransportResult};
use crate::domain::events::{DomainEvent, InboundEvent, OutboundEvent};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_warn};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::SplitSink;
use futures::{FutureExt, SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use gloo_timers::future::sleep;
use std::time::Duration;

enum Command {
    Emit(OutboundEvent),
    Disconnect,
}

/// Reporter backed by a WebSocket to the collector. Events are queued on a
/// channel and written by a background task, so callers never wait on the
/// network.
pub struct CollectorClient {
    commands: UnboundedSender<Command>,
}

impl CollectorClient {
    /// Start the connection task. Inbound events, including the locally
    /// synthesized `connect` / `error` / `connect_error`, arrive on the
    /// returned receiver.
    pub fn connect(url: String) -> (Self, UnboundedReceiver<InboundEvent>) {
        let (commands, command_rx) = mpsc::unbounded();
        let (inbound_tx, inbound_rx) = mpsc::unbounded();
        wasm_bindgen_futures::spawn_local(run_connection(url, command_rx, inbound_tx));
        (Self { commands }, inbound_rx)
    }

    /// Queue an event for the socket task. After `disconnect` the channel is
    /// closed and late events are dropped without logging: the console is
    /// hooked, so a warning here would be forwarded straight back.
    fn emit(&self, event: OutboundEvent) {
        let _ = self.commands.unbounded_send(Command::Emit(event));
    }
}

impl ResultReporter for CollectorClient {
    fn benchmark_started(&self, test_id: &str) {
        self.emit(OutboundEvent::BenchmarkStarted { id: test_id.to_string() });
    }

    fn forward_log(&self, args: Vec<serde_json::Value>) {
        self.emit(OutboundEvent::Log { args });
    }

    fn benchmark_finished(&self, report: &BenchmarkReport) {
        self.emit(OutboundEvent::BenchmarkFinish(Box::new(report.clone())));
    }

    fn disconnect(&self) {
        let _ = self.commands.unbounded_send(Command::Disconnect);
        self.commands.close_channel();
    }
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &OutboundEvent,
) -> TransportResult<()> {
    let frame = encode_outbound(event)?;
    sink.send(Message::Text(frame))
        .await
        .map_err(|e| AppError::TransportError(format!("send {} failed: {e:?}", event.event_type())))
}

/// Write queued events oldest first. A failed send goes back to the front
/// of the queue and stops the replay.
async fn replay(sink: &mut SplitSink<WebSocket, Message>, pending: &mut Pending<OutboundEvent>) -> bool {
    while let Some(event) = pending.take_next() {
        if let Err(e) = send_event(sink, &event).await {
            log_warn!(LogComponent::Infrastructure("Collector"), "{}", e);
            pending.requeue_front(event);
            return false;
        }
    }
    true
}

/// Sleep out a backoff delay while still accepting commands. Returns `true`
/// once a disconnect has been requested.
async fn wait_queueing(
    secs: u64,
    commands: &mut UnboundedReceiver<Command>,
    pending: &mut Pending<OutboundEvent>,
) -> bool {
    let delay = sleep(Duration::from_secs(secs)).fuse();
    futures::pin_mut!(delay);
    loop {
        futures::select! {
            _ = delay => return false,
            command = commands.next() => match command {
                Some(Command::Emit(event)) => pending.push(event),
                Some(Command::Disconnect) | None => return true,
            },
        }
    }
}

/// Connection loop with exponential backoff. Events that could not be
/// written are retried, in order, on the next connection. A disconnect
/// request makes one last attempt to flush the queue before closing.
async fn run_connection(
    url: String,
    mut commands: UnboundedReceiver<Command>,
    inbound: UnboundedSender<InboundEvent>,
) {
    let notify = |event: InboundEvent| {
        let _ = inbound.unbounded_send(event);
    };
    let mut pending: Pending<OutboundEvent> = Pending::default();
    let mut backoff = Backoff::default();
    let mut closing = false;

    loop {
        let socket = match WebSocket::open(&url) {
            Ok(socket) => socket,
            Err(e) => {
                notify(InboundEvent::ConnectError { message: format!("{e:?}") });
                if closing {
                    log_warn!(
                        LogComponent::Infrastructure("Collector"),
                        "dropping {} unsent events",
                        pending.len()
                    );
                    return;
                }
                closing = wait_queueing(backoff.next_wait(), &mut commands, &mut pending).await;
                continue;
            }
        };
        backoff.reset();
        notify(InboundEvent::Connect);

        let (mut sink, stream) = socket.split();
        let mut stream = stream.fuse();

        let mut healthy = replay(&mut sink, &mut pending).await;
        if closing {
            let _ = sink.close().await;
            log_debug!(LogComponent::Infrastructure("Collector"), "disconnected");
            return;
        }

        while healthy {
            futures::select! {
                command = commands.next() => match command {
                    Some(Command::Emit(event)) => {
                        if let Err(e) = send_event(&mut sink, &event).await {
                            log_warn!(LogComponent::Infrastructure("Collector"), "{}", e);
                            pending.push(event);
                            healthy = false;
                        }
                    }
                    Some(Command::Disconnect) | None => {
                        replay(&mut sink, &mut pending).await;
                        let _ = sink.close().await;
                        log_debug!(LogComponent::Infrastructure("Collector"), "disconnected");
                        return;
                    }
                },
                message = stream.next() => match message {
                    Some(Ok(Message::Text(text))) => match decode_inbound(&text) {
                        Ok(event) => notify(event),
                        Err(e) => log_warn!(LogComponent::Infrastructure("Collector"), "{}", e),
                    },
                    Some(Ok(Message::Bytes(_))) => {}
                    Some(Err(e)) => {
                        notify(InboundEvent::Error { message: format!("{e:?}") });
                        healthy = false;
                    }
                    None => healthy = false,
                },
            }
        }

        let wait = backoff.next_wait();
        log_warn!(LogComponent::Infrastructure("Collector"), "Reconnecting in {}s", wait);
        closing = wait_queueing(wait, &mut commands, &mut pending).await;
    }
}
