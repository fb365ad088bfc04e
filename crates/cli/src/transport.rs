// WebSocket transport for the console.
//
// `open` spawns a connection task that owns the socket. The task reports
// lifecycle changes and inbound text frames through an event channel
// drained by the host event loop. Dial failure, read errors, a server
// close, and a local `close()` all end the task with a single `Closed`
// event; the console treats every close uniformly.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use crate::console::Transport;

/// Events delivered from the connection task to the host event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Closed,
}

pub struct WsTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl WsTransport {
    /// Returns the transport and the event receiver the host loop drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { events, outbound: None }, receiver)
    }
}

impl Transport for WsTransport {
    fn open(&mut self, url: &str) -> Result<()> {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        self.outbound = Some(outbound);
        tokio::spawn(run_connection(url.to_string(), outbound_rx, self.events.clone()));
        Ok(())
    }

    fn send(&mut self, payload: &str) -> Result<()> {
        if let Some(outbound) = &self.outbound {
            // Fire-and-forget: a frame racing the close is simply dropped.
            let _ = outbound.send(payload.to_string());
        }
        Ok(())
    }

    fn close(&mut self) {
        // Dropping the sender ends the task's outbound stream, which
        // closes the socket and produces the Closed event.
        self.outbound = None;
    }
}

async fn run_connection(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    if let Err(error) = Url::parse(&url) {
        warn!(%url, %error, "invalid websocket url");
        let _ = events.send(TransportEvent::Closed);
        return;
    }

    let (stream, _) = match connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(error) => {
            warn!(%url, %error, "websocket connect failed");
            let _ = events.send(TransportEvent::Closed);
            return;
        }
    };

    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            outgoing = outbound.recv() => match outgoing {
                Some(text) => {
                    if sink.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                None => {
                    // Local close: the console dropped the outbound sender.
                    let _ = sink.close().await;
                    break;
                }
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Message(text.to_string()));
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(error)) => {
                    debug!(%error, "websocket read error");
                    break;
                }
            },
        }
    }

    let _ = events.send(TransportEvent::Closed);
}
