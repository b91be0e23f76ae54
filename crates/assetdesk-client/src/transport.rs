//! Duplex connection plumbing between a chat session and a transport.
//!
//! A [`Link`] is the session's end: it sends outbound text and receives
//! [`ConnectionEvent`]s. A [`LinkPeer`] is the transport's end. Opening a link
//! never blocks; whether the connection came up is reported later through
//! [`ConnectionEvent::Opened`] or [`ConnectionEvent::Failed`].

use tokio::sync::mpsc;

/// Events produced by a transport, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection is open and usable.
    Opened,
    /// A text frame arrived.
    Received(String),
    /// The remote side closed the connection.
    Closed,
    /// The connection could not be opened or broke.
    Failed(String),
}

/// Something that can open duplex text connections.
pub trait Connector {
    /// Start opening a connection to `url` and return the session's end of it.
    fn open(&self, url: &str) -> Link;
}

/// Session end of a connection.
#[derive(Debug)]
pub struct Link {
    outbound: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
}

/// Transport end of a connection.
#[derive(Debug)]
pub struct LinkPeer {
    /// Text frames to transmit. Yields `None` once the session closes its end.
    pub outbound: mpsc::UnboundedReceiver<String>,
    /// Where to report connection events.
    pub events: mpsc::UnboundedSender<ConnectionEvent>,
}

impl Link {
    /// Create both ends of a connection.
    pub fn channel() -> (Link, LinkPeer) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Link {
                outbound: outbound_tx,
                events: events_rx,
            },
            LinkPeer {
                outbound: outbound_rx,
                events: events_tx,
            },
        )
    }

    /// Queue a text frame. Fails if the transport has gone away.
    pub fn send(&self, text: String) -> Result<(), String> {
        self.outbound
            .send(text)
            .map_err(|_| "transport task has stopped".to_string())
    }

    /// Wait for the next event. A transport that vanished without reporting
    /// reads as [`ConnectionEvent::Closed`].
    pub async fn recv(&mut self) -> ConnectionEvent {
        self.events.recv().await.unwrap_or(ConnectionEvent::Closed)
    }
}

impl LinkPeer {
    /// Report an event to the session. Ignored if the session is gone.
    pub fn emit(&self, event: ConnectionEvent) {
        let _ = self.events.send(event);
    }
}
