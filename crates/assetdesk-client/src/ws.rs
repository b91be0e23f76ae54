//! WebSocket transport for the assistant chat.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::transport::{ConnectionEvent, Connector, Link, LinkPeer};

/// Opens chat connections with `tokio-tungstenite`.
///
/// Each link is served by its own task, so `open` must be called from within a
/// tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn open(&self, url: &str) -> Link {
        let (link, peer) = Link::channel();
        tokio::spawn(run_socket(url.to_string(), peer));
        link
    }
}

/// Pump one socket until either side closes it.
async fn run_socket(url: String, mut peer: LinkPeer) {
    debug!(url = %url, "Opening chat socket");

    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            peer.emit(ConnectionEvent::Failed(format!(
                "could not connect to {}: {}",
                url, e
            )));
            return;
        }
    };

    peer.emit(ConnectionEvent::Opened);
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = peer.outbound.recv() => match outbound {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        peer.emit(ConnectionEvent::Failed(e.to_string()));
                        break;
                    }
                }
                None => {
                    debug!(url = %url, "Session released the link, closing socket");
                    if let Err(e) = sink.close().await {
                        debug!(error = %e, "Close handshake failed");
                    }
                    break;
                }
            },

            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    peer.emit(ConnectionEvent::Received(text));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    warn!(len = bytes.len(), "Binary frame on chat socket, decoding as text");
                    peer.emit(ConnectionEvent::Received(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    ));
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(frame = ?frame, "Server closed chat socket");
                    peer.emit(ConnectionEvent::Closed);
                    break;
                }
                // Ping/pong are answered by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    peer.emit(ConnectionEvent::Failed(e.to_string()));
                    break;
                }
                None => {
                    peer.emit(ConnectionEvent::Closed);
                    break;
                }
            },
        }
    }
}
