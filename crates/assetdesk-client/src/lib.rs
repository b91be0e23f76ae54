//! Client library for the AssetDesk backend.
//!
//! Provides the REST client for the asset registry and the chat session that
//! talks to the assistant over a WebSocket.

pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod transport;
pub mod ws;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpClient;
pub use session::{ChatSession, ConnectionState, SessionEvent};
pub use store::MessageStore;
pub use transport::{ConnectionEvent, Connector, Link, LinkPeer};
pub use ws::WsConnector;
