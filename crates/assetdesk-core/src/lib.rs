//! AssetDesk Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/WebSocket
//! - HTTP
//! - Runtime specifics (timers, channels)
//!
//! The chat reveal logic lives here as a plain state machine; the client crate
//! drives it from a timer.

pub mod answer;
pub mod asset;
pub mod chat;
pub mod error;
pub mod ids;
pub mod reveal;

// Re-export commonly used types
pub use answer::Answer;
pub use asset::{Asset, AssetDraft, AssetStatus};
pub use chat::{ChatMessage, ChatRole};
pub use error::CoreError;
pub use ids::{AssetId, MessageId};
pub use reveal::{Reveal, RevealTick};
