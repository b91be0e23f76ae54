//! Assistant chat session.
//!
//! A [`ChatSession`] owns one duplex connection to the backend's chat endpoint,
//! the [`MessageStore`] the UI renders, and the timer that reveals each answer
//! one character at a time. Everything happens on the task that calls
//! [`ChatSession::next_event`]: transport events and reveal ticks are handled
//! one at a time, never concurrently.
//!
//! The backend answers each request with a single complete frame. There is no
//! correlation id, so answers pair with requests purely by arrival order.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use assetdesk_core::{Answer, ChatMessage, MessageId, Reveal, RevealTick};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::store::MessageStore;
use crate::transport::{ConnectionEvent, Connector, Link};
use crate::ws::WsConnector;

/// Whether the chat connection is usable.
///
/// A connection that is still opening counts as disconnected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// What a call to [`ChatSession::next_event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The connection opened.
    Connected,
    /// The connection closed (`reason` is `None`) or failed.
    Disconnected { reason: Option<String> },
    /// An answer arrived and an empty assistant message was appended for it.
    AnswerStarted(MessageId),
    /// One more character of message `id` is visible.
    RevealAdvanced { id: MessageId, ch: char },
    /// Message `id` is fully revealed.
    RevealFinished(MessageId),
}

enum Wake {
    Link(ConnectionEvent),
    Tick,
}

/// One assistant conversation over one connection.
pub struct ChatSession<C: Connector = WsConnector> {
    url: String,
    connector: C,
    link: Option<Link>,
    connection: watch::Sender<ConnectionState>,
    pending: watch::Sender<bool>,
    store: MessageStore,
    reveal: Reveal,
    /// Present exactly while `reveal` is active.
    ticker: Option<Interval>,
    reveal_interval: Duration,
}

impl ChatSession<WsConnector> {
    /// Session over a real WebSocket.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_connector(config, WsConnector)
    }
}

impl<C: Connector> ChatSession<C> {
    /// Session over the given transport.
    pub fn with_connector(config: &ClientConfig, connector: C) -> Result<Self, ClientError> {
        let (connection, _) = watch::channel(ConnectionState::Disconnected);
        let (pending, _) = watch::channel(false);
        Ok(Self {
            url: config.chat_url()?,
            connector,
            link: None,
            connection,
            pending,
            store: MessageStore::new(),
            reveal: Reveal::Idle,
            ticker: None,
            reveal_interval: config.reveal_interval.max(Duration::from_millis(1)),
        })
    }

    /// Chat endpoint this session connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The conversation. Read-only outside this crate; use [`Self::clear`] to
    /// empty it.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Copy of the conversation.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.store.snapshot()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// True from sending a message until its answer frame arrives, or the
    /// connection goes away.
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// True while an answer is being revealed.
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_active()
    }

    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    pub fn watch_pending(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.store.subscribe()
    }

    /// Open the connection. Does nothing if one is already open or opening.
    pub fn connect(&mut self) {
        if self.link.is_some() {
            debug!(url = %self.url, "Chat connection already open, ignoring connect");
            return;
        }
        info!(url = %self.url, "Connecting to assistant");
        self.link = Some(self.connector.open(&self.url));
    }

    /// Stop any reveal and close the connection. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        self.stop_reveal();
        if self.link.take().is_some() {
            info!(url = %self.url, "Closing assistant connection");
        }
        self.mark_disconnected();
    }

    /// Send a user message.
    ///
    /// The trimmed text is appended to the conversation at once and
    /// transmitted as-is. Rejected, without touching the conversation, when the
    /// connection is not open or the text is blank.
    pub fn send_message(&mut self, text: &str) -> Result<MessageId, ClientError> {
        if !self.is_connected() {
            error!("Cannot send message: assistant connection is not open");
            return Err(ClientError::NotConnected);
        }
        let Some(link) = self.link.as_ref() else {
            error!("Cannot send message: assistant connection is not open");
            return Err(ClientError::NotConnected);
        };
        let text = text.trim();
        if text.is_empty() {
            error!("Cannot send message: message is empty");
            return Err(ClientError::EmptyMessage);
        }
        if self.is_pending() {
            warn!("Sending while an answer is still pending; answers are paired by arrival order");
        }

        let id = self.store.append_user(text);
        self.pending.send_replace(true);
        debug!(len = text.len(), "Sending message to assistant");

        if let Err(reason) = link.send(text.to_string()) {
            self.handle_event(ConnectionEvent::Failed(reason));
        }
        Ok(id)
    }

    /// Remove every message and stop any reveal.
    pub fn clear(&mut self) {
        self.stop_reveal();
        self.store.clear();
    }

    /// Wait for the next transport event or reveal tick and apply it.
    ///
    /// Stays pending while there is neither a connection nor a reveal. Cancel
    /// safe, so it can sit in a `tokio::select!` next to user input.
    pub async fn next_event(&mut self) -> SessionEvent {
        loop {
            let wake = tokio::select! {
                biased;
                event = next_link_event(&mut self.link) => Wake::Link(event),
                _ = next_tick(&mut self.ticker) => Wake::Tick,
            };

            let event = match wake {
                Wake::Link(event) => Some(self.handle_event(event)),
                Wake::Tick => self.advance_reveal(),
            };
            if let Some(event) = event {
                return event;
            }
        }
    }

    /// Apply one transport event.
    pub fn handle_event(&mut self, event: ConnectionEvent) -> SessionEvent {
        match event {
            ConnectionEvent::Opened => {
                info!(url = %self.url, "Assistant connection open");
                self.connection.send_replace(ConnectionState::Connected);
                SessionEvent::Connected
            }
            ConnectionEvent::Received(frame) => self.accept_answer(&frame),
            ConnectionEvent::Closed => {
                info!(url = %self.url, "Assistant connection closed");
                self.drop_link();
                SessionEvent::Disconnected { reason: None }
            }
            ConnectionEvent::Failed(reason) => {
                error!(url = %self.url, error = %reason, "Assistant connection failed");
                self.drop_link();
                SessionEvent::Disconnected {
                    reason: Some(reason),
                }
            }
        }
    }

    fn accept_answer(&mut self, frame: &str) -> SessionEvent {
        let answer = Answer::from_frame(frame);
        self.pending.send_replace(false);

        let id = self.store.append_assistant_placeholder(answer.sources);
        if let Some(previous) = self.reveal.start(id.clone(), answer.content) {
            debug!(superseded = %previous, "New answer stops unfinished reveal");
        }

        let period = self.reveal_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);

        debug!(id = %id, "Answer received");
        SessionEvent::AnswerStarted(id)
    }

    fn advance_reveal(&mut self) -> Option<SessionEvent> {
        match self.reveal.tick() {
            RevealTick::Advanced {
                target,
                content,
                ch,
            } => {
                self.store.mutate_content(&target, content);
                Some(SessionEvent::RevealAdvanced { id: target, ch })
            }
            RevealTick::Finished { target } => {
                self.ticker = None;
                Some(SessionEvent::RevealFinished(target))
            }
            RevealTick::Idle => {
                self.ticker = None;
                None
            }
        }
    }

    fn drop_link(&mut self) {
        self.link = None;
        self.stop_reveal();
        self.mark_disconnected();
    }

    fn stop_reveal(&mut self) {
        self.ticker = None;
        if let Some(target) = self.reveal.cancel() {
            debug!(id = %target, "Reveal stopped");
        }
    }

    fn mark_disconnected(&mut self) {
        self.connection.send_if_modified(|state| {
            let changed = *state != ConnectionState::Disconnected;
            *state = ConnectionState::Disconnected;
            changed
        });
        self.pending.send_if_modified(|pending| std::mem::replace(pending, false));
    }
}

impl<C: Connector> Drop for ChatSession<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

async fn next_link_event(link: &mut Option<Link>) -> ConnectionEvent {
    match link {
        Some(link) => link.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
