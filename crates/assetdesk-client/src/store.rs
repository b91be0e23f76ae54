//! Ordered, observable log of chat messages.

use tokio::sync::watch;

use assetdesk_core::{ChatMessage, MessageId};

/// Chat history for one session.
///
/// Messages are only ever appended; the one in-place change is replacing an
/// assistant message's content while it is revealed. Every change is published
/// to [`MessageStore::subscribe`] receivers.
///
/// Only the owning [`ChatSession`](crate::ChatSession) writes to the store;
/// callers outside this crate can read and observe it but not change it:
///
/// ```compile_fail
/// let store = assetdesk_client::MessageStore::new();
/// store.clear();
/// ```
///
/// ```compile_fail
/// let store = assetdesk_client::MessageStore::new();
/// store.append_user("typed by hand");
/// ```
#[derive(Debug)]
pub struct MessageStore {
    messages: watch::Sender<Vec<ChatMessage>>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self { messages }
    }

    /// Observe the message list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    /// Copy of the current messages.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    /// Copy of one message.
    pub fn get(&self, id: &MessageId) -> Option<ChatMessage> {
        self.messages.borrow().iter().find(|m| &m.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Append a user message and return its id.
    pub(crate) fn append_user(&self, content: impl Into<String>) -> MessageId {
        self.push(ChatMessage::user(content))
    }

    /// Append an empty assistant message with the given citations and return
    /// its id.
    pub(crate) fn append_assistant_placeholder(&self, sources: Vec<String>) -> MessageId {
        self.push(ChatMessage::assistant_placeholder(sources))
    }

    /// Replace the content of message `id`. Does nothing if it no longer
    /// exists.
    pub(crate) fn mutate_content(&self, id: &MessageId, content: String) -> bool {
        self.messages.send_if_modified(|messages| {
            match messages.iter_mut().find(|m| &m.id == id) {
                Some(message) => {
                    message.content = content;
                    true
                }
                None => false,
            }
        })
    }

    /// Remove every message.
    pub(crate) fn clear(&self) {
        self.messages.send_if_modified(|messages| {
            let changed = !messages.is_empty();
            messages.clear();
            changed
        });
    }

    fn push(&self, message: ChatMessage) -> MessageId {
        let id = message.id.clone();
        self.messages.send_modify(|messages| messages.push(message));
        id
    }
}
