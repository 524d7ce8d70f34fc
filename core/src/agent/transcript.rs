//! Conversation transcript
//!
//! The ordered message log sent to the provider on every iteration.
//! Append-only: it starts with exactly one system message followed by the
//! user query, grows at the tail, and is never reordered or truncated.
//! One transcript lives for exactly one `run`.

use crate::llm::Message;

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Bootstrap a transcript with the system instructions and user query
    pub fn new(system: impl Into<String>, query: impl Into<String>) -> Self {
        Transcript {
            messages: vec![Message::system(system), Message::user(query)],
        }
    }

    /// Append a message at the tail
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full message sequence, in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
