//! The core models for managing a stateful chat with an LLM.
use crate::openai::{Message, Role};

/// Every message exchanged so far, sent in full on each request since
/// the service keeps no state between calls. Append only.
#[derive(Default, Debug, Clone)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    /// Starts a transcript whose first and only system message is the
    /// chatbot persona.
    pub fn with_persona(persona: &str) -> Self {
        Self(vec![Message::new(Role::System, persona)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }
}
