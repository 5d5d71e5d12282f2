//! Append/patch-only log of the messages exchanged in a session.

use std::error::Error as StdError;
use std::fmt;

use super::message::{Message, MessageIdSource, Sender};

/// Raised when the trailing entry cannot be reconciled with a reply. This
/// means the log no longer matches the turn that produced the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    Empty,
    NotAssistant { sender: Sender },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Empty => {
                write!(f, "no assistant entry to reconcile: conversation is empty")
            }
            ReconcileError::NotAssistant { sender } => write!(
                f,
                "no assistant entry to reconcile: last entry was sent by {sender}"
            ),
        }
    }
}

impl StdError for ReconcileError {}

#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    ids: MessageIdSource,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the user's message followed by an empty assistant placeholder.
    /// Returns `false` without touching the log when the text is blank.
    pub fn append_turn(&mut self, user_text: &str) -> bool {
        if user_text.trim().is_empty() {
            return false;
        }

        let user_id = self.ids.next_id();
        self.messages.push(Message::new(user_id, Sender::User, user_text));
        let placeholder_id = self.ids.next_id();
        self.messages.push(Message::new(placeholder_id, Sender::Ai, String::new()));
        true
    }

    pub fn reconcile_last_assistant(
        &mut self,
        new_text: impl Into<String>,
    ) -> Result<&Message, ReconcileError> {
        let sender = match self.messages.last() {
            None => return Err(ReconcileError::Empty),
            Some(last) => last.sender,
        };
        if !sender.is_ai() {
            return Err(ReconcileError::NotAssistant { sender });
        }

        let id = self.ids.next_id();
        let last = self.messages.last_mut().ok_or(ReconcileError::Empty)?;
        last.id = id;
        last.text = new_text.into();
        Ok(last)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.is_user())
            .map(|message| message.text.as_str())
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, sender: Sender, text: &str) {
        let id = self.ids.next_id();
        self.messages.push(Message::new(id, sender, text));
    }
}
