//! Conversation-related types.

use std::slice;

use little_chat_model::ModelMessage;

/// The ordered record of messages exchanged with a completion service.
///
/// Insertion order is the conversational turn order sent to the model.
/// Callers only ever get snapshots of a transcript; the owning
/// [`ChatClient`](crate::ChatClient) is the only writer.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub(crate) items: Vec<ModelMessage>,
}

impl Transcript {
    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last(&self) -> Option<&ModelMessage> {
        self.items.last()
    }

    /// Returns all messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.items
    }

    /// Iterates over the messages, oldest first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, ModelMessage> {
        self.items.iter()
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: ModelMessage) {
        self.items.push(msg);
    }

    #[inline]
    pub(crate) fn pop_last(&mut self) -> Option<ModelMessage> {
        self.items.pop()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ModelMessage;
    type IntoIter = slice::Iter<'a, ModelMessage>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
