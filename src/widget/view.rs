//! View-update interface for the chat widget.

use super::message::Message;

/// Everything the controller needs from a concrete UI.
///
/// Implementations own their presentation: the browser page writes DOM nodes,
/// the terminal view prints lines. `scroll_to_latest` is called after every
/// appended message; views that lay out asynchronously should defer it until
/// layout settles.
pub trait ChatView {
    /// Append a message at the end of the visible list.
    fn append_message(&mut self, message: &Message);

    /// Show or hide the typing indicator.
    fn set_typing(&mut self, visible: bool);

    /// Replace the contents of the input field.
    fn set_draft(&mut self, text: &str);

    /// Move the message list to its newest entry.
    fn scroll_to_latest(&mut self);
}

/// Headless view that records every update.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    pub messages: Vec<Message>,
    pub typing: bool,
    /// Every indicator transition, in order.
    pub typing_history: Vec<bool>,
    pub draft: String,
    pub scrolls: usize,
}

impl MemoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatView for MemoryView {
    fn append_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }

    fn set_typing(&mut self, visible: bool) {
        self.typing = visible;
        self.typing_history.push(visible);
    }

    fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    fn scroll_to_latest(&mut self) {
        self.scrolls += 1;
    }
}
