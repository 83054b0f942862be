//! Chat message model.

use serde::{Deserialize, Serialize};

use super::markup::{escape_html, render_bot_markup};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// Typed by the person using the widget.
    User,
    /// Returned by the chat endpoint (or the local apology).
    Bot,
}

/// A rendered chat message.
///
/// Messages are immutable once created. Only bot messages carry suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    author: Author,
    text: String,
    suggestions: Vec<String>,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            suggestions: Vec::new(),
        }
    }

    /// Create a bot message with its ordered suggestions.
    pub fn bot(text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            author: Author::Bot,
            text: text.into(),
            suggestions,
        }
    }

    #[must_use]
    pub fn author(&self) -> Author {
        self.author
    }

    /// Raw, unescaped text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// HTML fragment for the message body.
    ///
    /// Text is always escaped first; the bold/line-break transform applies to
    /// bot messages only.
    #[must_use]
    pub fn html(&self) -> String {
        match self.author {
            Author::User => escape_html(&self.text),
            Author::Bot => render_bot_markup(&self.text),
        }
    }
}
