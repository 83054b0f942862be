//! The chat widget controller.

use tracing::{debug, warn};

use super::message::Message;
use super::transport::{ChatError, ChatReply, ChatTransport};
use super::view::ChatView;

/// Bot message shown when a request fails for any reason.
pub const APOLOGY: &str =
    "Désolé, une erreur s'est produite. Veuillez réessayer dans un instant.";

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Text was empty or whitespace; nothing happened.
    Empty,
    /// A request is already outstanding; nothing happened.
    Busy,
    /// The user message was appended and a request must now be sent.
    Sent(PendingRequest),
}

impl Submission {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// The payload of an outstanding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    message: String,
}

impl PendingRequest {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Drives a [`ChatView`]: owns the draft, the append-only message list and
/// the single-flight request guard.
///
/// The network call is split in two so event loops can stay responsive:
/// [`submit`](Self::submit) appends the user message and returns the
/// [`PendingRequest`]; [`complete`](Self::complete) applies the reply or
/// failure. [`send`](Self::send) does both against a [`ChatTransport`].
#[derive(Debug)]
pub struct ChatController<V> {
    view: V,
    draft: String,
    messages: Vec<Message>,
    in_flight: bool,
}

impl<V: ChatView> ChatController<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            draft: String::new(),
            messages: Vec::new(),
            in_flight: false,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Messages in the order they were displayed.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a request is outstanding (the typing indicator is visible).
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Record typing in the input field.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.view.set_draft(&self.draft);
    }

    /// Submit `text` as a user message.
    pub fn submit(&mut self, text: &str) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            return Submission::Empty;
        }
        if self.in_flight {
            debug!(name: "widget.submit.busy", "Submission rejected while a request is outstanding");
            return Submission::Busy;
        }

        self.push(Message::user(text));
        self.draft.clear();
        self.view.set_draft("");
        self.in_flight = true;
        self.view.set_typing(true);

        Submission::Sent(PendingRequest {
            message: text.to_string(),
        })
    }

    /// Submit whatever is in the draft.
    pub fn submit_draft(&mut self) -> Submission {
        let text = self.draft.clone();
        self.submit(&text)
    }

    /// Put a suggestion label in the draft and submit it.
    pub fn select_suggestion(&mut self, label: &str) -> Submission {
        self.set_draft(label);
        self.submit_draft()
    }

    /// Apply the outcome of the outstanding request.
    ///
    /// Ignored when nothing is outstanding.
    pub fn complete(&mut self, outcome: Result<ChatReply, ChatError>) {
        if !self.in_flight {
            debug!(name: "widget.complete.stale", "No outstanding request; outcome dropped");
            return;
        }
        self.in_flight = false;
        self.view.set_typing(false);

        let message = match outcome {
            Ok(reply) => Message::bot(reply.response, reply.suggestions),
            Err(e) => {
                warn!(name: "widget.request.failed", error = %e, "Chat request failed");
                Message::bot(APOLOGY, Vec::new())
            }
        };
        self.push(message);
    }

    /// Submit `text` and, if a request is due, perform it over `transport`.
    pub async fn send<T>(&mut self, text: &str, transport: &T) -> Submission
    where
        T: ChatTransport + ?Sized,
    {
        let submission = self.submit(text);
        if let Submission::Sent(pending) = &submission {
            let outcome = transport.send(pending.message()).await;
            self.complete(outcome);
        }
        submission
    }

    /// [`select_suggestion`](Self::select_suggestion) followed by the request.
    pub async fn send_suggestion<T>(&mut self, label: &str, transport: &T) -> Submission
    where
        T: ChatTransport + ?Sized,
    {
        self.set_draft(label);
        let text = self.draft.clone();
        self.send(&text, transport).await
    }

    fn push(&mut self, message: Message) {
        self.view.append_message(&message);
        self.messages.push(message);
        self.view.scroll_to_latest();
    }
}
