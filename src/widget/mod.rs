//! Chat widget controller.
//!
//! The widget reads user input, appends user and bot messages to an ordered
//! list, calls the chat endpoint and toggles a typing indicator while a request
//! is outstanding. Rendering is delegated to a [`ChatView`], so the same
//! controller drives the terminal front end and headless tests; the browser
//! page in `static/chat.js` follows the same contract.
//!
//! # Structure
//!
//! - [`message`]: message model and author roles
//! - [`markup`]: HTML escaping and the minimal bot markup transform
//! - [`view`]: view-update interface plus an in-memory view
//! - [`transport`]: request/reply types and the HTTP transport
//! - [`controller`]: the controller itself

pub mod controller;
pub mod markup;
pub mod message;
pub mod transport;
pub mod view;

pub use controller::{APOLOGY, ChatController, PendingRequest, Submission};
pub use message::{Author, Message};
pub use transport::{ChatError, ChatReply, ChatRequest, ChatTransport, HttpTransport};
pub use view::{ChatView, MemoryView};
