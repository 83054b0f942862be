//! Terminal front end for the chat widget.
//!
//! Each input line is submitted as a message; `/N` picks the N-th suggestion
//! of the latest bot message and `/quit` leaves.

use std::fmt;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::widget::markup::render_terminal;
use crate::widget::{Author, ChatController, ChatTransport, ChatView, HttpTransport, Message};

const TYPING: &str = "… agri écrit";

/// Prints the conversation as plain lines.
///
/// The first write failure is kept and nothing more is written after it.
#[derive(Debug)]
pub struct ConsoleView<W> {
    out: W,
    suggestions: Vec<String>,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            suggestions: Vec::new(),
            error: None,
        }
    }

    /// Suggestion `n` (1-based) of the latest bot message.
    #[must_use]
    pub fn suggestion(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    pub fn notice(&mut self, text: &str) {
        self.line(format_args!("   {text}"));
    }

    /// The write error that stopped output, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{args}") {
            self.error = Some(e);
        }
    }
}

impl<W: Write> ChatView for ConsoleView<W> {
    fn append_message(&mut self, message: &Message) {
        match message.author() {
            Author::User => {
                self.line(format_args!("vous › {}", message.text()));
            }
            Author::Bot => {
                self.line(format_args!("agri › {}", render_terminal(message.text())));
                for (i, suggestion) in message.suggestions().iter().enumerate() {
                    self.line(format_args!("   [/{}] {suggestion}", i + 1));
                }
                self.suggestions = message.suggestions().to_vec();
            }
        }
    }

    fn set_typing(&mut self, visible: bool) {
        if visible {
            self.line(format_args!("{TYPING}"));
        }
    }

    // The terminal echoes what the user types; nothing to mirror.
    fn set_draft(&mut self, _text: &str) {}

    fn scroll_to_latest(&mut self) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.flush() {
            self.error = Some(e);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Suggestion(usize),
    Text(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line == "/quit" {
        return Input::Quit;
    }
    match line.strip_prefix('/').map(str::parse::<usize>) {
        Some(Ok(n)) => Input::Suggestion(n),
        _ => Input::Text(line),
    }
}

/// Drive a controller from `input` until EOF or `/quit`.
///
/// Stops with the first error writing to the view's output.
pub async fn run_console<R, W, T>(
    input: R,
    view: ConsoleView<W>,
    transport: &T,
) -> io::Result<ChatController<ConsoleView<W>>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    T: ChatTransport + ?Sized,
{
    let mut controller = ChatController::new(view);
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Suggestion(n) => {
                let Some(label) = controller.view().suggestion(n).map(ToString::to_string) else {
                    controller.view_mut().notice("Pas de suggestion à ce numéro.");
                    continue;
                };
                controller.send_suggestion(&label, transport).await;
            }
            Input::Text(text) => {
                controller.send(text, transport).await;
            }
        }

        if let Some(e) = controller.view_mut().take_error() {
            return Err(e);
        }
    }

    Ok(controller)
}

/// Chat with the server at `url` over stdin/stdout.
pub async fn run_stdio(url: &str) -> anyhow::Result<()> {
    let transport = HttpTransport::new(url)?;
    let mut view = ConsoleView::new(io::stdout());
    view.notice(&format!("Connecté à {} (/quit pour sortir)", transport.endpoint()));
    if let Some(e) = view.take_error() {
        return Err(e.into());
    }

    run_console(BufReader::new(tokio::io::stdin()), view, &transport).await?;
    Ok(())
}
