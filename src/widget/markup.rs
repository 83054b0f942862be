//! Message markup.
//!
//! Everything is escaped before any markup is applied, so `<b>hi</b>` typed by
//! a user (or echoed by the backend) shows up literally.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render bot text: escape, then `**bold**` → `<strong>`, then newline → `<br>`.
///
/// Bold runs never span a line break.
#[must_use]
pub fn render_bot_markup(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    bolded.replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Render bot text for an ANSI terminal: bold runs become SGR bold.
#[must_use]
pub fn render_terminal(text: &str) -> String {
    BOLD.replace_all(text, "\x1b[1m$1\x1b[0m").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>hi</b> & "you" 'me'"#),
            "&lt;b&gt;hi&lt;/b&gt; &amp; &quot;you&quot; &#39;me&#39;"
        );
    }

    #[test]
    fn test_bold_and_newline() {
        assert_eq!(
            render_bot_markup("hi **there**\nbye"),
            "hi <strong>there</strong><br>bye"
        );
    }

    #[test]
    fn test_markup_is_escaped_before_transform() {
        assert_eq!(
            render_bot_markup("**<b>x</b>**"),
            "<strong>&lt;b&gt;x&lt;/b&gt;</strong>"
        );
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        assert_eq!(render_bot_markup("**a\nb**"), "**a<br>b**");
    }

    #[test]
    fn test_multiple_bold_runs_are_lazy() {
        assert_eq!(
            render_bot_markup("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn test_terminal_rendering() {
        assert_eq!(render_terminal("a **b**"), "a \x1b[1mb\x1b[0m");
    }
}
