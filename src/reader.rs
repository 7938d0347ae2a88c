//! Pushback token reader.
//!
//! The engine walks the raw token array through this cursor so it can
//! split composite tokens (attached values, short clusters, macro
//! expansions) and re-inject the pieces for ordinary reprocessing.

use std::collections::VecDeque;

/// One item of the working stream.
///
/// `Attached` is an out-of-band marker the engine injects in front of a
/// value it split off an option token (`--name=value`, `-ovalue`, sign
/// suffixes). A slot that sees the marker consumes the following text
/// token unconditionally instead of deciding whether to read ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Attached,
}

/// Cursor over the token array with stack-ordered pushback.
#[derive(Debug)]
pub(crate) struct TokenReader {
    queue: VecDeque<Token>,
}

impl TokenReader {
    pub(crate) fn new<I>(tokens: I) -> TokenReader
    where
        I: IntoIterator<Item = String>,
    {
        TokenReader {
            queue: tokens.into_iter().map(Token::Text).collect(),
        }
    }

    /// The next item without consuming it; `None` at end of input.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.queue.front()
    }

    /// Consumes and returns the next item; `None` at end of input.
    pub(crate) fn read(&mut self) -> Option<Token> {
        self.queue.pop_front()
    }

    /// Consumes the next item only if it is a text token.
    pub(crate) fn read_text(&mut self) -> Option<String> {
        match self.queue.pop_front() {
            Some(Token::Text(text)) => Some(text),
            Some(other) => {
                self.queue.push_front(other);
                None
            }
            None => None,
        }
    }

    /// Re-presents `token` as the next item. Consecutive pushbacks read
    /// back last-in first-out.
    pub(crate) fn unread(&mut self, token: Token) {
        self.queue.push_front(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(tokens: &[&str]) -> TokenReader {
        TokenReader::new(tokens.iter().map(|t| t.to_string()))
    }

    #[test]
    fn test_reads_in_order_until_empty() {
        let mut r = reader(&["a", "b"]);
        assert_eq!(r.read(), Some(Token::Text("a".to_string())));
        assert_eq!(r.read(), Some(Token::Text("b".to_string())));
        assert_eq!(r.read(), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut r = reader(&["a"]);
        assert_eq!(r.peek(), Some(&Token::Text("a".to_string())));
        assert_eq!(r.peek(), Some(&Token::Text("a".to_string())));
        assert_eq!(r.read(), Some(Token::Text("a".to_string())));
        assert_eq!(r.peek(), None);
    }

    #[test]
    fn test_pushback_is_a_stack() {
        let mut r = reader(&["rest"]);
        r.unread(Token::Text("first".to_string()));
        r.unread(Token::Text("second".to_string()));
        assert_eq!(r.read(), Some(Token::Text("second".to_string())));
        assert_eq!(r.read(), Some(Token::Text("first".to_string())));
        assert_eq!(r.read(), Some(Token::Text("rest".to_string())));
    }

    #[test]
    fn test_read_text_leaves_markers_in_place() {
        let mut r = reader(&[]);
        r.unread(Token::Text("value".to_string()));
        r.unread(Token::Attached);
        assert_eq!(r.read_text(), None);
        assert_eq!(r.read(), Some(Token::Attached));
        assert_eq!(r.read_text(), Some("value".to_string()));
        assert_eq!(r.read_text(), None);
    }
}
