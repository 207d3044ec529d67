//! USFM tokenizer.
//!
//! Splits a decoded buffer into an alternating sequence of text runs and
//! marker tokens. A marker is a backslash, an optional `+` (nested character
//! style), one or more ASCII alphanumerics and an optional trailing `*`.
//! A single whitespace character after an opening marker is its separator
//! and belongs to the marker token, not to the following text.
//!
//! Stray backslashes that do not start a marker are passed through as
//! literal text. Newlines inside text runs are kept so the engine can make
//! line-scoping and whitespace decisions.

use std::ops::Range;

use memchr::memchr;

/// A parsed marker such as `\q2`, `\f*` or `\+nd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Identifier as written, without backslash, `+` or `*` (e.g. `q2`).
    pub name: &'a str,
    /// Trailing digits of the identifier, if any (`2` for `q2`).
    pub numeric_suffix: Option<u32>,
    /// Whether this is an explicit end marker (`\xxx*`).
    pub closing: bool,
    /// Whether the marker used the nested `\+xxx` form.
    pub nested: bool,
}

impl<'a> Marker<'a> {
    /// Parse a marker identifier with its `+`/`*` decorations.
    fn new(name: &'a str, closing: bool, nested: bool) -> Self {
        let base_len = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let numeric_suffix = if base_len > 0 && base_len < name.len() {
            name[base_len..].parse().ok()
        } else {
            None
        };
        Self {
            name,
            numeric_suffix,
            closing,
            nested,
        }
    }

    /// Identifier with any numeric suffix removed (`q` for `q2`).
    pub fn base(&self) -> &'a str {
        match self.numeric_suffix {
            Some(_) => self.name.trim_end_matches(|c: char| c.is_ascii_digit()),
            None => self.name,
        }
    }

    /// The marker as it appears in source, e.g. `\+nd*`.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 3);
        out.push('\\');
        if self.nested {
            out.push('+');
        }
        out.push_str(self.name);
        if self.closing {
            out.push('*');
        }
        out
    }
}

/// Token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Marker(Marker<'a>),
    Text(&'a str),
}

/// A token with its byte span in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn marker(&self) -> Option<&Marker<'a>> {
        match &self.kind {
            TokenKind::Marker(m) => Some(m),
            TokenKind::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Text(t) => Some(t),
            TokenKind::Marker(_) => None,
        }
    }
}

/// Lazy single-pass tokenizer over a USFM buffer.
///
/// Restarting means calling [`tokenize`] again on the same buffer.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    buf: &'a str,
    pos: usize,
}

/// Tokenize a buffer.
///
/// # Examples
///
/// ```
/// use usfm2osis::usfm::{TokenKind, tokenize};
///
/// let kinds: Vec<_> = tokenize("\\p text").map(|t| t.kind).collect();
/// assert_eq!(kinds.len(), 2);
/// assert_eq!(kinds[1], TokenKind::Text("text"));
/// ```
pub fn tokenize(buf: &str) -> Tokenizer<'_> {
    Tokenizer { buf, pos: 0 }
}

impl<'a> Tokenizer<'a> {
    /// Byte offset of the next token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Try to read a marker starting at `at` (which holds a backslash).
    ///
    /// Returns the marker and the offset just past it, including the
    /// separator whitespace of an opening marker.
    fn marker_at(&self, at: usize) -> Option<(Marker<'a>, usize)> {
        let bytes = self.buf.as_bytes();
        let mut i = at + 1;
        let nested = bytes.get(i) == Some(&b'+');
        if nested {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
            i += 1;
        }
        if i == name_start {
            return None;
        }
        let name = &self.buf[name_start..i];
        let closing = bytes.get(i) == Some(&b'*');
        if closing {
            i += 1;
        } else {
            match bytes.get(i) {
                Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => i += 2,
                Some(b' ' | b'\t' | b'\n' | b'\r') => i += 1,
                _ => {}
            }
        }
        Some((Marker::new(name, closing, nested), i))
    }

    /// Find where the text run starting at `from` ends.
    fn text_end(&self, from: usize) -> usize {
        let bytes = self.buf.as_bytes();
        let mut search = from;
        while let Some(offset) = memchr(b'\\', &bytes[search..]) {
            let at = search + offset;
            if at > from && self.marker_at(at).is_some() {
                return at;
            }
            search = at + 1;
        }
        bytes.len()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;

        if self.buf.as_bytes()[start] == b'\\'
            && let Some((marker, end)) = self.marker_at(start)
        {
            self.pos = end;
            return Some(Token {
                kind: TokenKind::Marker(marker),
                span: start..end,
            });
        }

        let end = self.text_end(start);
        self.pos = end;
        Some(Token {
            kind: TokenKind::Text(&self.buf[start..end]),
            span: start..end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(buf: &str) -> Vec<TokenKind<'_>> {
        tokenize(buf).map(|t| t.kind).collect()
    }

    #[test]
    fn test_marker_and_text() {
        let tokens = kinds("\\v 1 In the beginning");
        assert_eq!(tokens.len(), 2);
        let TokenKind::Marker(m) = tokens[0] else {
            panic!("expected marker");
        };
        assert_eq!(m.name, "v");
        assert!(!m.closing);
        assert_eq!(tokens[1], TokenKind::Text("1 In the beginning"));
    }

    #[test]
    fn test_numeric_suffix() {
        let tokens = kinds("\\q2 line");
        let TokenKind::Marker(m) = tokens[0] else {
            panic!("expected marker");
        };
        assert_eq!(m.name, "q2");
        assert_eq!(m.base(), "q");
        assert_eq!(m.numeric_suffix, Some(2));
    }

    #[test]
    fn test_toc_keeps_full_name_but_reports_suffix() {
        let tokens = kinds("\\toc3 Gen");
        let TokenKind::Marker(m) = tokens[0] else {
            panic!("expected marker");
        };
        assert_eq!(m.base(), "toc");
        assert_eq!(m.numeric_suffix, Some(3));
    }

    #[test]
    fn test_closing_marker_keeps_following_text() {
        let tokens = kinds("\\nd Lord\\nd*'s");
        assert_eq!(tokens.len(), 4);
        let TokenKind::Marker(close) = tokens[2] else {
            panic!("expected marker");
        };
        assert!(close.closing);
        assert_eq!(close.name, "nd");
        assert_eq!(tokens[3], TokenKind::Text("'s"));
    }

    #[test]
    fn test_nested_marker() {
        let tokens = kinds("\\+nd God\\+nd*");
        let TokenKind::Marker(open) = tokens[0] else {
            panic!("expected marker");
        };
        assert!(open.nested);
        assert_eq!(open.name, "nd");
        assert_eq!(open.text(), "\\+nd");
    }

    #[test]
    fn test_stray_backslash_is_text() {
        let tokens = kinds("a \\ b \\\\ c");
        assert_eq!(tokens, vec![TokenKind::Text("a \\ b \\\\ c")]);
    }

    #[test]
    fn test_stray_backslash_before_marker() {
        let tokens = kinds("x \\ \\p y");
        assert_eq!(tokens[0], TokenKind::Text("x \\ "));
        assert!(matches!(tokens[1], TokenKind::Marker(m) if m.name == "p"));
        assert_eq!(tokens[2], TokenKind::Text("y"));
    }

    #[test]
    fn test_newlines_retained_in_text() {
        let tokens = kinds("\\p\nline one\nline two\n\\p");
        assert_eq!(tokens[1], TokenKind::Text("line one\nline two\n"));
    }

    #[test]
    fn test_only_one_separator_consumed() {
        let tokens = kinds("\\p  two spaces");
        assert_eq!(tokens[1], TokenKind::Text(" two spaces"));
    }

    #[test]
    fn test_adjacent_markers() {
        let tokens = kinds("\\f*\\x*");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_spans_cover_buffer() {
        let buf = "\\id GEN\n\\c 1\n\\p\n\\v 1 text \\w word\\w* end";
        let mut expected = 0;
        for token in tokenize(buf) {
            assert_eq!(token.span.start, expected);
            expected = token.span.end;
        }
        assert_eq!(expected, buf.len());
    }

    #[test]
    fn test_restart_yields_same_sequence() {
        let buf = "\\c 1 \\v 1 a \\zzz b";
        let first: Vec<_> = tokenize(buf).collect();
        let second: Vec<_> = tokenize(buf).collect();
        assert_eq!(first, second);
    }
}
