//! Book/chapter/verse context and OSIS identifier synthesis.

use std::fmt;

/// Most verses a single bridge (`\v 5-6`) may cover.
pub const MAX_BRIDGE_VERSES: u32 = 200;

/// A verse number or bridged range (`5`, `5-6`, `5a`).
///
/// Letter suffixes (`5a`) are accepted and dropped for identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseSpan {
    pub start: u32,
    pub end: u32,
}

impl VerseSpan {
    pub fn single(verse: u32) -> Self {
        Self {
            start: verse,
            end: verse,
        }
    }

    /// Parse a verse argument.
    ///
    /// Returns `None` when the argument does not start with a number, the
    /// range runs backwards, or it covers more than [`MAX_BRIDGE_VERSES`].
    pub fn parse(arg: &str) -> Option<Self> {
        let (first, second) = match arg.split_once(['-', '\u{2013}']) {
            Some((a, b)) => (a, Some(b)),
            None => (arg, None),
        };
        let start = leading_number(first)?;
        let end = match second {
            Some(b) => leading_number(b)?,
            None => start,
        };
        (end >= start && end - start < MAX_BRIDGE_VERSES).then_some(Self { start, end })
    }

    pub fn is_range(&self) -> bool {
        self.end > self.start
    }
}

impl fmt::Display for VerseSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_range() {
            write!(f, "{}-{}", self.start, self.end)
        } else {
            write!(f, "{}", self.start)
        }
    }
}

/// Parse the digits at the start of `s` (`"12a"` → 12).
pub fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    s[..digits].parse().ok()
}

/// Current position in the book, used to build osisIDs.
///
/// Initialized from the book's OSIS code; chapter and verse markers move it
/// forward as they are consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceContext {
    book: String,
    chapter: u32,
    verse: Option<VerseSpan>,
}

impl ReferenceContext {
    pub fn new(book: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            chapter: 0,
            verse: None,
        }
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    /// Current chapter, or 0 before the first `\c`.
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse(&self) -> Option<VerseSpan> {
        self.verse
    }

    /// Enter a chapter; the verse is reset.
    pub fn set_chapter(&mut self, chapter: u32) {
        self.chapter = chapter;
        self.verse = None;
    }

    pub fn set_verse(&mut self, verse: VerseSpan) {
        self.verse = Some(verse);
    }

    /// `Book.Chapter`, or `None` before the first chapter.
    pub fn chapter_id(&self) -> Option<String> {
        (self.chapter > 0).then(|| format!("{}.{}", self.book, self.chapter))
    }

    /// Space-separated osisIDs of the current verse span.
    ///
    /// `Gen.3.5` for a single verse, `Gen.3.5 Gen.3.6` for `\v 5-6`.
    pub fn verse_ids(&self) -> Option<String> {
        let chapter = self.chapter_id()?;
        let span = self.verse?;
        let ids: Vec<String> = (span.start..=span.end)
            .map(|v| format!("{chapter}.{v}"))
            .collect();
        Some(ids.join(" "))
    }

    /// The most specific reference for the current position: verse ids,
    /// else the chapter, else the book.
    pub fn synthesize_ref(&self) -> String {
        self.verse_ids()
            .or_else(|| self.chapter_id())
            .unwrap_or_else(|| self.book.clone())
    }
}
