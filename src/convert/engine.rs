//! The marker-stream transducer.
//!
//! One [`Engine`] converts one buffer. It walks the token stream once,
//! keeps open elements on a [`ScopeStack`] and appends [`OsisEvent`]s.
//! Notes are converted by a child engine over the note body, so the
//! parent's stack never sees the note's inner scopes.

use std::iter::Peekable;

use memchr::memchr_iter;
use tracing::{debug, trace, warn};

use super::report::{Violation, ViolationKind};
use crate::books::BookNames;
use crate::collector::UnhandledTags;
use crate::config::{Conformance, ConvertConfig};
use crate::osis::{Element, OsisEvent};
use crate::patterns::XREF_TARGET_RE;
use crate::usfm::{
    Action, Argument, HEADING_TITLE, LevelStyle, Marker, RANK_CONTAINER, RANK_PARAGRAPH,
    ReferenceContext, ScopeClass, ScopeFrame, ScopeStack, TagRegistry, TagRule, TokenKind,
    Tokenizer, VerseSpan, leading_number, parse_attributes, parse_figure, split_attributes,
    tokenize,
};

/// Elements after whose end leading whitespace is dropped.
const BLOCK_ELEMENTS: &[&str] = &[
    "div", "p", "lg", "l", "list", "item", "table", "row", "cell", "title", "closer", "speaker",
    "caption", "figure",
];

/// Why a frame is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Explicit,
    Implicit,
    EndOfLine,
    EndOfInput,
}

/// A marker argument split off the following text token.
struct Taken<'a> {
    value: &'a str,
    rest: &'a str,
    /// Offset of `rest` in the tokenized buffer, when a text token was read.
    rest_start: Option<usize>,
}

/// Read a `\c 3`-style or `\toc1 Genesis`-style argument.
fn take_argument<'a>(tokens: &mut Peekable<Tokenizer<'a>>, kind: Argument) -> Taken<'a> {
    let Some(token) = tokens.next_if(|t| matches!(t.kind, TokenKind::Text(_))) else {
        return Taken {
            value: "",
            rest: "",
            rest_start: None,
        };
    };
    let text = token.text().unwrap_or_default();
    let (value, split) = match kind {
        Argument::Word => {
            let lead = text.len() - text.trim_start().len();
            let len = text[lead..]
                .find(char::is_whitespace)
                .unwrap_or(text.len() - lead);
            (&text[lead..lead + len], lead + len)
        }
        Argument::Line => {
            let nl = text.find('\n').unwrap_or(text.len());
            (text[..nl].trim(), nl)
        }
    };
    Taken {
        value,
        rest: &text[split..],
        rest_start: Some(token.span.start + split),
    }
}

/// Collapse ASCII whitespace runs to one space and map `~` to a no-break
/// space.
fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                if !in_space {
                    out.push(' ');
                    in_space = true;
                }
            }
            '~' => {
                out.push('\u{a0}');
                in_space = false;
            }
            _ => {
                out.push(c);
                in_space = false;
            }
        }
    }
    out
}

/// Append `value` to a space-separated attribute.
fn append_attribute(attributes: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    match attributes.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => {
            existing.push(' ');
            existing.push_str(value);
        }
        None => attributes.push((key, value.to_string())),
    }
}

fn set_attribute(attributes: &mut Vec<(&'static str, String)>, key: &'static str, value: String) {
    match attributes.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => attributes.push((key, value)),
    }
}

/// Line numbers of increasing byte offsets, counted incrementally.
#[derive(Debug, Clone, Copy)]
struct LineCursor {
    offset: usize,
    line: usize,
}

impl LineCursor {
    const START: Self = Self { offset: 0, line: 1 };

    fn line_at(&mut self, source: &str, offset: usize) -> usize {
        if offset < self.offset {
            *self = Self::START;
        }
        self.line += memchr_iter(b'\n', &source.as_bytes()[self.offset..offset]).count();
        self.offset = offset;
        self.line
    }
}

/// Shared, read-only inputs of an engine and its child engines.
#[derive(Clone, Copy)]
pub(super) struct Context<'a, 'r> {
    pub registry: &'r TagRegistry,
    pub config: &'a ConvertConfig,
    pub names: &'a BookNames,
    pub unhandled: &'a UnhandledTags,
    /// The whole book, for line numbers.
    pub source: &'a str,
}

pub(super) struct Engine<'a, 'r> {
    cx: Context<'a, 'r>,
    depth: usize,
    reference: ReferenceContext,
    stack: ScopeStack<'r>,
    events: Vec<OsisEvent>,
    violations: Vec<Violation>,
    /// sID of the open verse milestone.
    verse: Option<String>,
    /// sID of the open chapter milestone.
    chapter: Option<String>,
    /// Absolute offset of the marker being handled.
    offset: usize,
    lines: LineCursor,
}

impl<'a, 'r> Engine<'a, 'r> {
    pub fn new(cx: Context<'a, 'r>, reference: ReferenceContext) -> Self {
        Self {
            cx,
            depth: 0,
            reference,
            stack: ScopeStack::new(),
            events: Vec::new(),
            violations: Vec::new(),
            verse: None,
            chapter: None,
            offset: 0,
            lines: LineCursor::START,
        }
    }

    /// An engine for a note body at the current position.
    fn child(&self) -> Self {
        let mut child = Self::new(self.cx, self.reference.clone());
        child.depth = self.depth + 1;
        child.offset = self.offset;
        child.lines = self.lines;
        child
    }

    pub fn into_parts(self) -> (Vec<OsisEvent>, Vec<Violation>) {
        (self.events, self.violations)
    }

    /// Open the outermost frame (the book division).
    pub fn open_root(&mut self, rule: &'r TagRule, attributes: Vec<(&'static str, String)>) {
        self.open_frame(rule, None, attributes);
    }

    /// Convert `buf`, whose first byte sits at `base` in the book text.
    pub fn run(&mut self, buf: &'a str, base: usize) {
        let mut tokens = tokenize(buf).peekable();
        while let Some(token) = tokens.next() {
            self.offset = base + token.span.start;
            match token.kind {
                TokenKind::Text(text) => self.text(text),
                TokenKind::Marker(marker) => self.marker(marker, &mut tokens, buf, base),
            }
        }
    }

    /// End open milestones and close every open frame.
    pub fn finish(&mut self) {
        self.trim_trailing();
        self.end_verse();
        self.end_chapter();
        let frames = self.stack.drain_all();
        self.close_frames(frames, Closing::EndOfInput);
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn text(&mut self, text: &str) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.push_text(first);
        }
        for line in lines {
            self.end_line();
            if self.stack.keeps_lines() && !line.trim().is_empty() && !self.at_block_start() {
                self.trim_trailing();
                self.events.push(OsisEvent::Empty(Element::new("lb")));
            } else {
                self.push_text(" ");
            }
            self.push_text(line);
        }
    }

    fn at_block_start(&self) -> bool {
        match self.events.last() {
            None
            | Some(OsisEvent::Start(_))
            | Some(OsisEvent::Empty(_))
            | Some(OsisEvent::Comment(_)) => true,
            Some(OsisEvent::End(name)) => BLOCK_ELEMENTS.contains(name),
            Some(OsisEvent::Text(_)) => false,
        }
    }

    fn push_text(&mut self, raw: &str) {
        let text = normalize_text(raw);
        let text = if self.at_block_start() {
            text.trim_start_matches(' ')
        } else {
            text.as_str()
        };
        if text.is_empty() {
            return;
        }
        if let Some(OsisEvent::Text(prev)) = self.events.last_mut() {
            match text.strip_prefix(' ') {
                Some(stripped) if prev.ends_with(' ') => prev.push_str(stripped),
                _ => prev.push_str(text),
            }
        } else {
            self.events.push(OsisEvent::Text(text.to_string()));
        }
    }

    /// Drop trailing spaces of the last text event; returns whether any
    /// were removed.
    fn trim_trailing(&mut self) -> bool {
        let Some(OsisEvent::Text(text)) = self.events.last_mut() else {
            return false;
        };
        let len = text.trim_end_matches(' ').len();
        if len == text.len() {
            return false;
        }
        text.truncate(len);
        if text.is_empty() {
            self.events.pop();
        }
        true
    }

    /// Close line-scoped frames at a line break.
    fn end_line(&mut self) {
        if let Some(index) = self.stack.line_scope() {
            let frames = self.stack.truncate_to(index);
            self.close_frames(frames, Closing::EndOfLine);
        }
    }

    // ------------------------------------------------------------------
    // Markers
    // ------------------------------------------------------------------

    fn marker(
        &mut self,
        marker: Marker<'a>,
        tokens: &mut Peekable<Tokenizer<'a>>,
        buf: &'a str,
        base: usize,
    ) {
        let Some(rule) = self.cx.registry.lookup(marker.name) else {
            self.unhandled(&marker, ViolationKind::UnknownMarker);
            return;
        };
        let level = if rule.is_numbered() {
            marker.numeric_suffix
        } else {
            None
        };
        if self.cx.config.conformance == Conformance::Strict
            && let (Some(level), Some(max)) = (level, rule.max_level)
            && (level == 0 || level > max)
        {
            self.unhandled(&marker, ViolationKind::RefusedMarker);
            return;
        }
        trace!(marker = marker.name, ?level, "marker");

        if marker.closing {
            self.close_marker(rule, &marker);
            return;
        }

        match rule.action {
            Action::Discard => {
                let taken = take_argument(tokens, Argument::Line);
                debug!(marker = marker.name, value = taken.value, "discarding");
                self.text(taken.rest);
            }
            Action::Comment => {
                let taken = take_argument(tokens, Argument::Line);
                self.events
                    .push(OsisEvent::Comment(format!(" {}: {} ", marker.name, taken.value)));
                self.text(taken.rest);
            }
            Action::LineMilestone => {
                let taken = take_argument(tokens, rule.argument.unwrap_or(Argument::Line));
                self.implicit_close(rule, level);
                if let Some(template) = rule.element {
                    let element = Element::new(template.name)
                        .with("type", format!("x-usfm-{}", marker.name))
                        .with("n", taken.value);
                    self.events.push(OsisEvent::Empty(element));
                }
                self.text(taken.rest);
            }
            Action::Chapter => {
                let taken = take_argument(tokens, Argument::Word);
                match leading_number(taken.value).filter(|&n| n > 0) {
                    Some(number) => self.chapter(number, taken.value),
                    None => self.invalid_number(&marker, taken.value),
                }
                self.text(taken.rest);
            }
            Action::Verse => {
                let taken = take_argument(tokens, Argument::Word);
                match VerseSpan::parse(taken.value).filter(|span| span.start > 0) {
                    Some(span) => self.verse(rule, span, taken.value),
                    None => self.invalid_number(&marker, taken.value),
                }
                self.text(taken.rest);
            }
            Action::Heading { deeper } => self.heading(rule, level, deeper),
            Action::Note(_) => self.note(rule, &marker, tokens, buf, base),
            Action::Open
            | Action::Word
            | Action::Figure
            | Action::AnnotateRef
            | Action::XrefTarget => self.open(rule, level),
        }
    }

    /// Record a marker the engine will not translate.
    ///
    /// The collector keys on the opening form, so `\zzz` and `\zzz*` count
    /// once; the violation keeps the marker as written.
    fn unhandled(&mut self, marker: &Marker<'_>, kind: ViolationKind) {
        let opening = Marker {
            closing: false,
            ..*marker
        };
        self.cx.unhandled.record(opening.text().as_str());
        let text = marker.text();
        match self.cx.config.conformance {
            Conformance::Strict => {
                warn!(marker = text.as_str(), reason = %kind, "unhandled marker");
                self.violation(kind, text);
            }
            Conformance::Relaxed => debug!(marker = text.as_str(), "unhandled marker"),
        }
    }

    fn violation(&mut self, kind: ViolationKind, marker: String) {
        let offset = self.offset.min(self.cx.source.len());
        let line = self.lines.line_at(self.cx.source, offset);
        debug!(line, %kind, marker = marker.as_str(), "conformance violation");
        self.violations.push(Violation {
            kind,
            marker,
            offset,
            line,
        });
    }

    fn invalid_number(&mut self, marker: &Marker<'_>, value: &str) {
        self.violation(ViolationKind::InvalidNumber, format!("{} {value}", marker.text()));
        self.push_text(value);
    }

    fn close_marker(&mut self, rule: &'r TagRule, marker: &Marker<'_>) {
        match self.stack.close(rule.name) {
            Ok(frames) => self.close_frames(frames, Closing::Explicit),
            Err(_) => self.violation(ViolationKind::UnmatchedCloseMarker, marker.text()),
        }
    }

    fn implicit_close(&mut self, rule: &TagRule, level: Option<u32>) {
        let frames = self.stack.implicit_close_if_needed(rule, level);
        self.close_frames(frames, Closing::Implicit);
    }

    // ------------------------------------------------------------------
    // Chapters, verses and headings
    // ------------------------------------------------------------------

    fn end_verse(&mut self) {
        if let Some(id) = self.verse.take() {
            self.events
                .push(OsisEvent::Empty(Element::new("verse").with("eID", id)));
        }
    }

    fn end_chapter(&mut self) {
        if let Some(id) = self.chapter.take() {
            self.events
                .push(OsisEvent::Empty(Element::new("chapter").with("eID", id)));
        }
    }

    fn chapter(&mut self, number: u32, label: &str) {
        let frames = self.stack.close_through_rank(RANK_CONTAINER);
        self.close_frames(frames, Closing::Implicit);
        self.end_verse();
        self.end_chapter();

        self.reference.set_chapter(number);
        let Some(id) = self.reference.chapter_id() else {
            return;
        };
        let element = Element::new("chapter")
            .with("sID", id.as_str())
            .with("osisID", id.as_str())
            .with("n", label);
        self.events.push(OsisEvent::Empty(element));
        self.chapter = Some(id);
    }

    fn verse(&mut self, rule: &'r TagRule, span: VerseSpan, label: &str) {
        if self.reference.chapter() == 0 {
            debug!("verse before first chapter; starting chapter 1");
            self.chapter(1, "1");
        }
        self.implicit_close(rule, None);
        self.end_verse();

        self.reference.set_verse(span);
        let Some(ids) = self.reference.verse_ids() else {
            return;
        };
        let element = Element::new("verse")
            .with("sID", ids.as_str())
            .with("osisID", ids.as_str())
            .with("n", label);
        self.events.push(OsisEvent::Empty(element));
        self.verse = Some(ids);
    }

    fn heading(&mut self, rule: &'r TagRule, level: Option<u32>, deeper: &'static str) {
        self.implicit_close(rule, level);
        self.end_verse();
        let mut attributes = self.element_attributes(rule, level);
        if level.unwrap_or(1) > 1 {
            set_attribute(&mut attributes, "type", deeper.to_string());
        }
        self.open_frame(rule, level, attributes);
        self.open_frame(&HEADING_TITLE, None, Vec::new());
    }

    // ------------------------------------------------------------------
    // Generic scopes
    // ------------------------------------------------------------------

    /// Attributes of `rule`'s element with the level applied.
    fn element_attributes(&self, rule: &TagRule, level: Option<u32>) -> Vec<(&'static str, String)> {
        let Some(template) = rule.element else {
            return Vec::new();
        };
        let mut attributes: Vec<(&'static str, String)> = template
            .attributes
            .iter()
            .map(|&(k, v)| (k, v.to_string()))
            .collect();
        if !rule.is_numbered() {
            return attributes;
        }
        let level = level.unwrap_or(1);
        match rule.level_style {
            LevelStyle::Hidden => {}
            LevelStyle::Attribute => attributes.push(("level", level.to_string())),
            LevelStyle::TypeSuffix if level > 1 => {
                let base = template
                    .attributes
                    .iter()
                    .find(|(k, _)| *k == "type")
                    .map_or("x-level", |(_, v)| *v);
                set_attribute(&mut attributes, "type", format!("{base}-{level}"));
            }
            LevelStyle::TypeSuffix => {}
        }
        attributes
    }

    fn open(&mut self, rule: &'r TagRule, level: Option<u32>) {
        self.implicit_close(rule, level);

        if rule.scope == ScopeClass::SelfClosing {
            if let Some(template) = rule.element {
                let attributes = self.element_attributes(rule, level);
                self.events.push(OsisEvent::Empty(Element {
                    name: template.name,
                    attributes,
                }));
            }
            return;
        }

        if let Some(container) = rule.container {
            let wrapper = container.rule();
            if !self.stack.top().is_some_and(|f| std::ptr::eq(f.rule, wrapper)) {
                let attributes = self.element_attributes(wrapper, None);
                self.open_frame(wrapper, None, attributes);
            }
        }

        let mut attributes = self.element_attributes(rule, level);
        if rule.action == Action::AnnotateRef {
            attributes.push(("osisRef", self.reference.synthesize_ref()));
        }
        self.open_frame(rule, level, attributes);
    }

    fn open_frame(
        &mut self,
        rule: &'r TagRule,
        level: Option<u32>,
        attributes: Vec<(&'static str, String)>,
    ) {
        if let Some(template) = rule.element {
            self.events.push(OsisEvent::Start(Element {
                name: template.name,
                attributes: attributes.clone(),
            }));
        }
        let opened_at = self.events.len().saturating_sub(1);
        self.stack
            .open(ScopeFrame::new(rule, level, opened_at).with_attributes(attributes));
    }

    fn close_frames(&mut self, frames: Vec<ScopeFrame<'r>>, how: Closing) {
        for frame in frames {
            self.close_frame(frame, how);
        }
    }

    fn close_frame(&mut self, mut frame: ScopeFrame<'r>, how: Closing) {
        let Some(name) = frame.element_name() else {
            return;
        };
        match frame.rule.action {
            Action::Word => self.finish_word(&mut frame),
            Action::Figure => self.finish_figure(&mut frame),
            Action::XrefTarget => self.finish_xref(&mut frame),
            _ => {}
        }
        if let Some(OsisEvent::Start(start)) = self.events.get_mut(frame.opened_at) {
            start.attributes = std::mem::take(&mut frame.attributes);
        }

        let block = frame.rule.is_block() || frame.rule.is_container();
        let moved_space = if block {
            self.trim_trailing();
            false
        } else {
            matches!(how, Closing::Implicit | Closing::EndOfInput | Closing::EndOfLine)
                && self.trim_trailing()
        };
        self.events.push(OsisEvent::End(name));
        if moved_space {
            self.push_text(" ");
        }
    }

    /// Text of the frame's content when it is nothing but text.
    fn plain_content(&self, frame: &ScopeFrame<'_>) -> Option<String> {
        let content = self.events.get(frame.opened_at + 1..)?;
        let mut text = String::new();
        for event in content {
            text.push_str(event.text()?);
        }
        Some(text)
    }

    fn finish_word(&mut self, frame: &mut ScopeFrame<'r>) {
        if self.events.len() <= frame.opened_at + 1 {
            return;
        }
        let Some(OsisEvent::Text(text)) = self.events.last() else {
            return;
        };
        let Some((visible, attrs)) = split_attributes(text) else {
            return;
        };
        let visible = visible.trim_end().to_string();
        let default = frame.rule.default_attribute.unwrap_or("lemma");
        let parsed = match parse_attributes(attrs, default) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "word attributes kept as text");
                self.violation(ViolationKind::MalformedAttributeSyntax, format!("\\{}", frame.rule.name));
                return;
            }
        };

        self.events.pop();
        if !visible.is_empty() {
            self.events.push(OsisEvent::Text(visible));
        }
        for attr in parsed {
            match attr.key.as_str() {
                "lemma" => append_attribute(&mut frame.attributes, "lemma", &attr.value),
                "strong" => {
                    for number in attr.value.split([',', ' ']).filter(|s| !s.is_empty()) {
                        append_attribute(&mut frame.attributes, "lemma", &format!("strong:{number}"));
                    }
                }
                "x-morph" | "morph" => set_attribute(&mut frame.attributes, "morph", attr.value),
                "srcloc" => set_attribute(&mut frame.attributes, "src", attr.value),
                "gloss" => set_attribute(&mut frame.attributes, "gloss", attr.value),
                other => debug!(attribute = other, "dropping word attribute"),
            }
        }
    }

    fn finish_figure(&mut self, frame: &mut ScopeFrame<'r>) {
        let Some(content) = self.plain_content(frame) else {
            return;
        };
        let default = frame.rule.default_attribute.unwrap_or("src");
        let figure = match parse_figure(&content, default) {
            Ok(figure) => figure,
            Err(e) => {
                debug!(error = %e, "figure kept as text");
                self.violation(ViolationKind::MalformedAttributeSyntax, "\\fig".to_string());
                return;
            }
        };

        self.events.truncate(frame.opened_at + 1);
        let fields = [
            ("src", figure.src),
            ("size", figure.size),
            ("alt", figure.alt),
            ("rights", figure.copy),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                set_attribute(&mut frame.attributes, key, value);
            }
        }
        if !figure.caption.is_empty() || figure.reference.is_some() {
            self.events.push(OsisEvent::Start(Element::new("caption")));
            if !figure.caption.is_empty() {
                self.events.push(OsisEvent::Text(figure.caption));
            }
            if let Some(reference) = figure.reference {
                let element = Element::new("reference").with("type", "annotateRef");
                self.events.push(OsisEvent::Start(element));
                self.events.push(OsisEvent::Text(reference));
                self.events.push(OsisEvent::End("reference"));
            }
            self.events.push(OsisEvent::End("caption"));
        }
    }

    fn finish_xref(&mut self, frame: &mut ScopeFrame<'r>) {
        let Some(content) = self.plain_content(frame) else {
            return;
        };
        let Some(caps) = XREF_TARGET_RE.captures(&content) else {
            return;
        };
        let Some(book) = caps.get(1).and_then(|m| self.cx.names.resolve(m.as_str())) else {
            debug!(target = content.as_str(), "unresolved cross reference");
            return;
        };
        let chapter = &caps[2];
        let target = match (caps.get(3), caps.get(4)) {
            (Some(start), Some(end)) => format!(
                "{book}.{chapter}.{}-{book}.{chapter}.{}",
                start.as_str(),
                end.as_str()
            ),
            (Some(verse), None) => format!("{book}.{chapter}.{}", verse.as_str()),
            _ => format!("{book}.{chapter}"),
        };
        set_attribute(&mut frame.attributes, "osisRef", target);
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    /// Whether `name` ends a note body that has no closer.
    fn ends_note(&self, name: &str, opener: &TagRule) -> bool {
        match self.cx.registry.lookup(name) {
            Some(rule) => {
                matches!(rule.action, Action::Chapter | Action::Verse)
                    || rule.name == opener.name
                    || (rule.is_block() && rule.rank >= RANK_PARAGRAPH)
            }
            None => false,
        }
    }

    fn note(
        &mut self,
        rule: &'r TagRule,
        marker: &Marker<'_>,
        tokens: &mut Peekable<Tokenizer<'a>>,
        buf: &'a str,
        base: usize,
    ) {
        let caller = take_argument(tokens, Argument::Word);
        let body_start = caller
            .rest_start
            .or_else(|| tokens.peek().map(|t| t.span.start))
            .unwrap_or(buf.len());

        let mut terminated = false;
        let mut body_end = buf.len();
        while let Some(token) = tokens.peek() {
            let start = token.span.start;
            let (closes, ends) = match token.marker() {
                Some(m) if m.closing => (
                    self.cx.registry.lookup(m.name).is_some_and(|r| r.name == rule.name),
                    false,
                ),
                Some(m) => (false, self.ends_note(m.name, rule)),
                None => (false, false),
            };
            if closes {
                tokens.next();
                body_end = start;
                terminated = true;
                break;
            }
            if ends {
                body_end = start;
                break;
            }
            tokens.next();
        }

        if !terminated {
            self.violation(ViolationKind::UnterminatedNote, marker.text());
        }
        if self.depth + 1 > self.cx.config.note_depth {
            self.violation(ViolationKind::NoteDepthExceeded, marker.text());
            return;
        }

        let mut attributes = self.element_attributes(rule, None);
        let caller = if caller.value.is_empty() { "+" } else { caller.value };
        if caller != "-" {
            attributes.push(("n", caller.to_string()));
        }
        attributes.push(("osisRef", self.reference.synthesize_ref()));

        let mut child = self.child();
        child.run(&buf[body_start..body_end], base + body_start);
        child.finish();
        child.trim_trailing();

        let name = rule.element.map_or("note", |t| t.name);
        self.events.push(OsisEvent::Start(Element { name, attributes }));
        self.events.append(&mut child.events);
        self.events.push(OsisEvent::End(name));
        self.violations.append(&mut child.violations);
    }
}
