//! Scope stack of open elements.
//!
//! Frames are pushed when a marker opens a scope and popped on an explicit
//! `\xxx*`, an implicit closure, or end of document. Popping never emits
//! output by itself; callers receive the popped frames innermost-first and
//! turn them into close events.

use super::registry::{RANK_BOOK, TagRule};

/// One open scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame<'r> {
    pub rule: &'r TagRule,
    /// Numeric suffix of the opening marker (`2` for `\q2`).
    pub level: Option<u32>,
    pub rank: u8,
    /// Index of the frame's start event in the output stream.
    pub opened_at: usize,
    /// Attributes emitted on the start element.
    pub attributes: Vec<(&'static str, String)>,
}

impl<'r> ScopeFrame<'r> {
    pub fn new(rule: &'r TagRule, level: Option<u32>, opened_at: usize) -> Self {
        Self {
            rule,
            level,
            rank: rule.frame_rank(level),
            opened_at,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<(&'static str, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Element opened by this frame, if it produces output.
    pub fn element_name(&self) -> Option<&'static str> {
        self.rule.element.map(|e| e.name)
    }

    /// Whether `incoming` at `level` closes this frame when it is on top.
    fn yields_to(&self, incoming: &TagRule, level: Option<u32>) -> bool {
        if self.rank >= RANK_BOOK {
            return false;
        }
        if self.rule.implicitly_closed_by.contains(&incoming.name) {
            return true;
        }
        if self.rule.family.is_some() && self.rule.family == incoming.family {
            return true;
        }
        if !incoming.is_block() {
            return false;
        }
        if self.rule.is_container() {
            return incoming.container.map(|c| c.rule()) != Some(self.rule);
        }
        self.rank <= incoming.closing_rank(level)
    }
}

/// Returned by [`ScopeStack::close`] when no open frame matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatchingOpenScope;

/// Ordered stack of open frames, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack<'r> {
    frames: Vec<ScopeFrame<'r>>,
}

impl<'r> ScopeStack<'r> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn open(&mut self, frame: ScopeFrame<'r>) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame for `name` and every frame above it.
    ///
    /// Frames are returned innermost-first; the matched frame is last.
    pub fn close(&mut self, name: &str) -> Result<Vec<ScopeFrame<'r>>, NoMatchingOpenScope> {
        let index = self
            .frames
            .iter()
            .rposition(|f| f.rule.name == name && f.rank < RANK_BOOK)
            .ok_or(NoMatchingOpenScope)?;
        Ok(self.frames.drain(index..).rev().collect())
    }

    /// Pop frames that cannot stay open once `incoming` opens.
    ///
    /// Pops from the top while the top frame lists `incoming` as a closer,
    /// shares its exclusive family, is a wrapper that `incoming` does not
    /// belong in, or ranks no higher than an incoming block. Frames are
    /// returned innermost-first.
    pub fn implicit_close_if_needed(
        &mut self,
        incoming: &TagRule,
        level: Option<u32>,
    ) -> Vec<ScopeFrame<'r>> {
        let mut popped = Vec::new();
        while let Some(top) = self.frames.last() {
            if !top.yields_to(incoming, level) {
                break;
            }
            if let Some(frame) = self.frames.pop() {
                popped.push(frame);
            }
        }
        popped
    }

    /// Pop frames ranked at or below `rank`, innermost-first.
    pub fn close_through_rank(&mut self, rank: u8) -> Vec<ScopeFrame<'r>> {
        let mut popped = Vec::new();
        while self.frames.last().is_some_and(|f| f.rank <= rank && f.rank < RANK_BOOK) {
            if let Some(frame) = self.frames.pop() {
                popped.push(frame);
            }
        }
        popped
    }

    /// Pop everything, innermost-first.
    pub fn drain_all(&mut self) -> Vec<ScopeFrame<'r>> {
        self.frames.drain(..).rev().collect()
    }

    /// Index of the innermost line-scoped frame.
    pub fn line_scope(&self) -> Option<usize> {
        self.frames.iter().rposition(|f| f.rule.line_scoped)
    }

    /// Pop frames down to and including `index`, innermost-first.
    pub fn truncate_to(&mut self, index: usize) -> Vec<ScopeFrame<'r>> {
        if index >= self.frames.len() {
            return Vec::new();
        }
        self.frames.drain(index..).rev().collect()
    }

    /// Whether text here keeps its line breaks (poetry, lists).
    ///
    /// Decided by the innermost non-inline frame.
    pub fn keeps_lines(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find(|f| f.rule.is_block() || f.rule.is_container())
            .is_some_and(|f| f.rule.keeps_lines)
    }

    pub fn top(&self) -> Option<&ScopeFrame<'r>> {
        self.frames.last()
    }

    pub fn current_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[ScopeFrame<'r>] {
        &self.frames
    }
}
