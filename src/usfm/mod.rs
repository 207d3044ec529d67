//! USFM input model: tokens, marker rules, open scopes and references.
//!
//! Everything here is independent of the output format. The conversion
//! engine in [`crate::convert`] ties these pieces together.

mod attributes;
mod reference;
mod registry;
mod scope;
mod token;

pub use attributes::{
    Attribute, Figure, MalformedAttributes, parse_attributes, parse_figure, split_attributes,
};
pub use reference::{MAX_BRIDGE_VERSES, ReferenceContext, VerseSpan, leading_number};
pub use registry::{
    Action, Argument, Attrs, BOOK, Container, ElementTemplate, Family, HEADING_TITLE, LINE_GROUP,
    LIST, LevelStyle, NoteKind, RANK_BOOK, RANK_CELL, RANK_CONTAINER, RANK_INLINE, RANK_LINE,
    RANK_MAJOR_SECTION, RANK_PARAGRAPH, RANK_SECTION, ScopeClass, TABLE, TagRegistry, TagRule,
};
pub use scope::{NoMatchingOpenScope, ScopeFrame, ScopeStack};
pub use token::{Marker, Token, TokenKind, Tokenizer, tokenize};
