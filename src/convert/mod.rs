//! USFM → OSIS conversion.
//!
//! [`Converter`] turns one book's decoded text into a [`Conversion`]: the
//! OSIS events of a `<div type="book">` plus the conformance violations
//! found on the way. Conversion never fails; malformed markup degrades to
//! text and is reported.
//!
//! # Example
//!
//! ```
//! use usfm2osis::books::BookNames;
//! use usfm2osis::collector::UnhandledTags;
//! use usfm2osis::convert::Converter;
//!
//! let unhandled = UnhandledTags::new();
//! let conversion = Converter::new().convert(
//!     "\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning\n",
//!     "Gen",
//!     &BookNames::new(),
//!     &unhandled,
//! );
//! let xml = conversion.to_xml().unwrap();
//! assert!(xml.contains(r#"<verse sID="Gen.1.1" osisID="Gen.1.1" n="1"/>In the beginning"#));
//! assert!(!conversion.has_violations());
//! ```

mod engine;
mod report;

pub use report::{Conversion, Violation, ViolationKind};

use tracing::debug;

use crate::books::{self, BookNames};
use crate::collector::UnhandledTags;
use crate::config::ConvertConfig;
use crate::usfm::{BOOK, ReferenceContext, TagRegistry};
use engine::{Context, Engine};

/// Converts USFM books with a fixed registry and configuration.
#[derive(Debug, Clone)]
pub struct Converter<'r> {
    registry: &'r TagRegistry,
    config: ConvertConfig,
}

impl Default for Converter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter<'static> {
    /// A converter over the standard registry with strict conformance.
    pub fn new() -> Self {
        Self::with_config(ConvertConfig::default())
    }

    /// A converter over the standard registry.
    pub fn with_config(config: ConvertConfig) -> Self {
        Self {
            registry: TagRegistry::standard(),
            config,
        }
    }
}

impl<'r> Converter<'r> {
    /// A converter over a custom registry.
    pub fn with_registry(registry: &'r TagRegistry, config: ConvertConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r TagRegistry {
        self.registry
    }

    /// Convert one book.
    ///
    /// `book` is the OSIS book code used for identifiers. Unrecognized
    /// markers are added to `unhandled`.
    pub fn convert(
        &self,
        text: &str,
        book: &str,
        names: &BookNames,
        unhandled: &UnhandledTags,
    ) -> Conversion {
        let cx = Context {
            registry: self.registry,
            config: &self.config,
            names,
            unhandled,
            source: text,
        };
        let mut engine = Engine::new(cx, ReferenceContext::new(book));

        let canonical = books::by_osis(book).is_none_or(|b| b.is_canonical());
        let template = BOOK.element.map_or(&[][..], |t| t.attributes);
        let mut attributes: Vec<(&'static str, String)> =
            template.iter().map(|&(k, v)| (k, v.to_string())).collect();
        attributes.push(("osisID", book.to_string()));
        attributes.push(("canonical", canonical.to_string()));
        engine.open_root(&BOOK, attributes);

        engine.run(text, 0);
        engine.finish();
        let (events, violations) = engine.into_parts();
        debug!(book, events = events.len(), violations = violations.len(), "converted");

        Conversion {
            book: book.to_string(),
            events,
            violations,
        }
    }
}

#[cfg(test)]
mod tests;
