//! # usfm2osis
//!
//! A fast converter from USFM (Unified Standard Format Markers) Bible text
//! to OSIS XML.
//!
//! ## Features
//!
//! - Single-pass conversion of each book with USFM's implicit scope closing
//! - Verse and chapter milestones with synthesized `osisID`s
//! - Footnotes and cross references converted recursively
//! - Malformed markup degrades to text and is reported, never fatal
//! - Books converted in parallel and assembled into one OSIS document
//!
//! ## Quick Start
//!
//! ```no_run
//! use usfm2osis::{BatchConfig, OsisWork, run};
//!
//! let config = BatchConfig::new(OsisWork::new("Bible.Test").with_language("en"));
//! let report = run(&["usfm/*.SFM"], "Bible.Test.osis.xml", &config).unwrap();
//! println!("{} books, {} unhandled markers", report.books.len(), report.unhandled.len());
//! ```
//!
//! ## Converting one book
//!
//! ```
//! use usfm2osis::{BookNames, Converter, OsisDocument, OsisWork, UnhandledTags};
//!
//! let unhandled = UnhandledTags::new();
//! let conversion = Converter::new().convert(
//!     "\\id JHN\n\\c 3\n\\p\n\\v 16 For God so loved the world",
//!     "John",
//!     &BookNames::new(),
//!     &unhandled,
//! );
//! let doc = OsisDocument::new(OsisWork::new("Bible.Test"));
//! let xml = doc.to_xml([conversion.events.as_slice()]).unwrap();
//! assert!(xml.contains(r#"<verse sID="John.3.16" osisID="John.3.16" n="16"/>"#));
//! ```

pub mod books;
pub mod collector;
pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod osis;
pub(crate) mod patterns;
pub mod source;
pub mod usfm;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use books::BookNames;
pub use collector::UnhandledTags;
pub use config::{Conformance, ConvertConfig, OsisWork};
pub use convert::{Conversion, Converter, Violation, ViolationKind};
pub use driver::{BatchConfig, BatchReport, BookReport, SortMode, run, run_to_writer};
pub use error::{Error, Result};
pub use osis::{OsisDocument, OsisEvent};
pub use source::SourceDocument;
pub use usfm::{TagRegistry, tokenize};

/// Regex matching any USFM marker, for tools that inventory markup.
pub fn marker_pattern() -> &'static regex_lite::Regex {
    &patterns::MARKER_RE
}
