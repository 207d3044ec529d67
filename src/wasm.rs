//! WASM bindings for browser-based USFM conversion.
//!
//! This module exposes single-book conversion to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::books::BookNames;
use crate::collector::UnhandledTags;
use crate::config::{ConvertConfig, OsisWork};
use crate::convert::Converter;
use crate::osis::OsisDocument;
use crate::source::SourceDocument;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Convert one USFM book to a complete OSIS document.
///
/// The book is identified by its `\id` line; `relaxed` selects relaxed
/// conformance.
#[wasm_bindgen]
pub fn usfm_to_osis(text: &str, work: &str, relaxed: bool) -> Result<String, JsValue> {
    let source = SourceDocument::from_text("input.usfm", text);
    let mut names = BookNames::new();
    if let Some(name) = &source.localized_name {
        names.insert(source.book.as_str(), name.as_str());
    }
    let config = if relaxed {
        ConvertConfig::relaxed()
    } else {
        ConvertConfig::default()
    };

    let unhandled = UnhandledTags::new();
    let conversion = Converter::with_config(config).convert(&source.text, &source.book, &names, &unhandled);

    OsisDocument::new(OsisWork::new(work))
        .to_xml([conversion.events.as_slice()])
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
