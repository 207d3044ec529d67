//! Cached regex patterns for USFM scanning.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

// === Identification lines ===

/// `\id GEN ...`: the USFM book code.
pub static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\id\s+([A-Za-z0-9]+)").unwrap());

/// `\ide UTF-8`: the declared encoding.
pub static IDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\ide\s+([^\r\n]+)").unwrap());

/// `\toc3 Gen`: the localized book abbreviation.
pub static TOC3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\toc3\b[ \t]*([^\r\n]+)").unwrap());

// === Conversion patterns ===

/// `Book c:v-v` inside a cross-reference target.
pub static XREF_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\.?\s+(\d+)(?:[:.](\d+)(?:\s*[-–]\s*(\d+))?)?[.;,]?\s*$").unwrap()
});

/// Any marker, for tag inventories.
pub static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\+?[A-Za-z0-9]+\*?").unwrap());
