//! Batch conversion of many USFM files into one OSIS document.
//!
//! Files are read and converted in parallel with rayon. Books share only
//! the read-only tag registry, the book-name table built from every book's
//! `\toc3` before conversion starts, and the [`UnhandledTags`] collector.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::books::{self, BookNames};
use crate::collector::UnhandledTags;
use crate::config::{ConvertConfig, OsisWork};
use crate::convert::{Conversion, Converter};
use crate::error::{Error, Result};
use crate::osis::OsisDocument;
use crate::source::SourceDocument;
use crate::util::{natural_cmp, time_seed_nanos};

/// Order of books in the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// File names, digit runs compared numerically.
    #[default]
    Natural,
    /// File names, plain string order.
    Alpha,
    /// Canonical book order.
    Canonical,
    /// USFM book-number order.
    Usfm,
    Random,
    /// Input order.
    None,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Alpha => "alpha",
            Self::Canonical => "canonical",
            Self::Usfm => "usfm",
            Self::Random => "random",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "natural" => Ok(Self::Natural),
            "alpha" => Ok(Self::Alpha),
            "canonical" => Ok(Self::Canonical),
            "usfm" => Ok(Self::Usfm),
            "random" => Ok(Self::Random),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown sort mode '{other}' (expected natural, alpha, canonical, usfm, random or none)"
            )),
        }
    }
}

/// Settings of one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub convert: ConvertConfig,
    pub work: OsisWork,
    /// Encoding label applied to every input.
    pub encoding_override: Option<String>,
    pub sort: SortMode,
    /// Worker threads; `None` uses rayon's default pool.
    pub threads: Option<usize>,
}

impl BatchConfig {
    pub fn new(work: OsisWork) -> Self {
        Self {
            convert: ConvertConfig::default(),
            work,
            encoding_override: None,
            sort: SortMode::default(),
            threads: None,
        }
    }

    pub fn with_convert(mut self, convert: ConvertConfig) -> Self {
        self.convert = convert;
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding_override = Some(label.into());
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Outcome for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookReport {
    pub path: PathBuf,
    pub book: String,
    pub violations: usize,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Books in output order.
    pub books: Vec<BookReport>,
    /// Sorted, de-duplicated unhandled markers across all books.
    pub unhandled: Vec<String>,
}

impl BatchReport {
    pub fn total_violations(&self) -> usize {
        self.books.iter().map(|b| b.violations).sum()
    }

    pub fn has_violations(&self) -> bool {
        self.books.iter().any(|b| b.violations > 0)
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Expand `*`/`?` patterns in each input.
///
/// Plain paths are passed through untouched. Matches of one pattern are
/// listed in name order; directories are skipped.
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let pattern = input.as_ref();
        if !pattern.contains(['*', '?']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let mut matches = Vec::new();
        for entry in glob::glob(pattern)? {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                matches.push(path);
            }
        }
        matches.sort();
        debug!(pattern, matches = matches.len(), "expanded input pattern");
        paths.extend(matches);
    }
    if paths.is_empty() {
        return Err(Error::NoInput);
    }
    Ok(paths)
}

/// Read and decode every input in parallel, keeping input order.
pub fn load_sources(paths: &[PathBuf], encoding_override: Option<&str>) -> Result<Vec<SourceDocument>> {
    paths
        .par_iter()
        .map(|path| SourceDocument::read(path, encoding_override))
        .collect()
}

/// Reorder books for output.
pub fn sort_sources(docs: &mut [SourceDocument], mode: SortMode) {
    match mode {
        SortMode::Natural => docs.sort_by(|a, b| natural_cmp(&a.file_name(), &b.file_name())),
        SortMode::Alpha => docs.sort_by_key(|d| d.file_name()),
        SortMode::Canonical => docs.sort_by_key(|d| books::canonical_rank(&d.book)),
        SortMode::Usfm => docs.sort_by_key(|d| books::usfm_rank(&d.book)),
        SortMode::Random => shuffle(docs, time_seed_nanos()),
        SortMode::None => {}
    }
}

/// Fisher-Yates shuffle driven by xorshift64.
fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut state = seed | 1;
    for i in (1..items.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

/// Localized abbreviations of all books, keyed by OSIS code.
pub fn book_names(docs: &[SourceDocument]) -> BookNames {
    let mut names = BookNames::new();
    for doc in docs {
        if let Some(name) = &doc.localized_name {
            names.insert(doc.book.as_str(), name.as_str());
        }
    }
    names
}

/// Convert every book in parallel, keeping order.
pub fn convert_sources(
    docs: &[SourceDocument],
    config: &ConvertConfig,
    names: &BookNames,
    unhandled: &UnhandledTags,
) -> Vec<Conversion> {
    let converter = Converter::with_config(config.clone());
    docs.par_iter()
        .map(|doc| {
            let conversion = converter.convert(&doc.text, &doc.book, names, unhandled);
            info!(
                book = conversion.book.as_str(),
                file = %doc.path.display(),
                violations = conversion.violation_count(),
                "converted book"
            );
            conversion
        })
        .collect()
}

// ============================================================================
// Batch
// ============================================================================

/// Convert `paths` and write the assembled document to `out`.
pub fn run_to_writer<W: Write + Send>(paths: &[PathBuf], out: W, config: &BatchConfig) -> Result<BatchReport> {
    let batch = || -> Result<BatchReport> {
        let mut docs = load_sources(paths, config.encoding_override.as_deref())?;
        sort_sources(&mut docs, config.sort);
        let names = book_names(&docs);
        let unhandled = UnhandledTags::new();
        let conversions = convert_sources(&docs, &config.convert, &names, &unhandled);

        info!(books = conversions.len(), "assembling OSIS document");
        OsisDocument::new(config.work.clone())
            .write(out, conversions.iter().map(|c| c.events.as_slice()))?;

        let books = docs
            .iter()
            .zip(&conversions)
            .map(|(doc, conversion)| BookReport {
                path: doc.path.clone(),
                book: conversion.book.clone(),
                violations: conversion.violation_count(),
            })
            .collect();
        Ok(BatchReport {
            books,
            unhandled: unhandled.snapshot(),
        })
    };

    match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(batch),
        None => batch(),
    }
}

/// Expand `inputs`, convert them and write the document to `output`.
pub fn run<S: AsRef<str>>(inputs: &[S], output: impl AsRef<Path>, config: &BatchConfig) -> Result<BatchReport> {
    let paths = expand_inputs(inputs)?;
    info!(files = paths.len(), "converting USFM documents to OSIS");
    let file = File::create(output.as_ref())?;
    let mut writer = BufWriter::new(file);
    let report = run_to_writer(&paths, &mut writer, config)?;
    writer.flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn doc(name: &str, text: &str) -> SourceDocument {
        SourceDocument::from_text(name, text)
    }

    #[test]
    fn test_expand_pattern() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["02-EXO.usfm", "01-GEN.usfm", "notes.txt"] {
            fs::write(dir.path().join(name), "\\id GEN").unwrap();
        }
        fs::create_dir(dir.path().join("99-dir.usfm")).unwrap();

        let pattern = format!("{}/0?-*.usfm", dir.path().display());
        let plain = dir.path().join("notes.txt");
        let inputs = [pattern.as_str(), plain.to_str().unwrap()];
        let paths = expand_inputs(&inputs).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["01-GEN.usfm", "02-EXO.usfm", "notes.txt"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(expand_inputs(&["a/***.usfm"]), Err(Error::Pattern(_))));
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("Canonical".parse::<SortMode>(), Ok(SortMode::Canonical));
        assert_eq!("none".parse::<SortMode>(), Ok(SortMode::None));
        assert!("sideways".parse::<SortMode>().is_err());
        assert_eq!(SortMode::Usfm.to_string(), "usfm");
    }

    #[test]
    fn test_sort_natural_and_alpha() {
        let mut docs = vec![doc("10.usfm", "\\id EXO"), doc("9.usfm", "\\id GEN")];
        sort_sources(&mut docs, SortMode::Natural);
        assert_eq!(docs[0].file_name(), "9.usfm");
        sort_sources(&mut docs, SortMode::Alpha);
        assert_eq!(docs[0].file_name(), "10.usfm");
    }

    #[test]
    fn test_sort_canonical_and_usfm() {
        // Tobit follows the New Testament in USFM numbering but precedes it canonically
        let mut docs = vec![
            doc("a.usfm", "\\id TOB"),
            doc("b.usfm", "\\id MAT"),
            doc("c.usfm", "\\id FRT"),
            doc("d.usfm", "\\id GEN"),
        ];
        sort_sources(&mut docs, SortMode::Canonical);
        let order: Vec<_> = docs.iter().map(|d| d.book.as_str()).collect();
        assert_eq!(order, vec!["FRONT", "Gen", "Tob", "Matt"]);

        sort_sources(&mut docs, SortMode::Usfm);
        let order: Vec<_> = docs.iter().map(|d| d.book.as_str()).collect();
        assert_eq!(order, vec!["Gen", "Matt", "Tob", "FRONT"]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, 42);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_book_names() {
        let docs = vec![
            doc("a.usfm", "\\id GEN\n\\toc3 Gn"),
            doc("b.usfm", "\\id EXO\n\\toc3 Ex"),
            doc("c.usfm", "\\id LEV"),
        ];
        let names = book_names(&docs);
        assert_eq!(names.len(), 2);
        assert_eq!(names.resolve("Ex"), Some("Exod"));
    }

    #[test]
    fn test_convert_sources_shares_collector() {
        let docs = vec![
            doc("a.usfm", "\\id GEN\n\\p \\zzz a"),
            doc("b.usfm", "\\id EXO\n\\p \\zzz b \\yyy c"),
        ];
        let unhandled = UnhandledTags::new();
        let conversions =
            convert_sources(&docs, &ConvertConfig::default(), &BookNames::new(), &unhandled);
        assert_eq!(conversions[0].book, "Gen");
        assert_eq!(conversions[1].book, "Exod");
        assert_eq!(unhandled.snapshot(), vec!["\\yyy", "\\zzz"]);
    }

    #[test]
    fn test_no_input() {
        let inputs: [&str; 0] = [];
        assert!(matches!(expand_inputs(&inputs), Err(Error::NoInput)));
    }
}
