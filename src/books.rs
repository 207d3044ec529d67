//! Book identification: USFM codes, OSIS codes and localized names.
//!
//! The static table is in USFM book-number order. Canonical order groups
//! the same entries by [`Section`].

use std::collections::HashMap;

/// Where a book sits in a printed Bible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Front,
    Old,
    Deutero,
    New,
    Back,
}

/// One row of the book table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    pub usfm: &'static str,
    pub osis: &'static str,
    pub section: Section,
}

impl BookInfo {
    /// Scripture proper, as opposed to front and back matter.
    pub fn is_canonical(&self) -> bool {
        !matches!(self.section, Section::Front | Section::Back)
    }
}

macro_rules! books {
    ($($section:ident: [$(($usfm:literal, $osis:literal)),* $(,)?]),* $(,)?) => {
        &[$($(BookInfo { usfm: $usfm, osis: $osis, section: Section::$section },)*)*]
    };
}

static BOOKS: &[BookInfo] = books! {
    Old: [
        ("GEN", "Gen"), ("EXO", "Exod"), ("LEV", "Lev"), ("NUM", "Num"), ("DEU", "Deut"),
        ("JOS", "Josh"), ("JDG", "Judg"), ("RUT", "Ruth"), ("1SA", "1Sam"), ("2SA", "2Sam"),
        ("1KI", "1Kgs"), ("2KI", "2Kgs"), ("1CH", "1Chr"), ("2CH", "2Chr"), ("EZR", "Ezra"),
        ("NEH", "Neh"), ("EST", "Esth"), ("JOB", "Job"), ("PSA", "Ps"), ("PRO", "Prov"),
        ("ECC", "Eccl"), ("SNG", "Song"), ("ISA", "Isa"), ("JER", "Jer"), ("LAM", "Lam"),
        ("EZK", "Ezek"), ("DAN", "Dan"), ("HOS", "Hos"), ("JOL", "Joel"), ("AMO", "Amos"),
        ("OBA", "Obad"), ("JON", "Jonah"), ("MIC", "Mic"), ("NAM", "Nah"), ("HAB", "Hab"),
        ("ZEP", "Zeph"), ("HAG", "Hag"), ("ZEC", "Zech"), ("MAL", "Mal"),
    ],
    New: [
        ("MAT", "Matt"), ("MRK", "Mark"), ("LUK", "Luke"), ("JHN", "John"), ("ACT", "Acts"),
        ("ROM", "Rom"), ("1CO", "1Cor"), ("2CO", "2Cor"), ("GAL", "Gal"), ("EPH", "Eph"),
        ("PHP", "Phil"), ("COL", "Col"), ("1TH", "1Thess"), ("2TH", "2Thess"), ("1TI", "1Tim"),
        ("2TI", "2Tim"), ("TIT", "Titus"), ("PHM", "Phlm"), ("HEB", "Heb"), ("JAS", "Jas"),
        ("1PE", "1Pet"), ("2PE", "2Pet"), ("1JN", "1John"), ("2JN", "2John"), ("3JN", "3John"),
        ("JUD", "Jude"), ("REV", "Rev"),
    ],
    Deutero: [
        ("TOB", "Tob"), ("JDT", "Jdt"), ("ESG", "EsthGr"), ("WIS", "Wis"), ("SIR", "Sir"),
        ("BAR", "Bar"), ("LJE", "EpJer"), ("S3Y", "PrAzar"), ("SUS", "Sus"), ("BEL", "Bel"),
        ("1MA", "1Macc"), ("2MA", "2Macc"), ("3MA", "3Macc"), ("4MA", "4Macc"), ("1ES", "1Esd"),
        ("2ES", "2Esd"), ("MAN", "PrMan"), ("PS2", "AddPs"), ("ODA", "Odes"), ("PSS", "PssSol"),
        ("JSA", "JoshA"), ("JDB", "JudgB"), ("TBS", "TobS"), ("SST", "SusTh"), ("DNT", "DanTh"),
        ("BLT", "BelTh"), ("EZA", "4Ezra"), ("5EZ", "5Ezra"), ("6EZ", "6Ezra"), ("DAG", "DanGr"),
        ("PS3", "5ApocSyrPss"), ("2BA", "2Bar"), ("LBA", "EpBar"), ("JUB", "Jub"), ("ENO", "1En"),
        ("1MQ", "1Meq"), ("2MQ", "2Meq"), ("3MQ", "3Meq"), ("REP", "Reproof"), ("4BA", "4Bar"),
        ("LAO", "EpLao"),
    ],
    Front: [
        ("FRT", "FRONT"), ("INT", "INTRODUCTION"),
    ],
    Back: [
        ("BAK", "BACK"), ("CNC", "CONCORDANCE"), ("GLO", "GLOSSARY"), ("TDX", "INDEX"),
        ("NDX", "GAZETTEER"), ("OTH", "X-OTHER"),
    ],
};

/// All known books in USFM book-number order.
pub fn all() -> &'static [BookInfo] {
    BOOKS
}

/// Look up a USFM book code (`GEN`, `1SA`), case-insensitively.
pub fn by_usfm(code: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.usfm.eq_ignore_ascii_case(code))
}

/// Look up an OSIS book code (`Gen`, `1Sam`).
pub fn by_osis(code: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.osis == code)
}

/// Position in USFM book-number order; unknown codes sort last.
pub fn usfm_rank(osis: &str) -> usize {
    BOOKS.iter().position(|b| b.osis == osis).unwrap_or(usize::MAX)
}

/// Position in canonical order (front matter, Old Testament, deuterocanon,
/// New Testament, back matter); unknown codes sort last.
pub fn canonical_rank(osis: &str) -> (Section, usize) {
    match BOOKS.iter().position(|b| b.osis == osis) {
        Some(index) => (BOOKS[index].section, index),
        None => (Section::Back, usize::MAX),
    }
}

/// Localized book names, keyed both ways.
///
/// Built from each book's `\toc3` abbreviation before conversion starts and
/// passed to the engine read-only.
#[derive(Debug, Clone, Default)]
pub struct BookNames {
    by_osis: HashMap<String, String>,
    by_name: HashMap<String, String>,
}

impl BookNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as the localized name of `osis`.
    pub fn insert(&mut self, osis: impl Into<String>, name: impl Into<String>) {
        let osis = osis.into();
        let name = name.into();
        self.by_name.insert(name.clone(), osis.clone());
        self.by_osis.insert(osis, name);
    }

    pub fn localized(&self, osis: &str) -> Option<&str> {
        self.by_osis.get(osis).map(String::as_str)
    }

    pub fn osis_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Resolve a book as written in running text: a localized name first,
    /// then an OSIS code, then a USFM code.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if let Some(osis) = self.osis_for(name) {
            return Some(osis);
        }
        if let Some(book) = by_osis(name) {
            return Some(book.osis);
        }
        by_usfm(name).map(|b| b.osis)
    }

    pub fn len(&self) -> usize {
        self.by_osis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_osis.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usfm_lookup() {
        assert_eq!(by_usfm("GEN").map(|b| b.osis), Some("Gen"));
        assert_eq!(by_usfm("1sa").map(|b| b.osis), Some("1Sam"));
        assert_eq!(by_usfm("REV").map(|b| b.section), Some(Section::New));
        assert!(by_usfm("XYZ").is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in BOOKS.iter().enumerate() {
            for b in &BOOKS[i + 1..] {
                assert_ne!(a.usfm, b.usfm);
                assert_ne!(a.osis, b.osis);
            }
        }
    }

    #[test]
    fn test_canonical_order_puts_deuterocanon_before_new_testament() {
        assert!(canonical_rank("Mal") < canonical_rank("Tob"));
        assert!(canonical_rank("Tob") < canonical_rank("Matt"));
        assert!(canonical_rank("FRONT") < canonical_rank("Gen"));
        assert!(canonical_rank("Rev") < canonical_rank("GLOSSARY"));
    }

    #[test]
    fn test_usfm_order_puts_new_testament_before_deuterocanon() {
        assert!(usfm_rank("Matt") < usfm_rank("Tob"));
        assert_eq!(usfm_rank("Nope"), usize::MAX);
    }

    #[test]
    fn test_canonical_flag() {
        assert!(by_usfm("GEN").unwrap().is_canonical());
        assert!(!by_usfm("FRT").unwrap().is_canonical());
    }

    #[test]
    fn test_book_names_resolve() {
        let mut names = BookNames::new();
        names.insert("Gen", "Gn");
        assert_eq!(names.localized("Gen"), Some("Gn"));
        assert_eq!(names.resolve("Gn"), Some("Gen"));
        assert_eq!(names.resolve("Exod"), Some("Exod"));
        assert_eq!(names.resolve("EXO"), Some("Exod"));
        assert_eq!(names.resolve("Nowhere"), None);
        assert_eq!(names.len(), 1);
    }
}
