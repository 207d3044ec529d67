//! Conversion settings.

/// How strictly markers are checked against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conformance {
    /// Unknown and out-of-range markers are recorded and warned about.
    #[default]
    Strict,
    /// Out-of-range levels are accepted; unknown markers are recorded
    /// quietly.
    Relaxed,
}

/// Per-book conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub conformance: Conformance,
    /// Maximum nesting of note bodies (a note inside a note counts 2).
    pub note_depth: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            conformance: Conformance::Strict,
            note_depth: 2,
        }
    }
}

impl ConvertConfig {
    /// Relaxed conformance with default limits.
    pub fn relaxed() -> Self {
        Self {
            conformance: Conformance::Relaxed,
            ..Self::default()
        }
    }

    pub fn is_relaxed(&self) -> bool {
        self.conformance == Conformance::Relaxed
    }
}

/// Identity of the work written into the document envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsisWork {
    /// `osisIDWork`, e.g. `Bible.KJV`.
    pub work: String,
    /// `xml:lang` of the text.
    pub language: String,
}

impl OsisWork {
    pub fn new(work: impl Into<String>) -> Self {
        Self {
            work: work.into(),
            language: "und".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
