//! USFM source files: decoding and identification.
//!
//! A [`SourceDocument`] is one book's text, decoded and normalized, together
//! with what its identification lines say about it: the USFM book code
//! (`\id`), the resolved OSIS code and the localized abbreviation
//! (`\toc3`). Nothing here looks at markup beyond those lines.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::books::{self, BookInfo};
use crate::error::{Error, Result};
use crate::patterns::{ID_RE, IDE_RE, TOC3_RE};
use crate::util::{decode_text, decode_with_label};

/// One decoded USFM book.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// Trimmed text with a single trailing newline.
    pub text: String,
    /// Encoding the bytes were decoded with.
    pub encoding: &'static Encoding,
    /// Book code from the `\id` line, upper-cased.
    pub usfm_code: Option<String>,
    /// OSIS book code used for identifiers.
    pub book: String,
    /// Localized abbreviation from `\toc3`.
    pub localized_name: Option<String>,
}

/// Look up a USFM book code.
pub fn resolve_book(usfm_code: &str) -> Result<&'static BookInfo> {
    books::by_usfm(usfm_code).ok_or_else(|| Error::UnknownBook(usfm_code.to_string()))
}

impl SourceDocument {
    /// Read and decode a file.
    ///
    /// `encoding_override` replaces any encoding the file declares.
    pub fn read(path: impl AsRef<Path>, encoding_override: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Ok(Self::from_bytes(path, &bytes, encoding_override))
    }

    /// Decode raw bytes.
    ///
    /// Without an override the bytes are tried as UTF-8, then as the
    /// encoding named by `\ide`, then as Windows-1252.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8], encoding_override: Option<&str>) -> Self {
        let path = path.into();
        let (text, encoding) = match encoding_override {
            Some(label) => decode_with_label(bytes, label).unwrap_or_else(|| {
                warn!(encoding = label, path = %path.display(), "unknown encoding; reading as UTF-8");
                let (text, encoding, _) = encoding_rs::UTF_8.decode(bytes);
                (text, encoding)
            }),
            None => {
                let head = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]);
                let declared = IDE_RE
                    .captures(&head)
                    .map(|caps| caps[1].trim().to_ascii_lowercase());
                if let Some(label) = declared.as_deref()
                    && Encoding::for_label(label.as_bytes()).is_none()
                {
                    warn!(encoding = label, path = %path.display(), "unknown declared encoding; reading as UTF-8");
                }
                decode_text(bytes, declared.as_deref())
            }
        };
        debug!(path = %path.display(), encoding = encoding.name(), "decoded");
        Self::from_decoded(path, &text, encoding)
    }

    /// Wrap text that is already decoded.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::from_decoded(path.into(), text, encoding_rs::UTF_8)
    }

    fn from_decoded(path: PathBuf, text: &str, encoding: &'static Encoding) -> Self {
        let mut normalized = String::with_capacity(text.len() + 1);
        normalized.push_str(text.trim());
        normalized.push('\n');

        let usfm_code = ID_RE
            .captures(&normalized)
            .map(|caps| caps[1].to_ascii_uppercase());
        let book = match usfm_code.as_deref().map(resolve_book) {
            Some(Ok(info)) => info.osis.to_string(),
            Some(Err(e)) => {
                warn!(path = %path.display(), "{e}; using the code as the book identifier");
                usfm_code.clone().unwrap_or_default()
            }
            None => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warn!(path = %path.display(), "no \\id line; using the file name as the book identifier");
                stem
            }
        };
        let localized_name = TOC3_RE
            .captures(&normalized)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            path,
            text: normalized,
            encoding,
            usfm_code,
            book,
            localized_name,
        }
    }

    /// Table entry of the book, when the code is a known one.
    pub fn info(&self) -> Option<&'static BookInfo> {
        books::by_osis(&self.book)
    }

    /// File name for display and sorting.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identification() {
        let doc = SourceDocument::from_text(
            "01GEN.SFM",
            "  \\id GEN Genesis\n\\toc3 Gn\n\\c 1\n\\p\n\\v 1 In the beginning\n\n\n",
        );
        assert_eq!(doc.usfm_code.as_deref(), Some("GEN"));
        assert_eq!(doc.book, "Gen");
        assert_eq!(doc.localized_name.as_deref(), Some("Gn"));
        assert!(doc.text.starts_with("\\id GEN"));
        assert!(doc.text.ends_with("beginning\n"));
        assert!(doc.info().is_some_and(|b| b.is_canonical()));
    }

    #[test]
    fn test_lowercase_code() {
        let doc = SourceDocument::from_text("x.usfm", "\\id mat\n");
        assert_eq!(doc.usfm_code.as_deref(), Some("MAT"));
        assert_eq!(doc.book, "Matt");
    }

    #[test]
    fn test_unknown_code() {
        assert!(matches!(resolve_book("ZZZ"), Err(Error::UnknownBook(code)) if code == "ZZZ"));
        let doc = SourceDocument::from_text("x.usfm", "\\id ZZZ\n\\p text");
        assert_eq!(doc.book, "ZZZ");
        assert!(doc.info().is_none());
    }

    #[test]
    fn test_missing_id_uses_file_stem() {
        let doc = SourceDocument::from_text("dir/Extra.usfm", "\\p text");
        assert_eq!(doc.usfm_code, None);
        assert_eq!(doc.book, "Extra");
    }

    #[test]
    fn test_declared_encoding() {
        let mut bytes = b"\\id GEN\n\\ide windows-1252\n\\p ".to_vec();
        bytes.extend_from_slice(b"\x93caf\xE9\x94");
        let doc = SourceDocument::from_bytes("gen.sfm", &bytes, None);
        assert_eq!(doc.encoding, encoding_rs::WINDOWS_1252);
        assert!(doc.text.contains("\u{201C}café\u{201D}"));
    }

    #[test]
    fn test_utf8_wins_over_declaration() {
        let doc = SourceDocument::from_bytes("gen.sfm", "\\id GEN\n\\ide latin1\n\\p café".as_bytes(), None);
        assert_eq!(doc.encoding, encoding_rs::UTF_8);
        assert!(doc.text.contains("café"));
    }

    #[test]
    fn test_override() {
        let doc = SourceDocument::from_bytes("gen.sfm", b"\\id GEN\n\\p caf\xE9", Some("iso-8859-1"));
        assert!(doc.text.contains("café"));

        let doc = SourceDocument::from_bytes("gen.sfm", b"\\id GEN\n\\p ok", Some("no-such-thing"));
        assert_eq!(doc.encoding, encoding_rs::UTF_8);
        assert_eq!(doc.book, "Gen");
    }

    #[test]
    fn test_read_missing_file() {
        let err = SourceDocument::read("/nonexistent/usfm/file.sfm", None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
