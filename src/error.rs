//! Error types for usfm2osis operations.
//!
//! The conversion engine itself never fails: malformed markup is recorded as
//! a [`Violation`](crate::convert::Violation) and conversion carries on.
//! These errors cover the I/O and serialization around it.

use thiserror::Error;

/// Errors that can occur while reading USFM or writing OSIS.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown book code: {0}")]
    UnknownBook(String),

    #[error("Could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("No USFM input files matched")]
    NoInput,
}

pub type Result<T> = std::result::Result<T, Error>;
